//! Mock 决策客户端（用于测试，无需 API）
//!
//! 按脚本顺序吐出预置回合，并记录每次收到的完整历史，便于断言循环回传的工具结果。

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::decision::traits::{Content, DecisionClient, DecisionTurn};

/// 脚本化客户端：turns 耗尽后返回传输层错误
pub struct MockDecisionClient {
    turns: Mutex<VecDeque<Result<DecisionTurn, String>>>,
    requests: Mutex<Vec<Vec<Content>>>,
    /// 每次响应前的人工延迟（测试超时路径用）
    delay: Option<Duration>,
}

impl MockDecisionClient {
    pub fn scripted(turns: Vec<Result<DecisionTurn, String>>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 已收到的请求历史快照（按调用顺序）
    pub fn requests(&self) -> Vec<Vec<Content>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DecisionClient for MockDecisionClient {
    async fn request(&self, history: &[Content]) -> Result<DecisionTurn, String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(history.to_vec());
        self.turns
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err("Mock script exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_turns_in_order() {
        let mock = MockDecisionClient::scripted(vec![
            Ok(DecisionTurn::text("pertama")),
            Ok(DecisionTurn::text("kedua")),
        ]);
        let first = mock.request(&[Content::user_text("halo")]).await.unwrap();
        assert_eq!(first.reply_text(), "pertama");
        let second = mock.request(&[]).await.unwrap();
        assert_eq!(second.reply_text(), "kedua");
        // 脚本耗尽
        assert!(mock.request(&[]).await.is_err());
        assert_eq!(mock.requests().len(), 3);
    }
}
