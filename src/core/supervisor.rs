//! 会话监管：交换级取消管理
//!
//! 持有当前交换的 CancellationToken；取消只传播到正在进行的决策服务调用，
//! 工具处理器是同步本地计算，不需要取消路径。

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

/// 会话级取消监管：每次交换开始时换发新 token，cancel 只作用于当前交换
#[derive(Debug, Default)]
pub struct SessionSupervisor {
    current: Mutex<CancellationToken>,
}

impl SessionSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始一次新交换：换发新 token 并返回其克隆。
    /// 上一次交换若被取消，其 token 不会影响本次。
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = token.clone();
        token
    }

    /// 取消当前交换中的决策服务调用
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_issues_fresh_token() {
        let supervisor = SessionSupervisor::new();
        let first = supervisor.begin();
        supervisor.cancel();
        assert!(first.is_cancelled());

        // 取消过的交换不影响下一次
        let second = supervisor.begin();
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_cancel_hits_current_token() {
        let supervisor = SessionSupervisor::new();
        let token = supervisor.begin();
        assert!(!token.is_cancelled());
        supervisor.cancel();
        assert!(token.is_cancelled());
    }
}
