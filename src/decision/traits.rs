//! 决策服务客户端抽象与线级类型
//!
//! Content/Part 与 Gemini generateContent 的 JSON 形状一致（camelCase，Part 为单键对象），
//! Mock 后端直接构造同样的类型，调度循环对两者无感。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 消息角色（与决策服务 API 一致：user / model）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 工具调用请求：决策服务要求执行目录内的某个能力
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// 工具执行结果回报：response 为 {"result": <载荷>}
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// 内容分片：文本、工具调用或工具结果之一
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

/// 一条线级消息：角色 + 分片列表
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// 用户文本消息（首轮话语）
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// 一轮工具结果批次：每个已执行调用一个 functionResponse 分片
    pub fn tool_results(responses: Vec<FunctionResponse>) -> Self {
        Self {
            role: Role::User,
            parts: responses.into_iter().map(Part::FunctionResponse).collect(),
        }
    }
}

/// 决策服务的一个回合：模型侧原始内容 + 引用来源 URL（未去重，保持到达顺序）
#[derive(Clone, Debug)]
pub struct DecisionTurn {
    pub content: Content,
    pub grounding_urls: Vec<String>,
}

impl DecisionTurn {
    /// 纯文本回合（无工具调用）
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Content {
                role: Role::Model,
                parts: vec![Part::Text(text.into())],
            },
            grounding_urls: Vec::new(),
        }
    }

    /// 本回合待执行的工具调用，按到达顺序
    pub fn invocations(&self) -> Vec<FunctionCall> {
        self.content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionCall(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    /// 本回合的拼接文本（多个文本分片直接连接）
    pub fn reply_text(&self) -> String {
        self.content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// 决策服务客户端 trait：给定完整历史，返回下一回合
#[async_trait]
pub trait DecisionClient: Send + Sync {
    async fn request(&self, history: &[Content]) -> Result<DecisionTurn, String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_serializes_as_single_key_object() {
        let text = serde_json::to_value(Part::Text("halo".into())).unwrap();
        assert_eq!(text, json!({"text": "halo"}));

        let call = serde_json::to_value(Part::FunctionCall(FunctionCall {
            name: "getBillingInfo".into(),
            args: json!({"patientId": "P002"}),
        }))
        .unwrap();
        assert_eq!(
            call,
            json!({"functionCall": {"name": "getBillingInfo", "args": {"patientId": "P002"}}})
        );
    }

    #[test]
    fn test_content_role_serializes_lowercase() {
        let content = serde_json::to_value(Content::user_text("hi")).unwrap();
        assert_eq!(content["role"], "user");
    }

    #[test]
    fn test_turn_invocations_preserve_order() {
        let turn = DecisionTurn {
            content: Content {
                role: Role::Model,
                parts: vec![
                    Part::FunctionCall(FunctionCall {
                        name: "getAppointments".into(),
                        args: json!({"patientId": "P001"}),
                    }),
                    Part::Text("sebentar".into()),
                    Part::FunctionCall(FunctionCall {
                        name: "scheduleAppointment".into(),
                        args: json!({}),
                    }),
                ],
            },
            grounding_urls: Vec::new(),
        };
        let calls = turn.invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "getAppointments");
        assert_eq!(calls[1].name, "scheduleAppointment");
        assert_eq!(turn.reply_text(), "sebentar");
    }
}
