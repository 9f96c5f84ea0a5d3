//! 决策服务客户端
//!
//! 所有后端（Gemini / Mock）实现 DecisionClient：给定完整线级历史，返回一个决策回合
//! （文本、工具调用请求、引用来源元数据）。

pub mod gemini;
pub mod mock;
pub mod traits;

pub use gemini::GeminiClient;
pub use mock::MockDecisionClient;
pub use traits::{Content, DecisionClient, DecisionTurn, FunctionCall, FunctionResponse, Part, Role};
