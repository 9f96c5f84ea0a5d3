//! 调度：多轮「请求工具 -> 执行 -> 回报结果」循环与引用来源提取

pub mod grounding;
pub mod loop_;

pub use grounding::{dedupe_grounding, resolve_attribution};
pub use loop_::{run_exchange, ChatOutcome, DispatchOptions};
