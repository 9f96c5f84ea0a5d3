//! 协调核心错误类型
//!
//! 只有决策服务侧的故障（网络 / 凭证 / 超时）与轮数超限会异常结束一次交换；
//! 工具侧故障在循环内折叠为 `{"error": ...}` 载荷回传给决策服务，从不出现在这里。

use thiserror::Error;

/// 调度循环可能出现的错误；最终由会话层转换为协调员致歉，不会暴露给终端用户
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// 决策服务交换无法完成（连接失败、凭证无效、响应不可解析）
    #[error("Decision service error: {0}")]
    DecisionService(String),

    /// 决策服务调用超过配置的期限（秒）
    #[error("Decision service timed out after {0}s")]
    DecisionTimeout(u64),

    /// 工具轮数超过上限，对话被判定为无法收敛
    #[error("Tool round limit exceeded ({0})")]
    RoundLimitExceeded(usize),

    /// 用户取消了正在进行的决策服务调用
    #[error("Cancelled")]
    Cancelled,
}
