//! 核心：错误类型、取消监管与会话生命周期

pub mod error;
pub mod session;
pub mod supervisor;

pub use error::CoordinatorError;
pub use session::ChatSession;
pub use supervisor::SessionSupervisor;
