//! SIMRS - 医院信息系统智能协调核心
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、会话生命周期、取消监管
//! - **decision**: 决策服务客户端抽象与实现（Gemini / Mock）
//! - **dispatch**: 多轮「请求工具 -> 执行 -> 回报结果」调度循环与引用来源提取
//! - **store**: 内存记录库（患者 / 预约 / 账单）与管理面操作
//! - **tools**: 能力目录（8 个确定性处理器）、注册表与执行器

pub mod config;
pub mod core;
pub mod decision;
pub mod dispatch;
pub mod store;
pub mod tools;
