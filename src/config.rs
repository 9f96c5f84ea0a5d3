//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SIMRS__*` 覆盖（双下划线表示嵌套，如
//! `SIMRS__DECISION__MODEL=gemini-2.5-flash`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub decision: DecisionSection,
}

/// [app] 段：应用名与协调员提示词文件路径
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 协调员 system 提示词文件；未设置时按默认路径查找，找不到则用内置文本
    pub system_prompt_path: Option<PathBuf>,
}

/// [decision] 段：决策服务端点、超时与调度轮数上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionSection {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 单次决策服务调用超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// 单次对话内最大工具轮数，超出则以协调员致歉中止
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_max_tool_rounds() -> usize {
    6
}

impl Default for DecisionSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            decision: DecisionSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 SIMRS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SIMRS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SIMRS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.decision.model, "gemini-2.5-flash");
        assert_eq!(cfg.decision.request_timeout_secs, 60);
        assert_eq!(cfg.decision.max_tool_rounds, 6);
        assert!(cfg.decision.base_url.contains("generativelanguage"));
    }
}
