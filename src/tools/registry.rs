//! 能力目录注册表
//!
//! 所有能力实现 CapabilityTool（name / description / parameters_schema / agent / call），
//! ToolRegistry 按名注册与查找，并渲染发给决策服务的 functionDeclarations 数组。
//! call 是同步本地计算，错误以 Err(String) 返回，由执行器折叠为 {"error": ...} 载荷。

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

/// 归因标签：本次交换最终由哪个子代理处理（展示名沿用系统的印尼语称谓）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AgentKind {
    Coordinator,
    PatientInfo,
    Scheduler,
    MedicalRecords,
    Billing,
    WebSearch,
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coordinator => write!(f, "Koordinator Utama"),
            Self::PatientInfo => write!(f, "Agen Informasi Pasien"),
            Self::Scheduler => write!(f, "Penjadwal Janji Temu"),
            Self::MedicalRecords => write!(f, "Agen Rekam Medis"),
            Self::Billing => write!(f, "Agen Penagihan & Asuransi"),
            Self::WebSearch => write!(f, "Google Search"),
        }
    }
}

/// 生成文档的载体格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Pdf,
    Docx,
}

/// 工具侧生成的文档工件：与文本回复分离的旁路产物
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedDocument {
    pub title: String,
    pub content: String,
    pub kind: DocKind,
}

/// 能力调用的成功返回：JSON 载荷 + 可选文档工件
#[derive(Clone, Debug)]
pub struct ToolReply {
    pub payload: Value,
    pub artifact: Option<GeneratedDocument>,
}

impl ToolReply {
    pub fn payload(payload: Value) -> Self {
        Self {
            payload,
            artifact: None,
        }
    }

    pub fn with_artifact(payload: Value, artifact: GeneratedDocument) -> Self {
        Self {
            payload,
            artifact: Some(artifact),
        }
    }
}

/// 能力 trait：确定性处理器包装记录库操作，自行校验参数存在性与 ID 可解析性，
/// 绝不向循环边界抛出——失败一律以 Err(String) 表达
pub trait CapabilityTool: Send + Sync {
    /// 目录内可调用名（决策服务 functionCall 的 name 字段）
    fn name(&self) -> &str;

    /// 描述（供决策服务理解何时委派到此能力）
    fn description(&self) -> &str;

    /// 参数 JSON Schema（functionDeclaration 的 parameters 字段）
    fn parameters_schema(&self) -> Value;

    /// 此能力的归因标签
    fn agent(&self) -> AgentKind;

    fn call(&self, args: &Value) -> Result<ToolReply, String>;
}

/// 读取必填字符串参数；缺失或非字符串返回印尼语错误（ToolArgumentFault）
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| format!("Parameter '{}' wajib diisi.", key))
}

/// 目录注册表：按名存储 Arc<dyn CapabilityTool>，保持注册顺序以稳定声明输出
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn CapabilityTool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl CapabilityTool + 'static) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CapabilityTool>> {
        self.tools.get(name).cloned()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// 渲染 functionDeclarations 数组：按注册顺序，每项 name/description/parameters
    pub fn function_declarations(&self) -> Value {
        let declarations: Vec<Value> = self
            .order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect();
        Value::Array(declarations)
    }
}
