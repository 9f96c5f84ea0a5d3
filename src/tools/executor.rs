//! 工具执行器
//!
//! 持有 ToolRegistry，执行单个调用并把处理器的 Err 折叠为 {"error": ...} 载荷——
//! 工具侧故障绝不越过循环边界；每次调用输出结构化审计日志（JSON）。

use std::time::Instant;

use serde_json::{json, Value};

use crate::tools::registry::{AgentKind, GeneratedDocument, ToolRegistry};

/// 单次调用的执行结果：载荷总是存在；目录命中时附带归因标签与可选工件
pub struct ExecutedTool {
    pub name: String,
    pub payload: Value,
    /// 目录命中时为该能力的归因标签；未知名称为 None（归因不变）
    pub agent: Option<AgentKind>,
    pub artifact: Option<GeneratedDocument>,
}

/// 工具执行器：无超时（处理器为同步本地计算），失败折叠为错误载荷
pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// 执行指定能力；未知名称返回 {"error": "Function not found"}；输出 JSON 审计日志
    pub fn execute(&self, name: &str, args: &Value) -> ExecutedTool {
        let start = Instant::now();
        let executed = match self.registry.get(name) {
            Some(tool) => match tool.call(args) {
                Ok(reply) => ExecutedTool {
                    name: name.to_string(),
                    payload: reply.payload,
                    agent: Some(tool.agent()),
                    artifact: reply.artifact,
                },
                Err(message) => ExecutedTool {
                    name: name.to_string(),
                    payload: json!({"error": message}),
                    agent: Some(tool.agent()),
                    artifact: None,
                },
            },
            None => ExecutedTool {
                name: name.to_string(),
                payload: json!({"error": "Function not found"}),
                agent: None,
                artifact: None,
            },
        };

        let outcome = if executed.agent.is_none() {
            "unknown"
        } else if executed.payload.get("error").is_some() {
            "error"
        } else {
            "ok"
        };
        let audit = json!({
            "event": "tool_audit",
            "tool": name,
            "outcome": outcome,
            "duration_ms": start.elapsed().as_millis() as u64,
            "args_preview": args_preview(args),
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        executed
    }
}

fn args_preview(args: &Value) -> String {
    let s = args.to_string();
    if s.len() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use crate::tools::full_catalog;
    use std::sync::Arc;

    fn executor() -> ToolExecutor {
        ToolExecutor::new(full_catalog(Arc::new(RecordStore::seeded())))
    }

    #[test]
    fn test_unknown_tool_keeps_attribution_unset() {
        let executed = executor().execute("selfDestruct", &json!({}));
        assert_eq!(executed.payload["error"], "Function not found");
        assert!(executed.agent.is_none());
        assert!(executed.artifact.is_none());
    }

    #[test]
    fn test_handler_error_is_folded_into_payload() {
        let executed = executor().execute("cancelAppointment", &json!({"appointmentId": "A999"}));
        assert_eq!(executed.payload["error"], "Janji temu tidak ditemukan.");
        // 错误载荷仍然归因到能力本身
        assert_eq!(executed.agent, Some(AgentKind::Scheduler));
    }

    #[test]
    fn test_success_carries_agent_and_payload() {
        let executed = executor().execute("getBillingInfo", &json!({"patientId": "P002"}));
        assert_eq!(executed.agent, Some(AgentKind::Billing));
        assert_eq!(executed.payload[0]["amount"], 750_000);
    }
}
