//! 患者信息能力

use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::RecordStore;
use crate::tools::registry::{required_str, AgentKind, CapabilityTool, ToolReply};

/// getPatientInfo：按姓名（不区分大小写子串）或精确 ID 查患者
pub struct GetPatientInfoTool {
    store: Arc<RecordStore>,
}

impl GetPatientInfoTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for GetPatientInfoTool {
    fn name(&self) -> &str {
        "getPatientInfo"
    }

    fn description(&self) -> &str {
        "Mengambil informasi dasar pasien berdasarkan nama atau ID. \
         Gunakan ini untuk Agen Informasi Pasien."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Nama pasien atau ID pasien (contoh: P001)"
                }
            },
            "required": ["query"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::PatientInfo
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let query = required_str(args, "query")?;
        let payload = match self.store.patient_by_query(query) {
            Some(patient) => serde_json::to_value(patient)
                .map_err(|e| format!("Serialize patient: {}", e))?,
            None => json!({"message": "Pasien tidak ditemukan."}),
        };
        Ok(ToolReply::payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> GetPatientInfoTool {
        GetPatientInfoTool::new(Arc::new(RecordStore::seeded()))
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let tool = tool();
        let by_name = tool.call(&json!({"query": "siti"})).unwrap();
        assert_eq!(by_name.payload["id"], "P002");

        let by_id = tool.call(&json!({"query": "P001"})).unwrap();
        assert_eq!(by_id.payload["name"], "Budi Santoso");
        assert_eq!(by_id.payload["bpjsNumber"], "000123456789");
    }

    #[test]
    fn test_not_found_marker() {
        let reply = tool().call(&json!({"query": "tidak ada"})).unwrap();
        assert_eq!(reply.payload["message"], "Pasien tidak ditemukan.");
    }

    #[test]
    fn test_missing_query_is_argument_fault() {
        let err = tool().call(&json!({})).unwrap_err();
        assert!(err.contains("query"));
    }
}
