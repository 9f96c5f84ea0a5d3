//! 账单能力
//!
//! 只读：对话面永远不能把账单标记为已付，Pending -> Paid 只经管理面发生。

use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::RecordStore;
use crate::tools::registry::{required_str, AgentKind, CapabilityTool, ToolReply};

/// getBillingInfo：患者的账单与保险覆盖情况
pub struct GetBillingInfoTool {
    store: Arc<RecordStore>,
}

impl GetBillingInfoTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for GetBillingInfoTool {
    fn name(&self) -> &str {
        "getBillingInfo"
    }

    fn description(&self) -> &str {
        "Mengecek status tagihan atau asuransi. Gunakan ini untuk Agen Penagihan."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patientId": { "type": "string", "description": "ID Pasien" }
            },
            "required": ["patientId"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::Billing
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let patient_id = required_str(args, "patientId")?;
        let bills = self.store.bills_for(patient_id);
        let payload = if bills.is_empty() {
            json!({"message": "Tidak ada tagihan tertunggak."})
        } else {
            serde_json::to_value(bills).map_err(|e| format!("Serialize bills: {}", e))?
        };
        Ok(ToolReply::payload(payload))
    }
}
