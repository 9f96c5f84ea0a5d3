//! 病历能力：riwayat 查询与正式文档合成

use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::RecordStore;
use crate::tools::registry::{
    required_str, AgentKind, CapabilityTool, DocKind, GeneratedDocument, ToolReply,
};

/// getMedicalRecords：返回患者病史列表
pub struct GetMedicalRecordsTool {
    store: Arc<RecordStore>,
}

impl GetMedicalRecordsTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for GetMedicalRecordsTool {
    fn name(&self) -> &str {
        "getMedicalRecords"
    }

    fn description(&self) -> &str {
        "Mengambil riwayat medis pasien. Gunakan ini untuk Agen Rekam Medis."
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
        AgentKind::MedicalRecords
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let patient_id = required_str(args, "patientId")?;
        let payload = match self.store.patient_by_id(patient_id) {
            Some(patient) => json!({"history": patient.history}),
            None => json!({"message": "Data medis tidak ditemukan"}),
        };
        Ok(ToolReply::payload(payload))
    }
}

/// generateDocument：合成正式病历文档，作为与文本回复分离的旁路工件发出
pub struct GenerateDocumentTool {
    store: Arc<RecordStore>,
}

impl GenerateDocumentTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for GenerateDocumentTool {
    fn name(&self) -> &str {
        "generateDocument"
    }

    fn description(&self) -> &str {
        "Membuat dokumen resmi (PDF/DOCX) untuk rekam medis atau rujukan."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patientId": { "type": "string", "description": "ID Pasien" },
                "docType": {
                    "type": "string",
                    "description": "Jenis dokumen (medical_record, referral)"
                }
            },
            "required": ["patientId", "docType"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::MedicalRecords
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let patient_id = required_str(args, "patientId")?;
        let _doc_type = required_str(args, "docType")?;
        match self.store.medical_record_doc(patient_id) {
            Some(content) => Ok(ToolReply::with_artifact(
                json!({"success": true, "message": "Dokumen telah dibuat."}),
                GeneratedDocument {
                    title: format!("Rekam_Medis_{}.pdf", patient_id),
                    content,
                    kind: DocKind::Pdf,
                },
            )),
            None => Err("Pasien tidak valid.".to_string()),
        }
    }
}
