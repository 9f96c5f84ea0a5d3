//! 预约能力：查询、建立、改期、取消
//!
//! 四个能力共用 Penjadwal Janji Temu 归因；改期与取消要求 ID 可解析，
//! 不可解析时以印尼语错误返回（循环内可恢复，由决策服务向用户追问）。

use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::RecordStore;
use crate::tools::registry::{required_str, AgentKind, CapabilityTool, ToolReply};

/// getAppointments：某患者的全部预约；空结果回报专门标记而非空数组
pub struct GetAppointmentsTool {
    store: Arc<RecordStore>,
}

impl GetAppointmentsTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for GetAppointmentsTool {
    fn name(&self) -> &str {
        "getAppointments"
    }

    fn description(&self) -> &str {
        "Melihat daftar semua janji temu seorang pasien. Gunakan ini sebelum \
         menjadwal ulang atau membatalkan untuk mendapatkan ID janji temu."
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
        AgentKind::Scheduler
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let patient_id = required_str(args, "patientId")?;
        let appointments = self.store.appointments_for(patient_id);
        let payload = if appointments.is_empty() {
            json!({"message": "Tidak ada janji temu ditemukan untuk pasien ini."})
        } else {
            serde_json::to_value(appointments)
                .map_err(|e| format!("Serialize appointments: {}", e))?
        };
        Ok(ToolReply::payload(payload))
    }
}

/// scheduleAppointment：建立新预约，ID 单调分配，状态 Scheduled
pub struct ScheduleAppointmentTool {
    store: Arc<RecordStore>,
}

impl ScheduleAppointmentTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for ScheduleAppointmentTool {
    fn name(&self) -> &str {
        "scheduleAppointment"
    }

    fn description(&self) -> &str {
        "Menjadwalkan janji temu BARU. Gunakan ini untuk Penjadwal Janji Temu."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patientId": { "type": "string", "description": "ID Pasien" },
                "doctorName": { "type": "string", "description": "Nama Dokter" },
                "date": {
                    "type": "string",
                    "description": "Tanggal dan Jam (Format: YYYY-MM-DD HH:MM)"
                }
            },
            "required": ["patientId", "doctorName", "date"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::Scheduler
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let patient_id = required_str(args, "patientId")?;
        let doctor = required_str(args, "doctorName")?;
        let date = required_str(args, "date")?;
        let appointment = self.store.schedule(patient_id, doctor, date);
        Ok(ToolReply::payload(json!({
            "message": "Janji temu berhasil dibuat",
            "detail": appointment,
        })))
    }
}

/// rescheduleAppointment：更新日期并强制状态回 Scheduled
pub struct RescheduleAppointmentTool {
    store: Arc<RecordStore>,
}

impl RescheduleAppointmentTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for RescheduleAppointmentTool {
    fn name(&self) -> &str {
        "rescheduleAppointment"
    }

    fn description(&self) -> &str {
        "Mengubah jadwal (Reschedule) janji temu yang sudah ada."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "appointmentId": {
                    "type": "string",
                    "description": "ID Janji Temu (Dapatkan dari tool getAppointments)"
                },
                "newDate": {
                    "type": "string",
                    "description": "Tanggal dan Jam Baru (Format: YYYY-MM-DD HH:MM)"
                }
            },
            "required": ["appointmentId", "newDate"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::Scheduler
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let appointment_id = required_str(args, "appointmentId")?;
        let new_date = required_str(args, "newDate")?;
        match self.store.reschedule(appointment_id, new_date) {
            Some(appointment) => Ok(ToolReply::payload(json!({
                "message": "Janji temu berhasil dijadwal ulang",
                "detail": appointment,
            }))),
            None => Err("Janji temu tidak ditemukan atau ID salah.".to_string()),
        }
    }
}

/// cancelAppointment：状态置 Cancelled
pub struct CancelAppointmentTool {
    store: Arc<RecordStore>,
}

impl CancelAppointmentTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl CapabilityTool for CancelAppointmentTool {
    fn name(&self) -> &str {
        "cancelAppointment"
    }

    fn description(&self) -> &str {
        "Membatalkan janji temu yang sudah ada."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "appointmentId": {
                    "type": "string",
                    "description": "ID Janji Temu (Dapatkan dari tool getAppointments)"
                }
            },
            "required": ["appointmentId"]
        })
    }

    fn agent(&self) -> AgentKind {
        AgentKind::Scheduler
    }

    fn call(&self, args: &Value) -> Result<ToolReply, String> {
        let appointment_id = required_str(args, "appointmentId")?;
        match self.store.cancel(appointment_id) {
            Some(appointment) => Ok(ToolReply::payload(json!({
                "message": "Janji temu berhasil dibatalkan",
                "detail": appointment,
            }))),
            None => Err("Janji temu tidak ditemukan.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AppointmentStatus;

    fn store() -> Arc<RecordStore> {
        Arc::new(RecordStore::seeded())
    }

    #[test]
    fn test_get_appointments_empty_marker() {
        let store = store();
        let tool = GetAppointmentsTool::new(store);
        let reply = tool.call(&json!({"patientId": "P999"})).unwrap();
        assert_eq!(
            reply.payload["message"],
            "Tidak ada janji temu ditemukan untuk pasien ini."
        );
    }

    #[test]
    fn test_get_appointments_lists_for_patient() {
        let tool = GetAppointmentsTool::new(store());
        let reply = tool.call(&json!({"patientId": "P002"})).unwrap();
        let list = reply.payload.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], "A002");
        assert_eq!(list[0]["patientId"], "P002");
    }

    #[test]
    fn test_schedule_reports_detail() {
        let tool = ScheduleAppointmentTool::new(store());
        let reply = tool
            .call(&json!({
                "patientId": "P001",
                "doctorName": "Dr. Dewi Sp.OG",
                "date": "2024-03-01 10:00"
            }))
            .unwrap();
        assert_eq!(reply.payload["message"], "Janji temu berhasil dibuat");
        assert_eq!(reply.payload["detail"]["status"], "Scheduled");
        assert_eq!(reply.payload["detail"]["doctor"], "Dr. Dewi Sp.OG");
    }

    #[test]
    fn test_reschedule_unknown_id() {
        let tool = RescheduleAppointmentTool::new(store());
        let err = tool
            .call(&json!({"appointmentId": "A999", "newDate": "2024-03-02 08:00"}))
            .unwrap_err();
        assert_eq!(err, "Janji temu tidak ditemukan atau ID salah.");
    }

    #[test]
    fn test_cancel_then_reschedule_reactivates() {
        let store = store();
        let cancel = CancelAppointmentTool::new(store.clone());
        let reschedule = RescheduleAppointmentTool::new(store.clone());

        let cancelled = cancel.call(&json!({"appointmentId": "A002"})).unwrap();
        assert_eq!(cancelled.payload["detail"]["status"], "Cancelled");

        let restored = reschedule
            .call(&json!({"appointmentId": "A002", "newDate": "2024-04-01 13:00"}))
            .unwrap();
        assert_eq!(restored.payload["detail"]["status"], "Scheduled");
        assert_eq!(restored.payload["detail"]["date"], "2024-04-01 13:00");

        let stored = store
            .appointments_for("P002")
            .into_iter()
            .find(|a| a.id == "A002")
            .unwrap();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_cancel_unknown_id() {
        let tool = CancelAppointmentTool::new(store());
        let err = tool.call(&json!({"appointmentId": "A999"})).unwrap_err();
        assert_eq!(err, "Janji temu tidak ditemukan.");
    }
}
