//! 能力目录：8 个确定性处理器、注册表与执行器

pub mod billing;
pub mod executor;
pub mod patient_info;
pub mod records;
pub mod registry;
pub mod scheduling;

use std::sync::Arc;

use crate::store::RecordStore;

pub use billing::GetBillingInfoTool;
pub use executor::{ExecutedTool, ToolExecutor};
pub use patient_info::GetPatientInfoTool;
pub use records::{GenerateDocumentTool, GetMedicalRecordsTool};
pub use registry::{
    AgentKind, CapabilityTool, DocKind, GeneratedDocument, ToolRegistry, ToolReply,
};
pub use scheduling::{
    CancelAppointmentTool, GetAppointmentsTool, RescheduleAppointmentTool,
    ScheduleAppointmentTool,
};

/// 注册完整目录（8 个能力），声明顺序即发给决策服务的顺序
pub fn full_catalog(store: Arc<RecordStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(GetPatientInfoTool::new(store.clone()));
    registry.register(ScheduleAppointmentTool::new(store.clone()));
    registry.register(GetAppointmentsTool::new(store.clone()));
    registry.register(RescheduleAppointmentTool::new(store.clone()));
    registry.register(CancelAppointmentTool::new(store.clone()));
    registry.register(GetMedicalRecordsTool::new(store.clone()));
    registry.register(GetBillingInfoTool::new(store.clone()));
    registry.register(GenerateDocumentTool::new(store));
    registry
}
