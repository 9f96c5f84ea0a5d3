//! 记录实体：患者、预约、账单
//!
//! 字段随工具载荷原样序列化给决策服务（camelCase），枚举值与对话中展示的状态文本一致。

use serde::{Deserialize, Serialize};

/// 患者：播种后不可变
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub dob: String,
    /// BPJS（国民医保）参保号
    pub bpjs_number: String,
    /// 病史条目，按记录顺序保存
    pub history: Vec<String>,
}

/// 预约状态。合法迁移：Scheduled -> Cancelled、Scheduled -> Completed、
/// Cancelled -> Scheduled（通过改期重新激活）；Completed 为终态。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// 预约：date 为 "YYYY-MM-DD HH:MM" 形式的不透明字符串
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor: String,
    pub date: String,
    pub status: AppointmentStatus,
}

/// 账单状态：Pending -> Paid 单向，且只能经管理面 pay_bill 发生
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillStatus {
    Paid,
    Pending,
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// 账单：金额以卢比整数计
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub patient_id: String,
    pub amount: u64,
    pub status: BillStatus,
    pub insurance_covered: bool,
}

/// 管理面账单视图：账单附带解析出的患者姓名
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOverview {
    #[serde(flatten)]
    pub bill: Bill,
    pub patient_name: String,
}
