//! 内存记录库
//!
//! 进程启动时播种一次，无持久化。预约与账单各自用 Mutex 守护（并发会话下
//! 保住状态迁移不变量）；患者播种后只读。新预约 ID 由单调计数器分配，
//! 从播种数据的最大序号继续，唯一性是确定性的。

pub mod records;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

pub use records::{Appointment, AppointmentStatus, Bill, BillOverview, BillStatus, Patient};

/// 患者 / 预约 / 账单的权威持有者；以 Arc 传入工具构造
pub struct RecordStore {
    patients: Vec<Patient>,
    appointments: Mutex<Vec<Appointment>>,
    bills: Mutex<Vec<Bill>>,
    /// 下一个预约序号（已含播种数据的最大值）
    next_appointment: AtomicU32,
}

/// 锁中毒时取回内部数据继续使用：库内临界区不含可恐慌代码
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl RecordStore {
    /// 以给定记录构建；预约计数器从现有 "A<nnn>" ID 的最大序号继续
    pub fn with_data(
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
        bills: Vec<Bill>,
    ) -> Self {
        let max_seq = appointments
            .iter()
            .filter_map(|a| a.id.strip_prefix('A'))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Self {
            patients,
            appointments: Mutex::new(appointments),
            bills: Mutex::new(bills),
            next_appointment: AtomicU32::new(max_seq),
        }
    }

    /// 演示播种数据：3 名患者、3 条预约、3 张账单
    pub fn seeded() -> Self {
        let patients = vec![
            Patient {
                id: "P001".into(),
                name: "Budi Santoso".into(),
                dob: "1985-05-20".into(),
                bpjs_number: "000123456789".into(),
                history: vec!["Hipertensi".into(), "Diabetes Tipe 2".into()],
            },
            Patient {
                id: "P002".into(),
                name: "Siti Aminah".into(),
                dob: "1992-11-10".into(),
                bpjs_number: "000987654321".into(),
                history: vec!["Asma Bronkial".into()],
            },
            Patient {
                id: "P003".into(),
                name: "Rina Wijaya".into(),
                dob: "1988-03-15".into(),
                bpjs_number: "000456789123".into(),
                history: vec!["Alergi Obat".into(), "Gastritis".into()],
            },
        ];
        let appointments = vec![
            Appointment {
                id: "A001".into(),
                patient_id: "P001".into(),
                doctor: "Dr. Andi Sp.PD".into(),
                date: "2023-11-15 10:00".into(),
                status: AppointmentStatus::Completed,
            },
            Appointment {
                id: "A002".into(),
                patient_id: "P002".into(),
                doctor: "Dr. Budi Sp.P".into(),
                date: "2023-12-20 14:00".into(),
                status: AppointmentStatus::Scheduled,
            },
            Appointment {
                id: "A003".into(),
                patient_id: "P003".into(),
                doctor: "Dr. Citra Sp.A".into(),
                date: "2023-12-21 09:00".into(),
                status: AppointmentStatus::Scheduled,
            },
        ];
        let bills = vec![
            Bill {
                id: "B001".into(),
                patient_id: "P001".into(),
                amount: 150_000,
                status: BillStatus::Paid,
                insurance_covered: true,
            },
            Bill {
                id: "B002".into(),
                patient_id: "P002".into(),
                amount: 750_000,
                status: BillStatus::Pending,
                insurance_covered: false,
            },
            Bill {
                id: "B003".into(),
                patient_id: "P003".into(),
                amount: 200_000,
                status: BillStatus::Pending,
                insurance_covered: true,
            },
        ];
        Self::with_data(patients, appointments, bills)
    }

    /// 按姓名（不区分大小写的子串）或精确 ID 查找患者
    pub fn patient_by_query(&self, query: &str) -> Option<Patient> {
        let needle = query.to_lowercase();
        self.patients
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .or_else(|| self.patients.iter().find(|p| p.id == query))
            .cloned()
    }

    pub fn patient_by_id(&self, id: &str) -> Option<Patient> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }

    pub fn appointments_for(&self, patient_id: &str) -> Vec<Appointment> {
        lock(&self.appointments)
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// 建立新预约：分配单调唯一 ID，状态 Scheduled
    pub fn schedule(&self, patient_id: &str, doctor: &str, date: &str) -> Appointment {
        let seq = self.next_appointment.fetch_add(1, Ordering::SeqCst) + 1;
        let appointment = Appointment {
            id: format!("A{:03}", seq),
            patient_id: patient_id.to_string(),
            doctor: doctor.to_string(),
            date: date.to_string(),
            status: AppointmentStatus::Scheduled,
        };
        lock(&self.appointments).push(appointment.clone());
        appointment
    }

    /// 改期：更新日期并强制回到 Scheduled（已取消的预约由此重新激活）；ID 不存在返回 None
    pub fn reschedule(&self, appointment_id: &str, new_date: &str) -> Option<Appointment> {
        let mut appointments = lock(&self.appointments);
        let appointment = appointments.iter_mut().find(|a| a.id == appointment_id)?;
        appointment.date = new_date.to_string();
        appointment.status = AppointmentStatus::Scheduled;
        Some(appointment.clone())
    }

    /// 取消预约；ID 不存在返回 None
    pub fn cancel(&self, appointment_id: &str) -> Option<Appointment> {
        let mut appointments = lock(&self.appointments);
        let appointment = appointments.iter_mut().find(|a| a.id == appointment_id)?;
        appointment.status = AppointmentStatus::Cancelled;
        Some(appointment.clone())
    }

    pub fn bills_for(&self, patient_id: &str) -> Vec<Bill> {
        lock(&self.bills)
            .iter()
            .filter(|b| b.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// 正式病历文本：嵌入 ID、姓名与以 ", " 连接的病史；患者不存在返回 None
    pub fn medical_record_doc(&self, patient_id: &str) -> Option<String> {
        let patient = self.patient_by_id(patient_id)?;
        Some(format!(
            "LAPORAN MEDIS RESMI\nNama: {}\nID: {}\nRiwayat: {}\n\n\
             Dokumen ini dihasilkan secara otomatis dan valid untuk keperluan administrasi.",
            patient.name,
            patient.id,
            patient.history.join(", ")
        ))
    }

    // ── 管理面（仅供管理界面消费，会话工具无法到达）─────────────────

    pub fn all_patients(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    pub fn all_appointments(&self) -> Vec<Appointment> {
        lock(&self.appointments).clone()
    }

    /// 全部账单，附带解析出的患者姓名（无匹配时为 "Unknown"）
    pub fn all_bills(&self) -> Vec<BillOverview> {
        lock(&self.bills)
            .iter()
            .map(|b| BillOverview {
                bill: b.clone(),
                patient_name: self
                    .patient_by_id(&b.patient_id)
                    .map(|p| p.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect()
    }

    /// 标记账单已付；账单不存在返回 false。Pending -> Paid 的唯一入口。
    pub fn pay_bill(&self, bill_id: &str) -> bool {
        let mut bills = lock(&self.bills);
        match bills.iter_mut().find(|b| b.id == bill_id) {
            Some(bill) => {
                bill.status = BillStatus::Paid;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_query_matches_name_substring_case_insensitive() {
        let store = RecordStore::seeded();
        let patient = store.patient_by_query("budi").unwrap();
        assert_eq!(patient.id, "P001");
        let patient = store.patient_by_query("AMINAH").unwrap();
        assert_eq!(patient.id, "P002");
    }

    #[test]
    fn test_patient_query_matches_exact_id() {
        let store = RecordStore::seeded();
        assert_eq!(store.patient_by_query("P003").unwrap().name, "Rina Wijaya");
        assert!(store.patient_by_query("P999").is_none());
    }

    #[test]
    fn test_schedule_allocates_unique_monotonic_ids() {
        let store = RecordStore::seeded();
        let mut seen = std::collections::HashSet::new();
        for a in store.all_appointments() {
            seen.insert(a.id);
        }
        // 快速连续建立也不会碰撞
        for _ in 0..50 {
            let appt = store.schedule("P001", "Dr. Andi Sp.PD", "2024-01-01 08:00");
            assert_eq!(appt.status, AppointmentStatus::Scheduled);
            assert!(seen.insert(appt.id), "duplicate appointment id");
        }
        // 播种最大为 A003，新 ID 从 A004 继续
        assert!(seen.contains("A004"));
    }

    #[test]
    fn test_reschedule_unknown_id_mutates_nothing() {
        let store = RecordStore::seeded();
        let before = store.all_appointments();
        assert!(store.reschedule("A999", "2024-02-02 10:00").is_none());
        assert!(store.cancel("A999").is_none());
        assert_eq!(store.all_appointments(), before);
    }

    #[test]
    fn test_cancel_then_reschedule_roundtrip() {
        let store = RecordStore::seeded();
        let cancelled = store.cancel("A002").unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        let restored = store.reschedule("A002", "2024-01-05 09:30").unwrap();
        assert_eq!(restored.status, AppointmentStatus::Scheduled);
        assert_eq!(restored.date, "2024-01-05 09:30");
    }

    #[test]
    fn test_bills_for_patient() {
        let store = RecordStore::seeded();
        let bills = store.bills_for("P002");
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].amount, 750_000);
        assert_eq!(bills[0].status, BillStatus::Pending);
        assert!(!bills[0].insurance_covered);
        assert!(store.bills_for("P999").is_empty());
    }

    #[test]
    fn test_pay_bill_is_one_way() {
        let store = RecordStore::seeded();
        assert!(store.pay_bill("B002"));
        assert_eq!(store.bills_for("P002")[0].status, BillStatus::Paid);
        assert!(!store.pay_bill("B999"));
    }

    #[test]
    fn test_all_bills_resolves_patient_names() {
        let store = RecordStore::with_data(
            vec![],
            vec![],
            vec![Bill {
                id: "B010".into(),
                patient_id: "P777".into(),
                amount: 10_000,
                status: BillStatus::Pending,
                insurance_covered: false,
            }],
        );
        assert_eq!(store.all_bills()[0].patient_name, "Unknown");

        let store = RecordStore::seeded();
        let overview = store.all_bills();
        assert_eq!(overview[0].patient_name, "Budi Santoso");
    }

    #[test]
    fn test_medical_record_doc_embeds_identity_and_history() {
        let store = RecordStore::seeded();
        let doc = store.medical_record_doc("P001").unwrap();
        assert!(doc.contains("Budi Santoso"));
        assert!(doc.contains("P001"));
        assert!(doc.contains("Hipertensi, Diabetes Tipe 2"));
        assert!(store.medical_record_doc("P999").is_none());
    }
}
