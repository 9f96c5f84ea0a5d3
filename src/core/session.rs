//! 会话生命周期
//!
//! 一个 ChatSession 绑定一个凭证：持有决策客户端、线级 transcript、调度配置与取消监管。
//! 重新配置即构造新会话（旧 transcript 随之丢弃）；交换严格串行（&mut self）。
//! 对话边界不可失败：内部错误记录日志后映射为协调员致歉。

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::core::{CoordinatorError, SessionSupervisor};
use crate::decision::{Content, DecisionClient, GeminiClient, MockDecisionClient};
use crate::dispatch::{run_exchange, ChatOutcome, DispatchOptions};
use crate::store::RecordStore;
use crate::tools::{full_catalog, ToolExecutor, ToolRegistry};

/// 传输故障的通用致歉（连接 / 凭证 / 超时）
const APOLOGY_TRANSPORT: &str =
    "Maaf, terjadi kesalahan saat menghubungkan ke server AI. Periksa koneksi atau API Key Anda.";
/// 轮数超限的专门致歉：与传输故障区分开
const APOLOGY_ROUND_LIMIT: &str =
    "Maaf, permintaan ini memerlukan terlalu banyak langkah dan tidak dapat saya selesaikan. \
     Coba pecah permintaan Anda menjadi beberapa bagian.";
/// 用户取消时的回复
const APOLOGY_CANCELLED: &str = "Permintaan dibatalkan.";

/// 内置协调员 system 指令；config/prompts/system.txt 存在时优先使用文件内容
const DEFAULT_SYSTEM_PROMPT: &str = r#"Anda adalah Koordinator Sistem Rumah Sakit (SIMRS) yang cerdas dengan arsitektur Agentic.
Tugas Anda adalah menganalisis permintaan pengguna dan mendelegasikannya ke sub-agen yang tepat.

PERAN SUB-AGEN & INSTRUKSI:

1. Agen Informasi Pasien (Tool: 'getPatientInfo')
   - Tugas: Mengelola pendaftaran, pembaruan detail, dan pengambilan info pasien.
   - Output: Berikan info pasien yang diminta atau konfirmasi pembaruan.

2. Penjadwal Janji Temu (Tools: 'scheduleAppointment', 'getAppointments', 'rescheduleAppointment', 'cancelAppointment')
   - Tugas: Menjadwalkan, menjadwal ulang, dan membatalkan janji temu.
   - INSTRUKSI KHUSUS:
     - Untuk menjadwal ulang (reschedule) atau membatalkan (cancel), Anda HARUS menggunakan 'getAppointments' terlebih dahulu untuk melihat ID janji temu pasien.
     - Setelah mendapatkan ID, baru panggil 'rescheduleAppointment' atau 'cancelAppointment'.
   - Output: Konfirmasi status (terjadwal/batal) dengan detail dokter, waktu, dan pasien.

3. Agen Rekam Medis (Tool: 'getMedicalRecords', 'generateDocument')
   - Tugas: Memproses permintaan riwayat medis, diagnosis, dan hasil tes.
   - Output: Sajikan data medis secara rahasia. Gunakan 'generateDocument' untuk membuat laporan terstruktur.

4. Agen Penagihan & Asuransi (Tool: 'getBillingInfo')
   - Tugas: Menangani pertanyaan faktur, klaim BPJS, dan status pembayaran.
   - Output: Jelaskan status tagihan dan cakupan asuransi secara komprehensif.

ATURAN UTAMA:
- Jika pengguna bertanya tentang hal umum (misal: "Apa gejala flu?"), gunakan pencarian web untuk grounding fakta.
- Gunakan Function Calling untuk data spesifik RS. Jangan pernah mengarang data pasien.
- Jika tool mengembalikan error (misal ID tidak valid), tanyakan kembali detail yang benar kepada pengguna.
- Jawablah selalu dalam Bahasa Indonesia."#;

/// 读取协调员提示词：配置路径 > 默认路径 > 内置文本
fn load_system_prompt(cfg: &AppConfig) -> String {
    if let Some(path) = &cfg.app.system_prompt_path {
        if let Ok(text) = std::fs::read_to_string(path) {
            return text;
        }
    }
    ["config/prompts/system.txt", "../config/prompts/system.txt"]
        .into_iter()
        .find_map(|p| std::fs::read_to_string(p).ok())
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
}

/// 一次活跃交换上下文：决策客户端 + 能力执行器 + 线级 transcript
pub struct ChatSession {
    client: Arc<dyn DecisionClient>,
    executor: ToolExecutor,
    options: DispatchOptions,
    transcript: Vec<Content>,
    supervisor: SessionSupervisor,
}

impl ChatSession {
    /// 以任意客户端与注册表组装会话（测试与管理面复用）
    pub fn new(
        client: Arc<dyn DecisionClient>,
        registry: ToolRegistry,
        options: DispatchOptions,
    ) -> Self {
        Self {
            client,
            executor: ToolExecutor::new(registry),
            options,
            transcript: Vec::new(),
            supervisor: SessionSupervisor::new(),
        }
    }

    /// 按配置与凭证装配会话：有凭证走 Gemini，无凭证回落 Mock（本地演示）。
    /// 再次调用即重新配置——返回的新会话不携带任何旧 transcript。
    pub fn configure(
        cfg: &AppConfig,
        credential: Option<&str>,
        store: Arc<RecordStore>,
    ) -> Self {
        let registry = full_catalog(store);
        let options = DispatchOptions {
            max_tool_rounds: cfg.decision.max_tool_rounds,
            request_timeout: Duration::from_secs(cfg.decision.request_timeout_secs),
        };
        let client: Arc<dyn DecisionClient> = match credential {
            Some(key) => Arc::new(GeminiClient::new(
                key,
                &cfg.decision.model,
                &cfg.decision.base_url,
                &load_system_prompt(cfg),
                registry.function_declarations(),
            )),
            None => {
                tracing::warn!("GEMINI_API_KEY not set, using mock decision client");
                Arc::new(MockDecisionClient::scripted(Vec::new()))
            }
        };
        Self::new(client, registry, options)
    }

    /// 处理一条用户话语直至交换完成。对话边界不可失败：
    /// 传输故障与轮数超限映射为致歉结果，transcript 回滚到交换前。
    pub async fn send(&mut self, utterance: &str) -> ChatOutcome {
        let committed_len = self.transcript.len();
        let cancel = self.supervisor.begin();
        let result = run_exchange(
            self.client.as_ref(),
            &self.executor,
            &self.options,
            &mut self.transcript,
            utterance,
            cancel,
        )
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                // 回滚：历史中不残留未应答的工具调用
                self.transcript.truncate(committed_len);
                tracing::warn!(error = %e, "exchange aborted");
                match e {
                    CoordinatorError::RoundLimitExceeded(_) => {
                        ChatOutcome::apology(APOLOGY_ROUND_LIMIT)
                    }
                    CoordinatorError::Cancelled => ChatOutcome::apology(APOLOGY_CANCELLED),
                    CoordinatorError::DecisionService(_)
                    | CoordinatorError::DecisionTimeout(_) => {
                        ChatOutcome::apology(APOLOGY_TRANSPORT)
                    }
                }
            }
        }
    }

    /// 取消当前正在进行的决策服务调用
    pub fn cancel(&self) {
        self.supervisor.cancel();
    }

    /// 清空 transcript（会话保持同一凭证）
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// 线级历史快照（显示层历史是外部协作者的职责，这里只为协议所需）
    pub fn transcript(&self) -> &[Content] {
        &self.transcript
    }
}
