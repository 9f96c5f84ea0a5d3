//! SIMRS - 医院信息系统智能协调核心
//!
//! 入口：初始化日志、播种记录库、装配会话，运行 stdin 聊天循环。
//! 管理面命令（仪表盘协作者，目录之外）：
//!   :pasien / :janji / :tagihan / :bayar <billId> / :reset / :keluar
//!
//! 环境变量:
//! - GEMINI_API_KEY: 决策服务凭证；未设置时回落 Mock 客户端（仅本地演示）

use std::sync::Arc;

use anyhow::Context;
use simrs::config::{load_config, AppConfig};
use simrs::core::ChatSession;
use simrs::store::RecordStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let store = Arc::new(RecordStore::seeded());
    let credential = std::env::var("GEMINI_API_KEY").ok();
    let mut session = ChatSession::configure(&cfg, credential.as_deref(), store.clone());

    println!(
        "Halo! Saya adalah Koordinator Sistem Rumah Sakit (SIMRS). Saya dapat membantu Anda \
         dengan Informasi Pasien, Penjadwalan, Rekam Medis, atau Billing."
    );
    println!("Perintah admin: :pasien :janji :tagihan :bayar <id> :reset :keluar");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await.context("Read stdin")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":keluar" => break,
            ":reset" => {
                session.reset();
                println!("Percakapan direset.");
            }
            ":pasien" => {
                for p in store.all_patients() {
                    println!("{}  {}  lahir {}  BPJS {}", p.id, p.name, p.dob, p.bpjs_number);
                }
            }
            ":janji" => {
                for a in store.all_appointments() {
                    println!("{}  {}  {}  {}  [{}]", a.id, a.patient_id, a.doctor, a.date, a.status);
                }
            }
            ":tagihan" => {
                for b in store.all_bills() {
                    println!(
                        "{}  {}  Rp{}  [{}]  asuransi: {}",
                        b.bill.id,
                        b.patient_name,
                        b.bill.amount,
                        b.bill.status,
                        if b.bill.insurance_covered { "ya" } else { "tidak" }
                    );
                }
            }
            _ if input.starts_with(":bayar") => {
                match input.split_whitespace().nth(1) {
                    Some(bill_id) if store.pay_bill(bill_id) => {
                        println!("Tagihan {} ditandai lunas.", bill_id);
                    }
                    Some(bill_id) => println!("Tagihan {} tidak ditemukan.", bill_id),
                    None => println!("Pemakaian: :bayar <billId>"),
                }
            }
            utterance => {
                let outcome = session.send(utterance).await;
                println!("[{}] {}", outcome.agent, outcome.text);
                for url in &outcome.grounding_urls {
                    println!("  Sumber: {}", url);
                }
                if let Some(doc) = &outcome.document {
                    println!("  Dokumen dibuat: {}", doc.title);
                }
            }
        }
    }

    Ok(())
}
