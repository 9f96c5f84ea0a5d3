//! 调度主循环
//!
//! AwaitingDecision -> ExecutingTools -> AwaitingDecision（重复）-> Done。
//! 工具请求按到达顺序串行执行（结果必须对应回同一批回报，且部分处理器会改写共享状态）；
//! 归因每轮以最后执行的能力为准；轮数超限与传输故障由调用方转为协调员致歉。

use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::core::CoordinatorError;
use crate::decision::{Content, DecisionClient, DecisionTurn, FunctionResponse};
use crate::dispatch::grounding::{dedupe_grounding, resolve_attribution};
use crate::tools::{AgentKind, GeneratedDocument, ToolExecutor};

/// 决策服务无文本时的兜底回复
const EMPTY_REPLY_FALLBACK: &str = "Maaf, saya tidak dapat memproses permintaan tersebut.";

/// 调度配置：轮数上限与单次决策调用超时，均可由调用方配置
#[derive(Clone, Debug)]
pub struct DispatchOptions {
    /// 单次交换内最大工具轮数，超出即 RoundLimitExceeded
    pub max_tool_rounds: usize,
    /// 单次决策服务调用的期限
    pub request_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_tool_rounds: 6,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// 一次完成的交换：最终文本、归因、来源 URL 与可选文档工件
#[derive(Clone, Debug)]
pub struct ChatOutcome {
    pub text: String,
    pub agent: AgentKind,
    pub grounding_urls: Vec<String>,
    pub document: Option<GeneratedDocument>,
}

impl ChatOutcome {
    /// 协调员层致歉回合（传输故障 / 轮数超限 / 取消时使用）
    pub fn apology(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            agent: AgentKind::Coordinator,
            grounding_urls: Vec::new(),
            document: None,
        }
    }
}

/// 带超时与取消的决策服务调用；取消只作用于这一个悬挂点
async fn await_decision(
    client: &dyn DecisionClient,
    options: &DispatchOptions,
    cancel: &CancellationToken,
    history: &[Content],
) -> Result<DecisionTurn, CoordinatorError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(CoordinatorError::Cancelled),
        outcome = timeout(options.request_timeout, client.request(history)) => match outcome {
            Err(_) => Err(CoordinatorError::DecisionTimeout(
                options.request_timeout.as_secs(),
            )),
            Ok(Err(e)) => Err(CoordinatorError::DecisionService(e)),
            Ok(Ok(turn)) => Ok(turn),
        },
    }
}

/// 驱动一次完整交换：话语入 transcript，循环执行工具轮直到纯文本回合。
///
/// transcript 为会话的线级历史，本函数直接追加；出错时由调用方回滚到调用前长度，
/// 保证历史中不残留未应答的工具调用。
pub async fn run_exchange(
    client: &dyn DecisionClient,
    executor: &ToolExecutor,
    options: &DispatchOptions,
    transcript: &mut Vec<Content>,
    utterance: &str,
    cancel: CancellationToken,
) -> Result<ChatOutcome, CoordinatorError> {
    transcript.push(Content::user_text(utterance));

    let mut agent = AgentKind::Coordinator;
    let mut document: Option<GeneratedDocument> = None;
    let mut rounds = 0usize;

    loop {
        let turn = await_decision(client, options, &cancel, transcript).await?;
        transcript.push(turn.content.clone());

        let calls = turn.invocations();
        if calls.is_empty() {
            // Done：纯文本回合即最终回答，随后跑一次引用来源提取
            let text = turn.reply_text();
            let text = if text.trim().is_empty() {
                EMPTY_REPLY_FALLBACK.to_string()
            } else {
                text
            };
            let grounding_urls = dedupe_grounding(&turn.grounding_urls);
            let agent = resolve_attribution(agent, !grounding_urls.is_empty());
            tracing::debug!(agent = %agent, rounds, "exchange done");
            return Ok(ChatOutcome {
                text,
                agent,
                grounding_urls,
                document,
            });
        }

        rounds += 1;
        if rounds > options.max_tool_rounds {
            return Err(CoordinatorError::RoundLimitExceeded(options.max_tool_rounds));
        }

        let mut responses = Vec::with_capacity(calls.len());
        for call in &calls {
            let executed = executor.execute(&call.name, &call.args);
            // 归因：本轮最后执行的能力胜出；未知名称不改写
            if let Some(capability) = executed.agent {
                agent = capability;
            }
            if let Some(artifact) = executed.artifact {
                document = Some(artifact);
            }
            responses.push(FunctionResponse {
                name: executed.name,
                response: serde_json::json!({"result": executed.payload}),
            });
        }
        transcript.push(Content::tool_results(responses));
    }
}
