//! 会话控制器：think / act / observe 循环
//!
//! 每轮迭代恰好两处暂停点：等待引擎回复、等待工具结果；全程单逻辑线程，
//! 无并发在途调用。TOOL 的 Observation 必须在下一次引擎调用前写入日志。
//! 协议违规（JSON 错误、未识别种类、未知工具）降级为 developer 提示继续循环；
//! 只有取消、LLM 传输失败与步数预算耗尽会终止会话。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::protocol::{self, Step};
use crate::session::events::{send_event, SessionEvent};
use crate::session::prompt::build_system_prompt;
use crate::session::{Message, MessageLog};
use crate::tools::{ToolName, ToolRegistry};

/// Observation 预览最大字符数（进度行展示用）
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 会话执行结果：最终回复与完整消息日志
#[derive(Debug)]
pub struct SessionResult {
    pub response: String,
    pub messages: Vec<Message>,
}

/// 控制器状态机（迁移只用于日志与断言，分支逻辑由 Step 种类驱动）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Starting,
    Thinking,
    AwaitingTool,
    Outputting,
    Done,
}

/// 会话控制器：持有引擎客户端、封闭工具注册表与步数预算
pub struct ConversationController {
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    max_steps: usize,
    cancel_token: CancellationToken,
    event_tx: Option<UnboundedSender<SessionEvent>>,
}

impl ConversationController {
    pub fn new(llm: Arc<dyn LlmClient>, registry: ToolRegistry, max_steps: usize) -> Self {
        Self {
            llm,
            registry,
            max_steps,
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    /// 设置取消令牌（操作员中断）
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// 设置进度事件通道
    pub fn with_event_tx(mut self, tx: UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// 运行一个会话：种子消息 -> 循环至 OUTPUT / 预算耗尽 / 取消
    pub async fn run(&self, prompt: &str) -> Result<SessionResult, AgentError> {
        let system = build_system_prompt(&self.registry);
        let mut log = MessageLog::seeded(system, prompt);
        let mut state = SessionState::Starting;

        let mut step = 0usize;
        loop {
            if self.cancel_token.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            if step >= self.max_steps {
                tracing::warn!(max_steps = self.max_steps, "loop budget exceeded");
                return Err(AgentError::LoopBudgetExceeded(self.max_steps));
            }
            step += 1;

            let reply = self
                .llm
                .complete(log.messages())
                .await
                .map_err(AgentError::LlmError)?;

            // 回复原文先入日志再解析：模型下一轮必须能看到自己上一步的记录
            log.push(Message::assistant(reply.clone()));

            match protocol::parse_step(&reply) {
                Ok(parsed) => {
                    tracing::info!(step = parsed.kind(), iteration = step, "session step");
                    match parsed {
                        Step::Start { content } => {
                            state = SessionState::Starting;
                            send_event(&self.event_tx, SessionEvent::Started { content });
                        }
                        Step::Think { content } => {
                            state = SessionState::Thinking;
                            send_event(&self.event_tx, SessionEvent::Thinking { content });
                        }
                        Step::Tool { tool_name, input } => {
                            state = SessionState::AwaitingTool;
                            self.dispatch_tool(&mut log, &tool_name, &input).await;
                        }
                        Step::Output { content } => {
                            state = SessionState::Outputting;
                            tracing::debug!(state = ?state, "emitting final output");
                            send_event(
                                &self.event_tx,
                                SessionEvent::Output {
                                    content: content.clone(),
                                },
                            );
                            state = SessionState::Done;
                            tracing::debug!(state = ?state, iterations = step, "session complete");
                            return Ok(SessionResult {
                                response: content,
                                messages: log.messages().to_vec(),
                            });
                        }
                    }
                }
                Err(e) if e.is_protocol_error() => {
                    // 结构错误与未识别种类同策略：写回提示，让模型重发一条合法记录
                    tracing::warn!(error = %e, "protocol slip, asking model to re-emit");
                    send_event(
                        &self.event_tx,
                        SessionEvent::ProtocolSlip {
                            detail: e.to_string(),
                        },
                    );
                    log.push(Message::developer(format!(
                        "Your last reply did not follow the protocol ({e}). Reply with exactly one JSON object of the form {{\"step\": \"START\"|\"THINK\"|\"TOOL\"|\"OUTPUT\", ...}}."
                    )));
                }
                Err(e) => return Err(e),
            }

            tracing::debug!(state = ?state, iteration = step, "state transition");
        }
    }

    /// TOOL 分支：未知工具写回 developer 提示；已注册工具等待结果并立即追加 Observation
    async fn dispatch_tool(&self, log: &mut MessageLog, tool_name: &str, input: &str) {
        let Some(name) = ToolName::parse(tool_name) else {
            tracing::warn!(tool = %tool_name, "no such tool");
            send_event(
                &self.event_tx,
                SessionEvent::UnknownTool {
                    name: tool_name.to_string(),
                },
            );
            log.push(Message::developer(format!(
                "There is no such tool '{tool_name}'."
            )));
            return;
        };

        send_event(
            &self.event_tx,
            SessionEvent::ToolCall {
                tool: name.as_str().to_string(),
                input: input.to_string(),
            },
        );

        // 能力契约：invoke 永不失败，故障已渲染为文本
        let result = self.registry.get(name).invoke(input).await;

        let preview: String = result.chars().take(OBSERVATION_PREVIEW_CHARS).collect();
        let preview = if result.chars().count() > OBSERVATION_PREVIEW_CHARS {
            format!("{preview}...")
        } else {
            preview
        };
        send_event(
            &self.event_tx,
            SessionEvent::Observation {
                tool: name.as_str().to_string(),
                preview,
            },
        );

        // 协议不变量：Observation 紧跟 TOOL 步骤、先于下一次引擎调用入日志
        log.push(protocol::observation(&result));
    }
}
