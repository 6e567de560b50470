//! Mantis - Rust 终端智能体
//!
//! 入口：初始化日志、加载配置、读取一条用户提示并驱动会话循环；
//! Ctrl+C / SIGTERM 触发优雅关闭（告别语 + 退出码 0）。

use std::sync::Arc;

use anyhow::Context;
use mantis::config::load_config;
use mantis::core::{AgentError, ShutdownManager};
use mantis::llm::OpenAiClient;
use mantis::session::ConversationController;
use mantis::tools::builtin_registry;
use mantis::ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).context("Failed to load configuration")?;

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    ui::print_banner();

    // 提示输入阶段也要响应中断
    let prompt = tokio::select! {
        line = ui::read_prompt() => line.context("Failed to read prompt")?,
        _ = shutdown.wait_for_shutdown() => {
            ui::print_farewell(true);
            return Ok(());
        }
    };
    if prompt.is_empty() {
        ui::print_farewell(false);
        return Ok(());
    }

    let llm = Arc::new(OpenAiClient::new(
        cfg.llm.base_url.as_deref(),
        &cfg.llm.model,
        None,
    ));
    let registry = builtin_registry(&cfg.tools);

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let controller = ConversationController::new(llm, registry, cfg.agent.max_steps)
        .with_cancel_token(shutdown.token())
        .with_event_tx(event_tx);

    let printer = tokio::spawn(async move {
        while let Some(ev) = event_rx.recv().await {
            ui::render_event(&ev);
        }
    });

    let result = controller.run(&prompt).await;
    drop(controller); // 释放事件发送端，让打印任务自然结束
    let _ = printer.await;

    match result {
        Ok(session) => {
            tracing::info!(messages = session.messages.len(), "session finished");
            ui::print_farewell(false);
            Ok(())
        }
        Err(AgentError::Cancelled) => {
            ui::print_farewell(true);
            Ok(())
        }
        Err(e @ AgentError::LoopBudgetExceeded(_)) => {
            eprintln!("Session ended without an answer: {e}");
            Err(e.into())
        }
        Err(e) => Err(e).context("Session failed"),
    }
}
