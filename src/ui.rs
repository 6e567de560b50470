//! 终端表层：横幅、提示输入与进度行渲染
//!
//! CLI 只有一个交互入口（"Enter prompt"），无 flag 无子命令；
//! 进度行按步骤种类加标记，最终输出与告别语走这里统一上色。

use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::session::SessionEvent;

/// 欢迎横幅
pub fn print_banner() {
    println!();
    println!("{}", "  ┌──────────────────────────────────────┐".cyan());
    println!(
        "{}{}{}",
        "  │ ".cyan(),
        "Mantis — your terminal assistant ✨  ".bold(),
        " │".cyan()
    );
    println!("{}", "  └──────────────────────────────────────┘".cyan());
    println!();
}

/// 读取一行用户提示（"Enter prompt"）
pub async fn read_prompt() -> std::io::Result<String> {
    use std::io::Write;
    print!("{} ", "? Enter prompt".green().bold());
    std::io::stdout().flush()?;

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    reader.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

/// 按步骤种类渲染一条进度行
pub fn render_event(ev: &SessionEvent) {
    match ev {
        SessionEvent::Started { content } => {
            println!("🏁 {} {}", "Starting:".bold(), content);
        }
        SessionEvent::Thinking { content } => {
            println!("🧠 {} {}", "Thinking:".bold(), content);
        }
        SessionEvent::ToolCall { tool, input } => {
            println!(
                "🔧 {} {} {} {}",
                "Tool called:".bold(),
                tool.clone().yellow(),
                "with input:",
                input
            );
        }
        SessionEvent::Observation { tool, preview } => {
            println!("👀 {} [{}] {}", "Observation".bold(), tool, preview);
        }
        SessionEvent::UnknownTool { name } => {
            println!(
                "{} {}",
                "⚠️  No such tool:".red().bold(),
                name.clone().red()
            );
        }
        SessionEvent::ProtocolSlip { detail } => {
            println!("{} {}", "⚠️  Protocol slip:".red().bold(), detail);
        }
        SessionEvent::Output { content } => {
            println!("✅ {} {}", "Final output:".green().bold(), content);
        }
    }
}

/// 告别语；interrupted 为 true 时说明是操作员中断（同样是干净退出）
pub fn print_farewell(interrupted: bool) {
    let text = if interrupted {
        "👋 Interrupt received — exiting Mantis..."
    } else {
        "👋 Exiting Mantis... Goodbye!"
    };
    println!();
    println!("{}", text.yellow());
}
