//! Shell 工具：执行一条命令行并捕获输出
//!
//! 通过 sh -c / cmd /C 执行，带超时；非零退出与 stderr 都渲染为描述性文本返回。
//! 进程级隔离/沙箱不在本层职责内（单次只有一个工具调用在途）。

use async_trait::async_trait;
use tokio::process::Command;

use crate::tools::ToolCapability;

/// Shell 能力：命令行入、stdout（或错误描述）出
pub struct ShellTool {
    timeout_secs: u64,
}

impl ShellTool {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    async fn run(&self, command: &str) -> Result<std::process::Output, String> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };
        // 超时丢弃 future 时连带杀掉子进程，不留孤儿
        cmd.kill_on_drop(true);

        tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        .map_err(|_| format!("command timed out after {}s", self.timeout_secs))?
        .map_err(|e| format!("failed to spawn: {e}"))
    }
}

#[async_trait]
impl ToolCapability for ShellTool {
    fn name(&self) -> &'static str {
        "run-shell-command"
    }

    fn description(&self) -> &'static str {
        "run-shell-command(command: string): Executes the given unix/linux command line on this machine and returns its captured stdout, or an error description on failure."
    }

    async fn invoke(&self, input: &str) -> String {
        let command = input.trim();
        if command.is_empty() {
            return "Error running command: empty command line.".to_string();
        }
        tracing::info!(command = %command, "shell tool execute");

        let output = match self.run(command).await {
            Ok(o) => o,
            Err(e) => return format!("Error running command: {e}"),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return format!(
                "Error running command: exit {}: {}",
                output.status.code().unwrap_or(-1),
                detail
            );
        }
        if stdout.is_empty() && !stderr.trim().is_empty() {
            return format!("Stderr: {}", stderr.trim());
        }
        stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let tool = ShellTool::new(10);
        let out = tool.invoke("echo hello").await;
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error_prefixed_text() {
        let tool = ShellTool::new(10);
        let out = tool.invoke("exit 3").await;
        assert!(out.starts_with("Error running command:"), "got: {out}");
        assert!(out.contains("exit 3"));
    }

    #[tokio::test]
    async fn test_stderr_only_output() {
        let tool = ShellTool::new(10);
        let out = tool.invoke("echo warn >&2").await;
        assert!(out.starts_with("Stderr:"), "got: {out}");
        assert!(out.contains("warn"));
    }

    #[tokio::test]
    async fn test_empty_command() {
        let tool = ShellTool::new(10);
        assert!(tool.invoke("   ").await.contains("empty command line"));
    }

    #[tokio::test]
    async fn test_timeout_is_descriptive_text() {
        let tool = ShellTool::new(1);
        let out = tool.invoke("sleep 5").await;
        assert!(out.contains("timed out after 1s"), "got: {out}");
    }
}
