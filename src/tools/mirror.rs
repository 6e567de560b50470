//! 镜像工具：wget --mirror 整站抓取
//!
//! 解析 URL 取出主机名，拼 wget 镜像参数（跨域资源域名来自配置），
//! 子进程等待到完成或超时，结果渲染为状态文本——不存在 fire-and-forget 路径。

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Url;
use tokio::process::Command;

use crate::config::MirrorSection;
use crate::tools::ToolCapability;

/// 镜像能力：URL 入、镜像结果状态文本出
pub struct MirrorTool {
    output_dir: PathBuf,
    span_domains: Vec<String>,
    timeout_secs: u64,
}

impl MirrorTool {
    pub fn new(cfg: &MirrorSection) -> Self {
        Self {
            output_dir: cfg.output_dir.clone(),
            span_domains: cfg.span_domains.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }

    /// 目标主机 + 配置的跨域资源域名，作为 wget --domains 白名单
    fn domain_list(&self, host: &str) -> String {
        let mut domains = vec![host.to_string()];
        domains.extend(self.span_domains.iter().cloned());
        domains.join(",")
    }

    async fn mirror(&self, url: &Url) -> Result<String, String> {
        let host = url
            .host_str()
            .ok_or_else(|| "URL has no host".to_string())?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| format!("create output dir: {e}"))?;

        let mut cmd = Command::new("wget");
        cmd.arg("--mirror")
            .arg("--convert-links")
            .arg("--adjust-extension")
            .arg("--page-requisites")
            .arg("--no-parent")
            .arg("--span-hosts")
            .arg(format!("--domains={}", self.domain_list(host)))
            .arg("--execute")
            .arg("robots=off")
            .arg("--include-directories=/_next/,/")
            .arg("-P")
            .arg(&self.output_dir)
            .arg(url.as_str());
        // 超时丢弃 future 时连带杀掉 wget，不留孤儿
        cmd.kill_on_drop(true);

        let output = tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        .map_err(|_| format!("mirroring timed out after {}s", self.timeout_secs))?
        .map_err(|e| format!("failed to run wget: {e}"))?;

        if output.status.success() {
            Ok(format!(
                "Website mirrored successfully to {}",
                self.output_dir.display()
            ))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // wget 对部分资源 404 也会给非零退出码；尾部几行通常包含原因
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            Err(format!(
                "wget exited with {}: {}",
                output.status.code().unwrap_or(-1),
                tail.trim()
            ))
        }
    }
}

#[async_trait]
impl ToolCapability for MirrorTool {
    fn name(&self) -> &'static str {
        "mirror-website"
    }

    fn description(&self) -> &'static str {
        "mirror-website(url: string): Mirrors the website at the given URL to the local machine and reports the outcome."
    }

    async fn invoke(&self, input: &str) -> String {
        let raw = input.trim();
        let url = match Url::parse(raw) {
            Ok(u) => u,
            Err(e) => return format!("Mirroring failed: invalid URL '{raw}': {e}"),
        };
        tracing::info!(url = %url, dir = %self.output_dir.display(), "mirror tool start");
        match self.mirror(&url).await {
            Ok(status) => status,
            Err(e) => format!("Mirroring failed for '{url}': {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(dir: PathBuf) -> MirrorSection {
        MirrorSection {
            output_dir: dir,
            span_domains: vec!["cdn.jsdelivr.net".into()],
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_descriptive_text() {
        let tool = MirrorTool::new(&section(PathBuf::from("mirror")));
        let out = tool.invoke("not a url").await;
        assert!(out.starts_with("Mirroring failed:"), "got: {out}");
    }

    #[test]
    fn test_domain_list_includes_span_domains() {
        let tool = MirrorTool::new(&section(PathBuf::from("mirror")));
        let list = tool.domain_list("example.com");
        assert_eq!(list, "example.com,cdn.jsdelivr.net");
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_failure() {
        // wget 不存在或目标不可达都应落入文本化失败，而不是 panic
        let dir = tempfile::tempdir().unwrap();
        let tool = MirrorTool::new(&section(dir.path().to_path_buf()));
        let out = tool.invoke("http://127.0.0.1:1/unreachable").await;
        assert!(out.starts_with("Mirroring failed"), "got: {out}");
    }
}
