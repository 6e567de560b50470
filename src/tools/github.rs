//! 档案工具：GitHub 公开用户信息
//!
//! GET https://api.github.com/users/{username}（GitHub 要求 User-Agent），
//! 只保留公开档案字段序列化返回；失败渲染为文本。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::tools::ToolCapability;

/// 返回给对话的公开档案字段（全量响应裁剪后）
#[derive(Debug, Serialize, Deserialize)]
struct PublicProfile {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    public_repos: u64,
    followers: u64,
    following: u64,
    avatar_url: String,
}

/// 档案能力：按账号句柄查 GitHub 公开信息
pub struct ProfileTool {
    timeout_secs: u64,
}

impl ProfileTool {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// 客户端按调用构建：初始化失败走 errors-as-data 路径而非回退丢配置
    fn client(&self) -> Result<Client, String> {
        Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .user_agent("mantis-agent/0.1")
            .build()
            .map_err(|e| format!("http client init: {e}"))
    }

    async fn fetch(&self, username: &str) -> Result<String, String> {
        let url = format!("https://api.github.com/users/{username}");
        let resp = self
            .client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if resp.status().as_u16() == 404 {
            return Err(format!("no such user '{username}'"));
        }
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let profile: PublicProfile = resp
            .json()
            .await
            .map_err(|e| format!("decode profile: {e}"))?;
        serde_json::to_string(&profile).map_err(|e| format!("serialize profile: {e}"))
    }
}

#[async_trait]
impl ToolCapability for ProfileTool {
    fn name(&self) -> &'static str {
        "profile-by-username"
    }

    fn description(&self) -> &'static str {
        "profile-by-username(username: string): Returns the public GitHub profile (login, name, bio, repo/follower counts, avatar URL) for the given account handle."
    }

    async fn invoke(&self, input: &str) -> String {
        let username = input.trim();
        if username.is_empty() {
            return "Profile lookup failed: empty username.".to_string();
        }
        tracing::info!(username = %username, "profile tool fetch");
        match self.fetch(username).await {
            Ok(json) => json,
            Err(e) => format!("Profile lookup failed for '{username}': {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serializes_expected_fields() {
        let profile = PublicProfile {
            login: "octocat".into(),
            name: Some("The Octocat".into()),
            bio: None,
            public_repos: 8,
            followers: 100,
            following: 9,
            avatar_url: "https://example.com/a.png".into(),
        };
        let json = serde_json::to_string(&profile).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["login"], "octocat");
        assert_eq!(v["public_repos"], 8);
        assert!(v.get("avatar_url").is_some());
    }

    #[tokio::test]
    async fn test_empty_username_is_descriptive_text() {
        let tool = ProfileTool::new(1);
        assert!(tool.invoke("").await.contains("empty username"));
    }

    #[test]
    fn test_client_builds_with_configured_timeout() {
        let tool = ProfileTool::new(1);
        assert!(tool.client().is_ok());
    }
}
