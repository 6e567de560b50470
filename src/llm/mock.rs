//! Scripted Mock 客户端（用于测试，无需 API）
//!
//! 按脚本顺序返回预置回复；脚本耗尽后固定返回一条 THINK 记录，
//! 可模拟「永不 OUTPUT」的引擎来验证步数预算。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::session::Message;

/// 脚本化客户端：依序弹出回复并统计调用次数
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedLlmClient {
    pub fn new(replies: Vec<impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// 永不产生 OUTPUT 的引擎（每次都返回同一条 THINK）
    pub fn never_outputs() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// 已发起的引擎调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .replies
            .lock()
            .map_err(|e| e.to_string())?
            .pop_front();
        Ok(next.unwrap_or_else(|| {
            r#"{"step": "THINK", "content": "Still thinking it over."}"#.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let client = ScriptedLlmClient::new(vec!["one", "two"]);
        assert_eq!(client.complete(&[]).await.unwrap(), "one");
        assert_eq!(client.complete(&[]).await.unwrap(), "two");
        // 耗尽后回落到 THINK
        assert!(client.complete(&[]).await.unwrap().contains("THINK"));
        assert_eq!(client.calls(), 3);
    }
}
