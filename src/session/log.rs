//! 会话消息日志
//!
//! 与推理引擎交换的对话历史：有序、只追加，一旦追加不再改写或重排；
//! 单个会话生命周期内由 ConversationController 独占持有。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致；Developer 用于控制器写回的 Observation 与协议提示）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
    Assistant,
    Developer,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn developer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Developer,
            content: content.into(),
        }
    }
}

/// 只追加的消息日志：不剪枝、不改写（会话不跨进程持久化，无需长度上限）
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 system + user 两条消息初始化（会话种子）
    pub fn seeded(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.push(Message::system(system));
        log.push(Message::user(prompt));
        log
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 最后一条消息（测试与诊断用）
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_log_order() {
        let log = MessageLog::seeded("instructions", "weather in Paris");
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].role, Role::System);
        assert_eq!(log.messages()[1].role, Role::User);
        assert_eq!(log.messages()[1].content, "weather in Paris");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = MessageLog::new();
        log.push(Message::assistant("a"));
        log.push(Message::developer("b"));
        log.push(Message::assistant("c"));
        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(log.last().map(|m| m.role), Some(Role::Assistant));
    }
}
