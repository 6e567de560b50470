//! 会话层：消息日志、步骤协议驱动的控制器、进度事件、system prompt

pub mod controller;
pub mod events;
pub mod log;
pub mod prompt;

pub use controller::{ConversationController, SessionResult};
pub use events::{send_event, SessionEvent};
pub use log::{Message, MessageLog, Role};
pub use prompt::build_system_prompt;
