//! 推理引擎抽象
//!
//! 严格请求/应答：一次完整 MessageLog 换一条回复文本，无流式、无并发在途调用。
//! 传输层重试/退避由具体客户端库负责，这里不做规定。

use async_trait::async_trait;

use crate::session::Message;

/// 推理引擎客户端 trait：输入有序消息，输出一条不透明的回复文本（期望解析为一条 Step）
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, String>;
}
