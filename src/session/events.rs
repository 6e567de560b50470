//! 会话过程事件：供终端按步骤种类渲染进度行
//!
//! 控制器在每个转移分支上发送一条事件；通道为可选项，未接通时静默丢弃。

use tokio::sync::mpsc::UnboundedSender;

/// 单步过程事件
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// START：问题拆解开始
    Started { content: String },
    /// THINK：中间推理内容
    Thinking { content: String },
    /// TOOL：即将调用工具
    ToolCall { tool: String, input: String },
    /// 工具返回（预览，避免过长）
    Observation { tool: String, preview: String },
    /// TOOL 指向未注册的工具（已写回对话，循环继续）
    UnknownTool { name: String },
    /// 回复不符合协议（已写回提示，循环继续）
    ProtocolSlip { detail: String },
    /// OUTPUT：最终回复
    Output { content: String },
}

/// 发送事件；通道未接通或接收端已关闭时忽略
pub fn send_event(tx: &Option<UnboundedSender<SessionEvent>>, ev: SessionEvent) {
    if let Some(t) = tx {
        let _ = t.send(ev);
    }
}
