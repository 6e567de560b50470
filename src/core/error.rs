//! Agent 错误类型
//!
//! 协议类错误（JSON 结构错误 / 未识别的 step 种类）在循环内降级为 developer 提示并继续；
//! LlmError / LoopBudgetExceeded / Cancelled 才会终止会话并上抛给调用方。

use thiserror::Error;

/// 会话运行过程中可能出现的错误（协议、LLM 传输、步数预算、取消）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 模型回复无法解析为一条 Step 记录（JSON 结构错误）
    #[error("Step parse error: {0}")]
    JsonParseError(String),

    /// 模型回复的 step 种类不在 START/THINK/TOOL/OUTPUT 之内
    #[error("Unrecognized step kind: {0}")]
    UnrecognizedStep(String),

    /// 推理引擎调用失败（传输层错误，由客户端库返回）
    #[error("LLM error: {0}")]
    LlmError(String),

    /// 达到步数预算仍未产生 OUTPUT
    #[error("Loop budget exceeded: no OUTPUT within {0} steps")]
    LoopBudgetExceeded(usize),

    /// 操作员中断（Ctrl+C / SIGTERM）
    #[error("Cancelled by operator")]
    Cancelled,
}

impl AgentError {
    /// 是否为协议类错误：可降级为对话内的 developer 提示，循环继续
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            AgentError::JsonParseError(_) | AgentError::UnrecognizedStep(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_are_recoverable() {
        assert!(AgentError::JsonParseError("bad".into()).is_protocol_error());
        assert!(AgentError::UnrecognizedStep("OBSERVER".into()).is_protocol_error());
        assert!(!AgentError::LoopBudgetExceeded(20).is_protocol_error());
        assert!(!AgentError::Cancelled.is_protocol_error());
    }
}
