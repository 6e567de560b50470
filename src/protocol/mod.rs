//! 步骤协议：模型回复与 Observation 的线格式
//!
//! 模型每轮只输出一条 JSON 记录 {"step": "START"|"THINK"|"TOOL"|"OUTPUT", ...}；
//! parse_step 容忍 ```json 围栏与前后杂文（提取最外层 {..}）。
//! OBSERVER 记录只由控制器生成（developer 角色），模型输出 OBSERVER 视为未识别种类。

use serde::{Deserialize, Serialize};

use crate::core::AgentError;
use crate::session::Message;

/// 线格式记录（serde 中转结构；字段是否必填由 Step 校验决定）
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StepRecord {
    step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<String>,
}

/// 解析后的一条模型步骤；每种恰好一种语义，TOOL 的 tool_name/input 与最终文本互斥
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 问题拆解开始（仅记录进度）
    Start { content: String },
    /// 中间推理
    Think { content: String },
    /// 请求调用工具
    Tool { tool_name: String, input: String },
    /// 最终输出，循环终止
    Output { content: String },
}

impl Step {
    /// 线格式种类标签（进度日志用）
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Start { .. } => "START",
            Step::Think { .. } => "THINK",
            Step::Tool { .. } => "TOOL",
            Step::Output { .. } => "OUTPUT",
        }
    }
}

/// 从回复文本中提取 JSON 块（```json ... ``` 或最外层 {..}）
fn extract_json_block(trimmed: &str) -> Option<&str> {
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        return Some(
            rest.find("```")
                .map(|end| rest[..end].trim())
                .unwrap_or_else(|| rest.trim()),
        );
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&trimmed[start..=end])
}

/// 解析模型回复为一条 Step
///
/// 失败模式：无 JSON 块或结构错误 -> JsonParseError；
/// step 标签不在四种之内（含模型误发 OBSERVER）-> UnrecognizedStep；
/// TOOL 记录缺 tool_name -> JsonParseError。
pub fn parse_step(output: &str) -> Result<Step, AgentError> {
    let trimmed = output.trim();
    let json_str = extract_json_block(trimmed)
        .ok_or_else(|| AgentError::JsonParseError(format!("no JSON object found: {trimmed}")))?;

    let record: StepRecord = serde_json::from_str(json_str)
        .map_err(|e| AgentError::JsonParseError(format!("{e}: {json_str}")))?;

    let content = record.content.unwrap_or_default();
    match record.step.as_str() {
        "START" => Ok(Step::Start { content }),
        "THINK" => Ok(Step::Think { content }),
        "OUTPUT" => Ok(Step::Output { content }),
        "TOOL" => {
            let tool_name = record
                .tool_name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| {
                    AgentError::JsonParseError("TOOL step without tool_name".to_string())
                })?;
            Ok(Step::Tool {
                tool_name: tool_name.trim().trim_end_matches('.').to_string(),
                input: record.input.unwrap_or_default(),
            })
        }
        other => Err(AgentError::UnrecognizedStep(other.to_string())),
    }
}

/// 将工具输出包装为 developer 角色的 Observation 消息
///
/// 必须紧跟在产生它的 TOOL 步骤之后、下一次引擎调用之前追加（协议不变量）。
pub fn observation(tool_output: &str) -> Message {
    let record = serde_json::json!({
        "step": "OBSERVER",
        "content": tool_output,
    });
    Message::developer(record.to_string())
}
