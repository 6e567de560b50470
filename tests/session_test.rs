//! 会话循环集成测试
//!
//! 用 ScriptedLlmClient 扮演推理引擎、计数 stub 扮演工具能力，
//! 验证协议不变量：Observation 紧随 TOOL、未知工具可恢复、OUTPUT 终结会话。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mantis::core::AgentError;
use mantis::llm::ScriptedLlmClient;
use mantis::session::{ConversationController, Role};
use mantis::tools::{ToolCapability, ToolRegistry};

/// 固定回复并计数调用次数的 stub 能力
struct CountingTool {
    name: &'static str,
    reply: &'static str,
    invocations: AtomicUsize,
}

impl CountingTool {
    fn new(name: &'static str, reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            invocations: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ToolCapability for CountingTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "counting stub"
    }

    async fn invoke(&self, _input: &str) -> String {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.reply.to_string()
    }
}

struct Stubs {
    weather: Arc<CountingTool>,
    registry: ToolRegistry,
}

fn stub_registry() -> Stubs {
    let weather = CountingTool::new(
        "weather-by-city",
        "The weather in Paris is currently: Partly cloudy +21C",
    );
    let registry = ToolRegistry::new(
        weather.clone(),
        CountingTool::new("profile-by-username", "{\"login\":\"octocat\"}"),
        CountingTool::new("run-shell-command", "hello"),
        CountingTool::new("mirror-website", "Website mirrored successfully to mirror"),
    );
    Stubs { weather, registry }
}

#[tokio::test]
async fn test_paris_weather_scenario() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "START", "content": "The user wants the weather of Paris."}"#,
        r#"{"step": "THINK", "content": "I should call weather-by-city."}"#,
        r#"{"step": "TOOL", "tool_name": "weather-by-city", "input": "Paris"}"#,
        r#"{"step": "OUTPUT", "content": "It is 21C and partly cloudy in Paris."}"#,
    ]));
    let controller = ConversationController::new(llm.clone(), stubs.registry, 10);

    let result = controller.run("weather in Paris").await.unwrap();

    assert_eq!(result.response, "It is 21C and partly cloudy in Paris.");
    assert_eq!(llm.calls(), 4);
    assert_eq!(stubs.weather.invocations.load(Ordering::SeqCst), 1);

    // 日志顺序：system, user, START, THINK, TOOL, OBSERVER, OUTPUT
    let roles: Vec<Role> = result.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::System,
            Role::User,
            Role::Assistant,
            Role::Assistant,
            Role::Assistant,
            Role::Developer,
            Role::Assistant,
        ]
    );
}

#[tokio::test]
async fn test_observation_immediately_follows_tool_step() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "TOOL", "tool_name": "weather-by-city", "input": "Paris"}"#,
        r#"{"step": "OUTPUT", "content": "done"}"#,
    ]));
    let controller = ConversationController::new(llm.clone(), stubs.registry, 10);

    let result = controller.run("weather in Paris").await.unwrap();

    let tool_idx = result
        .messages
        .iter()
        .position(|m| m.content.contains("\"TOOL\""))
        .unwrap();
    let next = &result.messages[tool_idx + 1];
    assert_eq!(next.role, Role::Developer);
    let v: serde_json::Value = serde_json::from_str(&next.content).unwrap();
    assert_eq!(v["step"], "OBSERVER");
    assert_eq!(
        v["content"],
        "The weather in Paris is currently: Partly cloudy +21C"
    );
    // TOOL 与其 Observation 之间没有引擎调用：第二次调用发生在 Observation 之后
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_unknown_tool_is_recoverable() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "TOOL", "tool_name": "deleteEverything", "input": "/"}"#,
        r#"{"step": "OUTPUT", "content": "I could not find that tool."}"#,
    ]));
    let controller = ConversationController::new(llm.clone(), stubs.registry, 10);

    let result = controller.run("wipe the disk").await.unwrap();

    assert_eq!(result.response, "I could not find that tool.");
    assert!(result.messages.iter().any(|m| {
        m.role == Role::Developer && m.content.contains("There is no such tool 'deleteEverything'.")
    }));
    // 未知工具不触碰任何已注册能力
    assert_eq!(stubs.weather.invocations.load(Ordering::SeqCst), 0);
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_malformed_reply_degrades_to_developer_note() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        "I will now think about this out loud without any JSON.",
        r#"{"step": "OUTPUT", "content": "recovered"}"#,
    ]));
    let controller = ConversationController::new(llm, stubs.registry, 10);

    let result = controller.run("hello").await.unwrap();

    assert_eq!(result.response, "recovered");
    assert!(result.messages.iter().any(|m| {
        m.role == Role::Developer && m.content.contains("did not follow the protocol")
    }));
}

#[tokio::test]
async fn test_unrecognized_step_kind_is_recoverable() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "OBSERVER", "content": "I am pretending to be a tool."}"#,
        r#"{"step": "OUTPUT", "content": "back on track"}"#,
    ]));
    let controller = ConversationController::new(llm, stubs.registry, 10);

    let result = controller.run("hello").await.unwrap();
    assert_eq!(result.response, "back on track");
}

#[tokio::test]
async fn test_output_is_terminal() {
    let stubs = stub_registry();
    // OUTPUT 之后脚本里还有剩余回复，但不应再有引擎调用
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "OUTPUT", "content": "first answer"}"#,
        r#"{"step": "OUTPUT", "content": "should never be requested"}"#,
    ]));
    let controller = ConversationController::new(llm.clone(), stubs.registry, 10);

    let result = controller.run("hi").await.unwrap();

    assert_eq!(result.response, "first answer");
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_loop_budget_exceeded_reported() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::never_outputs());
    let controller = ConversationController::new(llm.clone(), stubs.registry, 4);

    let err = controller.run("never ends").await.unwrap_err();

    assert!(matches!(err, AgentError::LoopBudgetExceeded(4)));
    assert_eq!(llm.calls(), 4);
}

#[tokio::test]
async fn test_weather_invocations_are_independent() {
    let stubs = stub_registry();
    let llm = Arc::new(ScriptedLlmClient::new(vec![
        r#"{"step": "TOOL", "tool_name": "weather-by-city", "input": "Paris"}"#,
        r#"{"step": "TOOL", "tool_name": "weather-by-city", "input": "Paris"}"#,
        r#"{"step": "OUTPUT", "content": "asked twice"}"#,
    ]));
    let controller = ConversationController::new(llm, stubs.registry, 10);

    let result = controller.run("weather twice").await.unwrap();

    // 相同输入调用两次互不影响，两次 Observation 内容一致
    assert_eq!(stubs.weather.invocations.load(Ordering::SeqCst), 2);
    let observations: Vec<&str> = result
        .messages
        .iter()
        .filter(|m| m.role == Role::Developer)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(observations.len(), 2);
    assert_eq!(observations[0], observations[1]);
}
