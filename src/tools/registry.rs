//! 工具注册表（封闭集合）
//!
//! 工具集在构造时固定，不支持运行时注册：ToolName 枚举列出全部能力，
//! get 按穷举 match 解析，未知工具是 ToolName::parse 的 None 分支而非缺键查询。
//! 所有工具实现 ToolCapability（errors-as-data：invoke 永不失败，故障渲染为描述性文本）。

use std::sync::Arc;

use async_trait::async_trait;

/// 工具能力 trait：单文本入、单文本出的异步操作
///
/// 契约：invoke 绝不 panic、绝不返回 Err——网络错误、非零退出、非法 URL
/// 一律在内部吸收并渲染为描述性文本，循环可据此继续推理。
#[async_trait]
pub trait ToolCapability: Send + Sync {
    /// 工具名称（用于 TOOL 记录中的 "tool_name" 字段）
    fn name(&self) -> &'static str;

    /// 工具描述（供 LLM 理解功能，进入 system prompt 的 Available Tools 段落）
    fn description(&self) -> &'static str;

    /// 执行工具；失败以文本描述返回
    async fn invoke(&self, input: &str) -> String;
}

/// 全部已注册工具名（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    WeatherByCity,
    ProfileByUsername,
    RunShellCommand,
    MirrorWebsite,
}

impl ToolName {
    /// 解析 TOOL 步骤中的名称；未知名返回 None（可恢复的协议违规，由控制器写回对话）
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "weather-by-city" => Some(Self::WeatherByCity),
            "profile-by-username" => Some(Self::ProfileByUsername),
            "run-shell-command" => Some(Self::RunShellCommand),
            "mirror-website" => Some(Self::MirrorWebsite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeatherByCity => "weather-by-city",
            Self::ProfileByUsername => "profile-by-username",
            Self::RunShellCommand => "run-shell-command",
            Self::MirrorWebsite => "mirror-website",
        }
    }

    /// 枚举全部工具名（生成目录时遍历用）
    pub fn all() -> [Self; 4] {
        [
            Self::WeatherByCity,
            Self::ProfileByUsername,
            Self::RunShellCommand,
            Self::MirrorWebsite,
        ]
    }
}

/// 封闭注册表：每个 ToolName 恰好对应一个能力实例
pub struct ToolRegistry {
    weather: Arc<dyn ToolCapability>,
    profile: Arc<dyn ToolCapability>,
    shell: Arc<dyn ToolCapability>,
    mirror: Arc<dyn ToolCapability>,
}

impl ToolRegistry {
    /// 以显式能力实例构造（测试可注入 stub）
    pub fn new(
        weather: Arc<dyn ToolCapability>,
        profile: Arc<dyn ToolCapability>,
        shell: Arc<dyn ToolCapability>,
        mirror: Arc<dyn ToolCapability>,
    ) -> Self {
        Self {
            weather,
            profile,
            shell,
            mirror,
        }
    }

    /// 按名取能力；名称已通过 ToolName 解析，查找本身不会失败
    pub fn get(&self, name: ToolName) -> Arc<dyn ToolCapability> {
        match name {
            ToolName::WeatherByCity => Arc::clone(&self.weather),
            ToolName::ProfileByUsername => Arc::clone(&self.profile),
            ToolName::RunShellCommand => Arc::clone(&self.shell),
            ToolName::MirrorWebsite => Arc::clone(&self.mirror),
        }
    }

    /// 字符串名查找：未知名返回 None（供控制器的 "no such tool" 分支）
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ToolCapability>> {
        ToolName::parse(name).map(|n| self.get(n))
    }

    /// 返回 (name, description) 列表，用于生成 prompt 中的 Available Tools 段落
    pub fn catalogue(&self) -> Vec<(&'static str, &'static str)> {
        ToolName::all()
            .into_iter()
            .map(|n| {
                let tool = self.get(n);
                (tool.name(), tool.description())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl ToolCapability for StaticTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "static stub"
        }

        async fn invoke(&self, _input: &str) -> String {
            self.reply.to_string()
        }
    }

    fn stub_registry() -> ToolRegistry {
        ToolRegistry::new(
            Arc::new(StaticTool { name: "weather-by-city", reply: "sunny" }),
            Arc::new(StaticTool { name: "profile-by-username", reply: "{}" }),
            Arc::new(StaticTool { name: "run-shell-command", reply: "ok" }),
            Arc::new(StaticTool { name: "mirror-website", reply: "mirrored" }),
        )
    }

    #[test]
    fn test_tool_name_parse_roundtrip() {
        for name in ToolName::all() {
            assert_eq!(ToolName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ToolName::parse("deleteEverything"), None);
        assert_eq!(ToolName::parse(""), None);
    }

    #[tokio::test]
    async fn test_lookup_and_invoke() {
        let registry = stub_registry();
        let tool = registry.lookup("weather-by-city").unwrap();
        assert_eq!(tool.invoke("Paris").await, "sunny");
        assert!(registry.lookup("no-such-tool").is_none());
    }

    #[test]
    fn test_catalogue_covers_all_tools() {
        let registry = stub_registry();
        let names: Vec<&str> = registry.catalogue().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "weather-by-city",
                "profile-by-username",
                "run-shell-command",
                "mirror-website"
            ]
        );
    }
}
