//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `MANTIS__*` 覆盖（双下划线表示嵌套，
//! 如 `MANTIS__AGENT__MAX_STEPS=8`）。API Key 走 `OPENAI_API_KEY`，不落盘。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentSection,
    pub llm: LlmSection,
    pub tools: ToolsSection,
}

/// [agent] 段：会话循环的步数预算
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// 单个会话内最大迭代步数，防止不收敛时无界循环
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

fn default_max_steps() -> usize {
    20
}

/// [llm] 段：OpenAI 兼容端点与模型
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    #[serde(default = "default_model")]
    pub model: String,
    /// 自定义端点（DeepSeek、代理等）；未设置时用 OpenAI 官方
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// [tools] 段：HTTP 超时、Shell 超时、镜像输出目录
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// weather / profile 请求超时（秒）
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// 单条 shell 命令超时（秒）
    #[serde(default = "default_shell_timeout_secs")]
    pub shell_timeout_secs: u64,
    #[serde(default)]
    pub mirror: MirrorSection,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout_secs(),
            shell_timeout_secs: default_shell_timeout_secs(),
            mirror: MirrorSection::default(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_shell_timeout_secs() -> u64 {
    60
}

/// [tools.mirror] 段：镜像输出目录与额外跨域资源域名
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorSection {
    /// wget -P 的输出目录
    #[serde(default = "default_mirror_output_dir")]
    pub output_dir: PathBuf,
    /// 除目标站点外允许镜像的资源域名（CDN / 字体）
    #[serde(default = "default_span_domains")]
    pub span_domains: Vec<String>,
    /// 整站镜像超时（秒）
    #[serde(default = "default_mirror_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            output_dir: default_mirror_output_dir(),
            span_domains: default_span_domains(),
            timeout_secs: default_mirror_timeout_secs(),
        }
    }
}

fn default_mirror_output_dir() -> PathBuf {
    PathBuf::from("mirror")
}

fn default_span_domains() -> Vec<String> {
    vec![
        "cdn.jsdelivr.net".into(),
        "fonts.googleapis.com".into(),
        "fonts.gstatic.com".into(),
    ]
}

fn default_mirror_timeout_secs() -> u64 {
    300
}

/// 从 config 目录加载配置，环境变量 MANTIS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 MANTIS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("MANTIS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.agent.max_steps, 20);
        assert_eq!(cfg.llm.model, "gpt-4.1-mini");
        assert!(cfg.llm.base_url.is_none());
        assert_eq!(cfg.tools.mirror.output_dir, PathBuf::from("mirror"));
        assert!(cfg
            .tools
            .mirror
            .span_domains
            .iter()
            .any(|d| d == "cdn.jsdelivr.net"));
    }
}
