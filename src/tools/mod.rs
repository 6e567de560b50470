//! 工具箱：封闭注册表与四个内建能力

pub mod github;
pub mod mirror;
pub mod registry;
pub mod shell;
pub mod weather;

use std::sync::Arc;

pub use github::ProfileTool;
pub use mirror::MirrorTool;
pub use registry::{ToolCapability, ToolName, ToolRegistry};
pub use shell::ShellTool;
pub use weather::WeatherTool;

use crate::config::ToolsSection;

/// 按配置装配生产环境的四个内建工具
pub fn builtin_registry(cfg: &ToolsSection) -> ToolRegistry {
    ToolRegistry::new(
        Arc::new(WeatherTool::new(cfg.http_timeout_secs)),
        Arc::new(ProfileTool::new(cfg.http_timeout_secs)),
        Arc::new(ShellTool::new(cfg.shell_timeout_secs)),
        Arc::new(MirrorTool::new(&cfg.mirror)),
    )
}
