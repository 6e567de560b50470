//! Mantis - Rust 终端智能体
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与优雅关闭
//! - **llm**: 推理引擎客户端抽象与实现（OpenAI 兼容 / Scripted Mock）
//! - **protocol**: START/THINK/TOOL/OUTPUT 步骤线格式与 Observation 封装
//! - **session**: 消息日志与会话控制循环
//! - **tools**: 封闭工具注册表与四个能力（天气、档案、shell、整站镜像）
//! - **ui**: 终端横幅、提示输入与进度行渲染

pub mod config;
pub mod core;
pub mod llm;
pub mod protocol;
pub mod session;
pub mod tools;
pub mod ui;
