//! # Prompt Image Batch
//!
//! 根据表格中的提示词批量生成图片，并可打包通过邮件发送
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 外部客户端（Clients）
//! - `clients/` - 持有 HTTP / SMTP 连接，只暴露能力
//! - `ImageClient` - 调用图片生成接口，返回图片字节
//! - `SmtpMailer` - 通过 SMTP 发送一封邮件
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个对象
//! - `PromptComposer` - 合成最终提示词和尺寸
//! - `ArtifactWriter` - 写入 `image_{n}.png`
//! - `RunLog` / `package_batch` - 运行日志与 zip 打包
//! - `DeliveryService` - 逐个收件人发送，互不影响
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一行提示词"的完整处理流程
//! - `RowCtx` - 上下文封装（行号 + 总行数）
//! - `RowFlow` - 流程编排（compose → generate → write）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，加载表格、保存日志、发送邮件
//! - `orchestrator/batch_runner` - 批量处理器，逐行调度并发出进度
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ImageClient, ImageGenerator, SmtpMailer};
pub use config::{Config, Secrets};
pub use error::{AppError, AppResult};
pub use models::{BatchResult, PromptRecord, RowOutcome};
pub use orchestrator::{App, BatchRunner, RunSummary};
pub use services::{DeliveryReport, MailTransport};
pub use workflow::{RowCtx, RowFlow};
