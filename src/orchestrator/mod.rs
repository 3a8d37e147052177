//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责加载、批量调度和最终的打包发送，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、持有密钥
//! - 加载表格（缺列为致命错误）
//! - 创建图片客户端、合成器、写入器
//! - 运行结束后保存运行日志，按需打包发送
//!
//! ### `batch_runner` - 批量处理器
//! - 按顺序处理所有行（Vec<PromptRecord>）
//! - 单行失败不影响后续行
//! - 每行结束后发出进度事件
//!
//! ## 层次关系
//!
//! ```text
//! app (表格 → 批量 → 打包发送)
//!     ↓
//! batch_runner (处理 Vec<PromptRecord>)
//!     ↓
//! workflow::RowFlow (处理单行)
//!     ↓
//! services / clients (合成 / 生成 / 写入 / 发送)
//! ```

pub mod app;
pub mod batch_runner;

// 重新导出主要类型
pub use app::{App, RunSummary};
pub use batch_runner::{BatchProgress, BatchRunner, LogProgress, ProgressSink};
