//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 按表格顺序逐行调用 `RowFlow`，汇总每一行的结果。
//!
//! ## 核心功能
//!
//! 1. **顺序处理**：一行处理完（成功或失败）才开始下一行
//! 2. **失败隔离**：任何一行失败都只记录，不中断整批
//! 3. **进度通知**：每行结束后发出 `BatchProgress`，与具体界面解耦
//! 4. **运行日志**：每行结束后追加一条日志

use tracing::info;

use crate::clients::ImageGenerator;
use crate::models::batch::BatchResult;
use crate::models::prompt::PromptRecord;
use crate::services::RunLog;
use crate::workflow::{RowCtx, RowFlow};

/// 进度事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchProgress {
    /// 已处理行数
    pub processed: usize,
    /// 总行数
    pub total: usize,
    /// 刚结束的行号
    pub index: usize,
    /// 该行是否成功
    pub succeeded: bool,
}

impl BatchProgress {
    /// 进度比例 `processed / total`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// 进度接收方
pub trait ProgressSink {
    fn on_row_finished(&mut self, progress: &BatchProgress);
}

impl<F: FnMut(&BatchProgress)> ProgressSink for F {
    fn on_row_finished(&mut self, progress: &BatchProgress) {
        self(progress)
    }
}

/// 把进度写到日志
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_row_finished(&mut self, progress: &BatchProgress) {
        info!(
            "📊 进度: {}/{} ({:.0}%)",
            progress.processed,
            progress.total,
            progress.fraction() * 100.0
        );
    }
}

/// 批量处理器
pub struct BatchRunner<G: ImageGenerator> {
    flow: RowFlow<G>,
}

impl<G: ImageGenerator> BatchRunner<G> {
    pub fn new(flow: RowFlow<G>) -> Self {
        Self { flow }
    }

    /// 处理所有行
    ///
    /// 返回时每一行都处于成功或失败状态。
    pub async fn run(
        &self,
        records: &[PromptRecord],
        progress: &mut dyn ProgressSink,
        run_log: &mut RunLog,
    ) -> BatchResult {
        let total = records.len();
        let mut result = BatchResult::new(total);

        log_batch_start(total);

        for (i, record) in records.iter().enumerate() {
            let ctx = RowCtx::new(i + 1, total);

            let outcome = self.flow.run(&ctx, record).await;
            run_log.record(&record.prompt, &outcome);
            let succeeded = outcome.is_success();
            result.push(outcome);

            progress.on_row_finished(&BatchProgress {
                processed: result.processed(),
                total,
                index: ctx.index,
                succeeded,
            });
        }

        log_batch_complete(&result);
        result
    }
}

// ========== 日志辅助函数 ==========

fn log_batch_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("🚀 开始生成图片，共 {} 行", total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(result: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批处理完成: 成功 {}/{}",
        result.success_count(),
        result.total
    );
    info!("{}", "─".repeat(60));
}
