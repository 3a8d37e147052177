//! 单行处理流程 - 流程层
//!
//! 核心职责：定义"一行提示词"的完整处理流程
//!
//! 流程顺序：
//! 1. 合成提示词
//! 2. 调用生成服务
//! 3. 写入图片文件
//!
//! 任一步失败都只记录为该行的失败，不会中断整批处理。

use tracing::{debug, error, info};

use crate::clients::ImageGenerator;
use crate::models::batch::{RowFailure, RowOutcome, RowStage};
use crate::models::prompt::PromptRecord;
use crate::services::{ArtifactWriter, PromptComposer};
use crate::utils::logging::truncate_text;
use crate::workflow::row_ctx::RowCtx;

/// 单行处理流程
///
/// - 编排合成 → 生成 → 写入
/// - 把每一步的错误转换为带阶段信息的失败记录
/// - 只依赖业务能力（services / clients）
pub struct RowFlow<G: ImageGenerator> {
    composer: PromptComposer,
    generator: G,
    writer: ArtifactWriter,
}

impl<G: ImageGenerator> RowFlow<G> {
    pub fn new(composer: PromptComposer, generator: G, writer: ArtifactWriter) -> Self {
        Self {
            composer,
            generator,
            writer,
        }
    }

    pub async fn run(&self, ctx: &RowCtx, record: &PromptRecord) -> RowOutcome {
        info!("{} 🎨 {}", ctx, truncate_text(&record.prompt, 60));
        let mut stage = RowStage::Pending;

        // ========== 1. 合成提示词 ==========
        advance(ctx, &mut stage, RowStage::Composing);
        let request = self.composer.compose(record);
        debug!("{} 最终提示词: {} | 尺寸: {}", ctx, request.final_prompt, request.size);

        // ========== 2. 生成图片 ==========
        advance(ctx, &mut stage, RowStage::Generating);
        let bytes = match self.generator.generate(&request).await {
            Ok(bytes) => bytes,
            Err(e) => return fail(ctx, record, stage, e.to_string()),
        };

        // ========== 3. 写入文件 ==========
        advance(ctx, &mut stage, RowStage::Writing);
        match self.writer.write(ctx.index, bytes).await {
            Ok(image) => {
                info!("{} ✅ 已保存 {}", ctx, image.local_path.display());
                RowOutcome::Succeeded(image)
            }
            Err(e) => fail(ctx, record, stage, e.to_string()),
        }
    }
}

fn advance(ctx: &RowCtx, stage: &mut RowStage, next: RowStage) {
    debug!("{} {} → {}", ctx, stage, next);
    *stage = next;
}

fn fail(ctx: &RowCtx, record: &PromptRecord, stage: RowStage, reason: String) -> RowOutcome {
    error!("{} ❌ {}失败: {}", ctx, stage, reason);
    RowOutcome::Failed(RowFailure {
        index: ctx.index,
        prompt: record.prompt.clone(),
        stage,
        reason,
    })
}
