//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置，持有注入的密钥
//! 2. **加载表格**：缺少 `Prompt` 列时直接终止，不处理任何一行
//! 3. **批量生成**：创建客户端与服务，委托 `BatchRunner` 逐行处理
//! 4. **打包发送**：只在用户明确要求且至少有一张图片时执行
//!
//! `run_batch` / `deliver` 接受任意生成器与邮件传输，便于替换外部服务。

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::clients::{ImageClient, ImageGenerator, SmtpMailer};
use crate::config::{Config, Secrets};
use crate::error::{AppError, AppResult};
use crate::models::batch::BatchResult;
use crate::models::loaders::load_prompt_table;
use crate::models::prompt::PromptRecord;
use crate::orchestrator::batch_runner::{BatchRunner, LogProgress};
use crate::services::{
    package_batch, ArtifactWriter, DeliveryReport, DeliveryService, EmailJob, MailTransport,
    PromptComposer, RunLog, LOG_FILE_NAME,
};
use crate::utils::logging::{
    log_startup, log_table_loaded, print_delivery_stats, print_final_stats,
};
use crate::workflow::RowFlow;

/// 一次运行的结果
#[derive(Debug)]
pub struct RunSummary {
    pub batch: BatchResult,
    pub run_log: RunLog,
    /// 未请求发送时为 `None`
    pub delivery: Option<DeliveryReport>,
}

/// 应用主结构
pub struct App {
    config: Config,
    secrets: Secrets,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config, secrets: Secrets) -> AppResult<Self> {
        config.validate()?;
        log_startup(&config);
        Ok(Self { config, secrets })
    }

    /// 运行应用主逻辑
    ///
    /// `send` 为真时在生成结束后打包并发送邮件。
    pub async fn run(&self, input: &Path, send: bool) -> Result<RunSummary> {
        let records = self.load_table(input)?;

        if records.is_empty() {
            warn!("⚠️ 表格中没有任何提示词，程序结束");
        }

        let generator = ImageClient::new(&self.config.image, self.secrets.openai_api_key.clone());
        let (batch, run_log) = self.run_batch(generator, &records).await;

        self.save_run_log(&run_log).await;

        let delivery = if send {
            let credentials = self.secrets.email().map_err(AppError::from)?;
            let mailer = SmtpMailer::new(&self.config.smtp, credentials).map_err(AppError::from)?;
            Some(self.deliver(mailer, &batch, &run_log).await?)
        } else {
            if batch.has_artifacts() {
                info!("💡 使用 --send 打包并发送邮件");
            }
            None
        };

        Ok(RunSummary {
            batch,
            run_log,
            delivery,
        })
    }

    /// 加载表格（致命错误直接返回）
    pub fn load_table(&self, input: &Path) -> AppResult<Vec<PromptRecord>> {
        info!("\n📁 正在读取表格...");
        let sizes = self.config.size_catalog();
        let records = load_prompt_table(input, &self.config.prompt_defaults(), &sizes)
            .inspect_err(|e| error!("❌ 表格加载失败: {}", e))?;
        log_table_loaded(records.len());
        Ok(records)
    }

    /// 逐行生成图片
    pub async fn run_batch<G: ImageGenerator>(
        &self,
        generator: G,
        records: &[PromptRecord],
    ) -> (BatchResult, RunLog) {
        let composer = PromptComposer::new(self.config.default_style.trim(), self.config.size_catalog());
        let writer = ArtifactWriter::with_dir(&self.config.output_dir);
        let runner = BatchRunner::new(RowFlow::new(composer, generator, writer));

        let mut run_log = RunLog::new();
        let batch = runner.run(records, &mut LogProgress, &mut run_log).await;

        print_final_stats(&batch, &self.config.output_dir);
        (batch, run_log)
    }

    /// 打包并逐个收件人发送
    ///
    /// 没有图片或没有收件人时不可发送。
    pub async fn deliver<T: MailTransport>(
        &self,
        transport: T,
        batch: &BatchResult,
        run_log: &RunLog,
    ) -> Result<DeliveryReport> {
        let recipients = self.config.recipient_list();
        if recipients.is_empty() {
            anyhow::bail!("未配置收件人 (recipients / EMAIL_RECIPIENTS)");
        }

        let package = package_batch(batch, &self.config.project_name)
            .map_err(AppError::from)
            .context("无法打包图片")?;
        info!(
            "📧 准备发送 {}（{} 张图片）给 {} 个收件人",
            package.file_name,
            package.image_count,
            recipients.len()
        );

        let log_attachment = if self.config.include_log {
            Some(run_log.to_csv_bytes().map_err(AppError::from)?)
        } else {
            None
        };

        let job = EmailJob {
            recipients,
            subject: self.config.email_subject.clone(),
            body: self.config.email_message.clone(),
            zip_name: package.file_name,
            zip_payload: package.zip_bytes,
            log_attachment,
        };

        let report = DeliveryService::new(transport, self.config.preview_email)
            .deliver(&job)
            .await;

        print_delivery_stats(&report);
        Ok(report)
    }

    /// 运行日志保存到输出目录，失败只告警
    async fn save_run_log(&self, run_log: &RunLog) {
        if run_log.is_empty() {
            return;
        }
        let path = self.log_path();
        match run_log.save(&path).await {
            Ok(()) => info!("📝 运行日志: {}", path.display()),
            Err(e) => warn!("⚠️ 运行日志保存失败 ({}): {}", path.display(), e),
        }
    }

    fn log_path(&self) -> PathBuf {
        Path::new(&self.config.output_dir).join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    fn secrets() -> Secrets {
        Secrets::from_lookup(|name| (name == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap()
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let config = Config {
            default_size: "Gigantic".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            App::initialize(config, secrets()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_load_table_failure_is_fatal() {
        let app = App::initialize(Config::default(), secrets()).unwrap();
        let err = app.load_table(Path::new("missing.xlsx")).unwrap_err();
        assert!(matches!(err, AppError::Load(LoadError::Open { .. })));
    }
}
