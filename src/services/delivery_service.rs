//! 邮件发送服务 - 业务能力层
//!
//! 每个收件人单独发送一封邮件，某个收件人失败不影响其他收件人。

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::DeliveryError;

/// 一次发送任务
#[derive(Debug, Clone)]
pub struct EmailJob {
    /// 收件人（已去重）
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    /// 压缩包文件名
    pub zip_name: String,
    /// 压缩包内容
    pub zip_payload: Vec<u8>,
    /// 运行日志 CSV（可选）
    pub log_attachment: Option<Vec<u8>>,
}

/// 邮件传输能力
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// 给单个收件人发送
    async fn send(&self, recipient: &str, job: &EmailJob) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for &T {
    async fn send(&self, recipient: &str, job: &EmailJob) -> Result<(), DeliveryError> {
        (**self).send(recipient, job).await
    }
}

/// 单个收件人的发送结果
#[derive(Debug)]
pub struct RecipientOutcome {
    pub recipient: String,
    pub result: Result<(), DeliveryError>,
}

/// 发送报告
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<RecipientOutcome>,
}

impl DeliveryReport {
    /// 所有收件人都发送成功（没有收件人时为 false）
    pub fn all_succeeded(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// 失败的收件人及原因
    pub fn failures(&self) -> Vec<(&str, &DeliveryError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Ok(()) => None,
                Err(e) => Some((o.recipient.as_str(), e)),
            })
            .collect()
    }
}

/// 解析逗号分隔的收件人列表：去空白、去空项、去重（保持顺序）
pub fn parse_recipients(raw: &str) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::new();
    for address in raw.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        if !recipients.iter().any(|r| r == address) {
            recipients.push(address.to_string());
        }
    }
    recipients
}

/// 邮件预览文本
pub fn render_preview(recipient: &str, job: &EmailJob) -> String {
    let mut attachments = vec![format!("{} ({} 字节)", job.zip_name, job.zip_payload.len())];
    if let Some(log) = &job.log_attachment {
        attachments.push(format!(
            "{} ({} 字节)",
            crate::services::run_log::LOG_FILE_NAME,
            log.len()
        ));
    }
    format!(
        "收件人: {}\n主题: {}\n正文: {}\n附件: {}",
        recipient,
        job.subject,
        job.body,
        attachments.join(", ")
    )
}

/// 邮件发送服务
pub struct DeliveryService<T: MailTransport> {
    transport: T,
    preview: bool,
}

impl<T: MailTransport> DeliveryService<T> {
    pub fn new(transport: T, preview: bool) -> Self {
        Self { transport, preview }
    }

    /// 逐个收件人发送
    pub async fn deliver(&self, job: &EmailJob) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for recipient in &job.recipients {
            if self.preview {
                info!("👁️ 邮件预览\n{}", render_preview(recipient, job));
            }

            info!("📧 正在发送给 {} ...", recipient);
            let result = self.transport.send(recipient, job).await;
            match &result {
                Ok(()) => info!("✓ 已发送给 {}", recipient),
                Err(e) => error!("❌ 发送给 {} 失败: {}", recipient, e),
            }

            report.outcomes.push(RecipientOutcome {
                recipient: recipient.clone(),
                result,
            });
        }

        report
    }
}
