/// SMTP 邮件客户端
///
/// 通过隐式 TLS 连接邮件服务器，登录后逐封发送
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::{EmailCredentials, SmtpConfig};
use crate::error::DeliveryError;
use crate::services::delivery_service::{EmailJob, MailTransport};
use crate::services::run_log::LOG_FILE_NAME;

/// SMTP 客户端
pub struct SmtpMailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// 创建新的 SMTP 客户端
    pub fn new(config: &SmtpConfig, credentials: &EmailCredentials) -> Result<Self, DeliveryError> {
        let sender = parse_mailbox(&credentials.sender)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)?
            .port(config.port)
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .build();

        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, recipient: &str, job: &EmailJob) -> Result<(), DeliveryError> {
        let message = build_message(&self.sender, recipient, job)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(recipient, e))?;

        debug!("SMTP 响应: {:?}", response.code());
        Ok(())
    }
}

/// 构建一封邮件：正文 + zip 附件 + 可选日志附件
pub fn build_message(
    sender: &Mailbox,
    recipient: &str,
    job: &EmailJob,
) -> Result<Message, DeliveryError> {
    let to = parse_mailbox(recipient)?;

    let mut parts = MultiPart::mixed()
        .singlepart(SinglePart::plain(job.body.clone()))
        .singlepart(
            Attachment::new(job.zip_name.clone())
                .body(job.zip_payload.clone(), content_type("application/zip")?),
        );

    if let Some(log) = &job.log_attachment {
        parts = parts.singlepart(
            Attachment::new(LOG_FILE_NAME.to_string()).body(log.clone(), content_type("text/csv")?),
        );
    }

    let message = Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(job.subject.clone())
        .multipart(parts)?;

    Ok(message)
}

/// 5xx 永久错误视为服务器拒收该收件人，其余保留为传输错误
fn classify_smtp_error(recipient: &str, err: lettre::transport::smtp::Error) -> DeliveryError {
    if err.is_permanent() {
        DeliveryError::Rejected {
            recipient: recipient.to_string(),
            reason: err.to_string(),
        }
    } else {
        DeliveryError::Transport(err)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse()
        .map_err(|source| DeliveryError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

fn content_type(value: &str) -> Result<ContentType, DeliveryError> {
    ContentType::parse(value).map_err(|e| DeliveryError::ContentType(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(with_log: bool) -> EmailJob {
        EmailJob {
            recipients: vec!["to@example.com".to_string()],
            subject: "Images ready".to_string(),
            body: "Here is your image zip file.".to_string(),
            zip_name: "batch.zip".to_string(),
            zip_payload: b"PK\x03\x04".to_vec(),
            log_attachment: with_log.then(|| b"index,prompt,outcome,timestamp\n".to_vec()),
        }
    }

    fn sender() -> Mailbox {
        "me@example.com".parse().unwrap()
    }

    #[test]
    fn test_message_has_zip_and_log_attachments() {
        let message = build_message(&sender(), "to@example.com", &job(true)).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: Images ready"));
        assert!(raw.contains("To: to@example.com"));
        assert!(raw.contains("application/zip"));
        assert!(raw.contains("batch.zip"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains(LOG_FILE_NAME));
    }

    #[test]
    fn test_message_without_log() {
        let message = build_message(&sender(), "to@example.com", &job(false)).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("batch.zip"));
        assert!(!raw.contains(LOG_FILE_NAME));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let err = build_message(&sender(), "not an address", &job(false)).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress { .. }));
    }

    /// 本地脚本化 SMTP 服务器：RCPT 一律返回 550
    async fn rejecting_server() -> u16 {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();

            write.write_all(b"220 localhost ESMTP\r\n").await.unwrap();
            while let Ok(Some(line)) = lines.next_line().await {
                let command = line.to_ascii_uppercase();
                let reply: &[u8] = if command.starts_with("EHLO") || command.starts_with("HELO") {
                    b"250 localhost\r\n"
                } else if command.starts_with("MAIL") || command.starts_with("RSET") {
                    b"250 OK\r\n"
                } else if command.starts_with("RCPT") {
                    b"550 5.1.1 no such user\r\n"
                } else if command.starts_with("QUIT") {
                    let _ = write.write_all(b"221 bye\r\n").await;
                    break;
                } else {
                    b"502 not implemented\r\n"
                };
                if write.write_all(reply).await.is_err() {
                    break;
                }
            }
        });

        port
    }

    #[tokio::test]
    async fn test_permanent_smtp_error_is_rejection() {
        let port = rejecting_server().await;
        let mailer = SmtpMailer {
            sender: sender(),
            transport: AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("127.0.0.1")
                .port(port)
                .build(),
        };

        let err = mailer.send("to@example.com", &job(false)).await.unwrap_err();
        match err {
            DeliveryError::Rejected { recipient, reason } => {
                assert_eq!(recipient, "to@example.com");
                assert!(reason.contains("no such user"));
            }
            other => panic!("意外的错误: {:?}", other),
        }
    }

    #[test]
    fn test_mailer_rejects_invalid_sender() {
        let credentials = EmailCredentials {
            sender: "broken".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            SmtpMailer::new(&SmtpConfig::default(), &credentials),
            Err(DeliveryError::InvalidAddress { .. })
        ));
    }
}
