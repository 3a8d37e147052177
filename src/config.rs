//! 程序配置
//!
//! 加载顺序：默认值 → `config.toml`（或 `--config` 指定的文件）→ 环境变量。
//! 密钥只从环境变量读取一次，之后作为参数注入，核心流程不直接读取环境。

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::catalog::{is_known_style, SizeCatalog, AVAILABLE_STYLES};
use crate::models::prompt::PromptDefaults;
use crate::services::delivery_service::parse_recipients;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 默认风格
    pub default_style: String,
    /// 默认尺寸标签
    pub default_size: String,
    /// 压缩包名称
    pub project_name: String,
    /// 图片输出目录
    pub output_dir: String,
    /// 收件人（逗号分隔）
    pub recipients: String,
    /// 邮件主题
    pub email_subject: String,
    /// 邮件正文
    pub email_message: String,
    /// 是否附带运行日志
    pub include_log: bool,
    /// 发送前是否预览邮件
    pub preview_email: bool,
    // --- 图片生成 API ---
    pub image: ImageApiConfig,
    // --- 邮件服务器 ---
    pub smtp: SmtpConfig,
    /// 自定义尺寸标签
    pub sizes: BTreeMap<String, String>,
}

/// 图片生成 API 配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageApiConfig {
    pub api_base: String,
    pub model: String,
    pub quality: String,
}

/// 邮件服务器配置（隐式 TLS）
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_style: AVAILABLE_STYLES[0].to_string(),
            default_size: "Square (1:1)".to_string(),
            project_name: "generated_images".to_string(),
            output_dir: "generated_images".to_string(),
            recipients: String::new(),
            email_subject: "Your Generated Images ZIP".to_string(),
            email_message: "Here is your image zip file and upload log.".to_string(),
            include_log: true,
            preview_email: true,
            image: ImageApiConfig::default(),
            smtp: SmtpConfig::default(),
            sizes: BTreeMap::new(),
        }
    }
}

impl Default for ImageApiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            quality: "standard".to_string(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            relay: "smtp.gmail.com".to_string(),
            port: 465,
        }
    }
}

impl Config {
    /// 加载配置并校验
    ///
    /// 指定了文件则必须存在；未指定时当前目录有 `config.toml` 就读取。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        let config = base.with_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用外部变量覆盖配置，`lookup` 返回 `None` 或无法解析时保留原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str, current: String| lookup(name).unwrap_or(current);
        let flag = |name: &str, current: bool| {
            lookup(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(current)
        };

        Self {
            default_style: text("DEFAULT_STYLE", self.default_style),
            default_size: text("DEFAULT_SIZE", self.default_size),
            project_name: text("PROJECT_NAME", self.project_name),
            output_dir: text("OUTPUT_DIR", self.output_dir),
            recipients: text("EMAIL_RECIPIENTS", self.recipients),
            email_subject: text("EMAIL_SUBJECT", self.email_subject),
            email_message: text("EMAIL_MESSAGE", self.email_message),
            include_log: flag("INCLUDE_LOG", self.include_log),
            preview_email: flag("PREVIEW_EMAIL", self.preview_email),
            image: ImageApiConfig {
                api_base: text("IMAGE_API_BASE", self.image.api_base),
                model: text("IMAGE_MODEL", self.image.model),
                quality: text("IMAGE_QUALITY", self.image.quality),
            },
            smtp: SmtpConfig {
                relay: text("SMTP_RELAY", self.smtp.relay),
                port: lookup("SMTP_PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(self.smtp.port),
            },
            sizes: self.sizes,
        }
    }

    /// 校验默认风格与默认尺寸
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_known_style(&self.default_style) {
            return Err(ConfigError::UnknownStyle {
                style: self.default_style.clone(),
                available: AVAILABLE_STYLES.iter().map(|s| s.to_string()).collect(),
            });
        }

        let sizes = self.size_catalog();
        if sizes.dimensions(&self.default_size).is_none() {
            return Err(ConfigError::UnknownSizeLabel {
                label: self.default_size.clone(),
                available: sizes.labels(),
            });
        }

        Ok(())
    }

    /// 尺寸目录（内置 + 自定义）
    pub fn size_catalog(&self) -> SizeCatalog {
        SizeCatalog::with_extra(&self.sizes)
    }

    pub fn prompt_defaults(&self) -> PromptDefaults {
        PromptDefaults::new(self.default_style.trim(), self.default_size.trim())
    }

    pub fn recipient_list(&self) -> Vec<String> {
        parse_recipients(&self.recipients)
    }
}

/// 邮件发件人凭据
#[derive(Clone)]
pub struct EmailCredentials {
    pub sender: String,
    pub password: String,
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender", &self.sender)
            .field("password", &"***")
            .finish()
    }
}

/// 进程级密钥，启动时读取一次
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub email: Option<EmailCredentials>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"***")
            .field("email", &self.email)
            .finish()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `OPENAI_API_KEY` 必填；`EMAIL_SENDER`/`EMAIL_PASSWORD` 只有发送邮件时需要
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key =
            non_empty("OPENAI_API_KEY").ok_or_else(|| ConfigError::MissingSecret {
                name: "OPENAI_API_KEY".to_string(),
            })?;

        let email = match (non_empty("EMAIL_SENDER"), non_empty("EMAIL_PASSWORD")) {
            (Some(sender), Some(password)) => Some(EmailCredentials { sender, password }),
            _ => None,
        };

        Ok(Self {
            openai_api_key,
            email,
        })
    }

    /// 发件人凭据，未配置时报错
    pub fn email(&self) -> Result<&EmailCredentials, ConfigError> {
        self.email.as_ref().ok_or_else(|| ConfigError::MissingSecret {
            name: "EMAIL_SENDER / EMAIL_PASSWORD".to_string(),
        })
    }
}
