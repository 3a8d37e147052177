//! 错误类型
//!
//! 按影响范围划分：
//! - `LoadError`、`ConfigError`：致命错误，在处理任何一行之前终止
//! - `GenerationError`、`WriteError`：只影响当前行，记录后继续下一行
//! - `DeliveryError`：只影响当前收件人
//! - `PackageError`：打包阶段错误

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表格加载错误
    #[error("表格加载错误: {0}")]
    Load(#[from] LoadError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 打包错误
    #[error("打包错误: {0}")]
    Package(#[from] PackageError),
    /// 发送错误
    #[error("发送错误: {0}")]
    Delivery(#[from] DeliveryError),
}

/// 表格加载错误（致命，整批不处理）
#[derive(Debug, Error)]
pub enum LoadError {
    /// 缺少 Prompt 列
    #[error("表格必须包含 'Prompt' 列 (现有列: {found:?})")]
    MissingColumn { found: Vec<String> },
    /// 无法打开表格文件
    #[error("无法打开表格 {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },
    /// 表格中没有工作表
    #[error("表格 {path} 中没有工作表")]
    NoWorksheet { path: String },
}

/// 图片生成错误（仅影响当前行）
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 提示词为空
    #[error("提示词为空")]
    EmptyPrompt,
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务返回错误响应
    #[error("服务返回错误 ({endpoint}): status={status}, message={message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 请求频率限制
    #[error("请求频率限制 ({endpoint}), 建议等待: {retry_after:?}秒")]
    RateLimited {
        endpoint: String,
        retry_after: Option<u64>,
    },
    /// 响应格式不正确
    #[error("响应格式不正确: {reason}")]
    MalformedResponse { reason: String },
    /// base64 解码失败
    #[error("图片 base64 解码失败: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// 文件写入错误（仅影响当前行）
#[derive(Debug, Error)]
#[error("写入文件失败 ({path}): {source}")]
pub struct WriteError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// 邮件发送错误（仅影响当前收件人）
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// 邮箱地址无效
    #[error("邮箱地址无效 '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    /// 邮件构建失败
    #[error("邮件构建失败: {0}")]
    Build(#[from] lettre::error::Error),
    /// 附件类型无效
    #[error("附件类型无效: {0}")]
    ContentType(String),
    /// SMTP 传输失败
    #[error("SMTP 传输失败: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    /// 服务器拒收
    #[error("收件人 {recipient} 被拒收: {reason}")]
    Rejected { recipient: String, reason: String },
}

/// 打包错误
#[derive(Debug, Error)]
pub enum PackageError {
    /// 没有任何成功生成的图片
    #[error("没有可打包的图片")]
    NoArtifacts,
    /// 压缩失败
    #[error("压缩失败: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// 日志序列化失败
    #[error("日志序列化失败: {0}")]
    Csv(#[from] csv::Error),
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未知风格
    #[error("未知风格 '{style}', 可选: {available:?}")]
    UnknownStyle {
        style: String,
        available: Vec<String>,
    },
    /// 未知尺寸标签
    #[error("未知尺寸 '{label}', 可选: {available:?}")]
    UnknownSizeLabel {
        label: String,
        available: Vec<String>,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 解析配置文件失败
    #[error("解析配置文件失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 缺少密钥
    #[error("缺少密钥: 环境变量 {name} 未设置")]
    MissingSecret { name: String },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
