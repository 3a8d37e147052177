/// 图片生成 API 客户端
///
/// 封装文生图接口调用与图片下载
use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ImageApiConfig;
use crate::error::GenerationError;
use crate::models::prompt::ResolvedRequest;

const GENERATIONS_PATH: &str = "/images/generations";

/// 图片生成能力
///
/// 每次调用只生成一张图片，只尝试一次。
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ResolvedRequest) -> Result<Vec<u8>, GenerationError>;
}

/// POST /images/generations 请求体
#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// 生成结果中的图片来源
#[derive(Debug, PartialEq, Eq)]
enum ImagePayload {
    Url(String),
    Base64(String),
}

/// 图片生成客户端
pub struct ImageClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    quality: String,
}

impl ImageClient {
    /// 创建新的图片生成客户端
    pub fn new(config: &ImageApiConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            quality: config.quality.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.api_base, GENERATIONS_PATH)
    }

    /// 调用生成接口，返回图片来源
    async fn request_image(&self, request: &ResolvedRequest) -> Result<ImagePayload, GenerationError> {
        let endpoint = self.endpoint();
        let body = ImagesGenerateRequest {
            model: &self.model,
            prompt: &request.final_prompt,
            n: 1,
            size: &request.size,
            quality: &self.quality,
        };

        debug!("调用图片生成接口，模型: {}, 尺寸: {}", self.model, request.size);

        let resp = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| GenerationError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let bytes = resp.bytes().await.map_err(|source| GenerationError::Request {
            endpoint: endpoint.clone(),
            source,
        })?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited {
                endpoint,
                retry_after,
            });
        }

        if !status.is_success() {
            return Err(GenerationError::BadResponse {
                endpoint,
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        parse_generation_response(&bytes)
    }

    /// 下载图片
    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        debug!("下载图片: {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| GenerationError::Request {
                endpoint: url.to_string(),
                source,
            })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|source| GenerationError::Request {
            endpoint: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(GenerationError::BadResponse {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: &ResolvedRequest) -> Result<Vec<u8>, GenerationError> {
        if request.final_prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        match self.request_image(request).await? {
            ImagePayload::Base64(b64) => Ok(general_purpose::STANDARD.decode(b64)?),
            ImagePayload::Url(url) => self.download(&url).await,
        }
    }
}

/// 解析生成接口的响应
fn parse_generation_response(bytes: &[u8]) -> Result<ImagePayload, GenerationError> {
    let parsed: ImagesGenerateResponse =
        serde_json::from_slice(bytes).map_err(|e| GenerationError::MalformedResponse {
            reason: format!("JSON 解析失败: {}", e),
        })?;

    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse {
            reason: "没有返回图片数据".to_string(),
        })?;

    if let Some(revised) = first.revised_prompt {
        debug!("服务改写后的提示词: {}", revised);
    }

    match (first.b64_json, first.url) {
        (Some(b64), _) => Ok(ImagePayload::Base64(b64)),
        (None, Some(url)) => Ok(ImagePayload::Url(url)),
        (None, None) => {
            warn!("图片数据中既没有 b64_json 也没有 url");
            Err(GenerationError::MalformedResponse {
                reason: "缺少 b64_json 和 url 字段".to_string(),
            })
        }
    }
}

/// 从错误响应中提取可读信息
fn error_message(bytes: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorBody>(bytes) {
        Ok(body) => body.error.message,
        Err(_) => crate::utils::logging::truncate_text(&String::from_utf8_lossy(bytes), 200),
    }
}
