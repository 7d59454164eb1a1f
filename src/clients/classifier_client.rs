/// 分类服务 HTTP 客户端
///
/// 封装对 `POST /api/classify` 与 `GET /health` 的调用
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::clients::EmailClassifier;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{EmailClassification, ServiceClassification};
use crate::utils::logging::truncate_text;

const CLASSIFY_PATH: &str = "/api/classify";
const HEALTH_PATH: &str = "/health";

/// 分类服务客户端
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: Client,
    base_url: String,
}

impl ClassifierClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Other(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送一封邮件进行分类
    ///
    /// # 参数
    /// - `content`: 邮件原文，调用方负责保证非空
    ///
    /// # 返回
    /// 成功时返回归一化后的分类结果；网络不通返回 `Connectivity`，
    /// 非 2xx 或无法解析的响应返回 `Remote`
    pub async fn classify_email(&self, content: &str) -> Result<EmailClassification, ApiError> {
        let endpoint = self.endpoint(CLASSIFY_PATH);
        debug!("正在调用分类服务: {}", endpoint);
        debug!("邮件长度: {} 字符", content.chars().count());

        let response = self
            .http
            .post(&endpoint)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| {
                warn!("分类服务请求失败: {}", e);
                ApiError::connectivity(CLASSIFY_PATH, &self.base_url, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::connectivity(CLASSIFY_PATH, &self.base_url, e))?;

        if !status.is_success() {
            let message = extract_error_message(status.as_u16(), &body);
            warn!("分类服务返回错误 (HTTP {}): {}", status.as_u16(), message);
            return Err(ApiError::remote(CLASSIFY_PATH, status.as_u16(), message));
        }

        let raw: ServiceClassification = serde_json::from_str(&body).map_err(|e| {
            warn!(
                "分类服务响应无法解析: {} | 响应: {}",
                e,
                truncate_text(&body, 200)
            );
            ApiError::remote(
                CLASSIFY_PATH,
                status.as_u16(),
                format!("分类服务返回了无法解析的响应: {}", e),
            )
        })?;

        debug!("分类服务调用成功，类别: {}", raw.category);
        Ok(raw.into())
    }

    /// 检查分类服务是否在线
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| ApiError::connectivity(HEALTH_PATH, &self.base_url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::remote(
            HEALTH_PATH,
            status.as_u16(),
            extract_error_message(status.as_u16(), &body),
        ))
    }
}

#[async_trait]
impl EmailClassifier for ClassifierClient {
    async fn classify(&self, content: &str) -> Result<EmailClassification, ApiError> {
        self.classify_email(content).await
    }
}

/// 从错误响应中提取提示信息
///
/// 顺序：JSON 的 `detail` → JSON 的 `message` → 通用信息；
/// 响应不是 JSON 时使用原始文本（为空则用通用信息）。
pub fn extract_error_message(status: u16, body: &str) -> String {
    let generic = format!("HTTP 错误: {}", status);

    match serde_json::from_str::<Value>(body) {
        Ok(data) => field_message(&data, "detail")
            .or_else(|| field_message(&data, "message"))
            .unwrap_or(generic),
        Err(_) if !body.trim().is_empty() => body.to_string(),
        Err(_) => generic,
    }
}

fn field_message(data: &Value, field: &str) -> Option<String> {
    match data.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
