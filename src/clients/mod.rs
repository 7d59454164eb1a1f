pub mod classifier_client;

pub use classifier_client::ClassifierClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::EmailClassification;

/// 邮件分类能力
///
/// 编排层只依赖这个 trait，测试中可以替换为脚本化的实现。
#[async_trait]
pub trait EmailClassifier: Send + Sync {
    /// 对一封邮件进行分类，不做任何重试
    async fn classify(&self, content: &str) -> Result<EmailClassification, ApiError>;
}

#[async_trait]
impl<T: EmailClassifier + ?Sized> EmailClassifier for Arc<T> {
    async fn classify(&self, content: &str) -> Result<EmailClassification, ApiError> {
        (**self).classify(content).await
    }
}
