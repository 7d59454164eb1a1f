use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::classification::EmailClassification;

/// 一条成功分类的邮件记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub id: Uuid,
    /// 提交时的原文，不做任何修改
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub classification: EmailClassification,
}

impl EmailRecord {
    /// 以当前时间创建记录
    pub fn new(content: impl Into<String>, classification: EmailClassification) -> Self {
        Self::with_timestamp(content, classification, Utc::now())
    }

    pub fn with_timestamp(
        content: impl Into<String>,
        classification: EmailClassification,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            timestamp,
            classification,
        }
    }
}
