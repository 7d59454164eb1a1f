//! 集成测试共用的脚本化分类器

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use finmail_classifier::config::DEFAULT_RATE_LIMIT_PATTERN;
use finmail_classifier::{
    ApiError, DelayPolicy, EmailCategory, EmailClassification, EmailClassifier, Priority,
    Sentiment,
};
use parking_lot::Mutex;

type Rule = Box<dyn Fn(&str) -> Result<EmailClassification, ApiError> + Send + Sync>;

/// 按规则返回结果，并记录每次调用的内容
pub struct ScriptedClassifier {
    rule: Rule,
    latency: Duration,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    pub fn new(
        rule: impl Fn(&str) -> Result<EmailClassification, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            rule: Box::new(rule),
            latency: Duration::from_millis(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 总是成功，摘要为原文
    pub fn always_ok() -> Self {
        Self::new(|content| Ok(classification(content, EmailCategory::Productive)))
    }

    /// 内容包含 `marker` 时返回指定错误信息
    pub fn failing_on(marker: &'static str, message: &'static str) -> Self {
        Self::new(move |content| {
            if content.contains(marker) {
                Err(ApiError::remote("/api/classify", 500, message))
            } else {
                Ok(classification(content, EmailCategory::Productive))
            }
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl EmailClassifier for ScriptedClassifier {
    async fn classify(&self, content: &str) -> Result<EmailClassification, ApiError> {
        self.calls.lock().push(content.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.rule)(content)
    }
}

pub fn classification(summary: &str, category: EmailCategory) -> EmailClassification {
    EmailClassification {
        category,
        reason: "Solicitação de ação".to_string(),
        summary: summary.to_string(),
        suggested_response: "Prezado,\nRetornaremos em breve.".to_string(),
        priority: Priority::Medium,
        sentiment: Sentiment::Neutral,
    }
}

/// 默认策略：间隔 2000 ms，限流冷却 5000 ms
pub fn default_policy() -> DelayPolicy {
    let signature = regex::RegexBuilder::new(DEFAULT_RATE_LIMIT_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("默认限流正则应该合法");
    DelayPolicy::new(
        Duration::from_millis(2000),
        Duration::from_millis(5000),
        signature,
    )
}

pub fn emails(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
