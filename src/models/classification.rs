use serde::{Deserialize, Serialize};
use tracing::warn;

/// 邮件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailCategory {
    /// 需要处理或回复
    #[serde(rename = "Produtivo")]
    Productive,
    /// 祝贺、感谢等无需处理的邮件
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl EmailCategory {
    /// 分类服务使用的原始标签
    pub fn label(self) -> &'static str {
        match self {
            EmailCategory::Productive => "Produtivo",
            EmailCategory::Unproductive => "Improdutivo",
        }
    }

    /// 英文名称
    pub fn name(self) -> &'static str {
        match self {
            EmailCategory::Productive => "Productive",
            EmailCategory::Unproductive => "Unproductive",
        }
    }

    /// 解析用户输入的类别（英文名或服务标签，不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "productive" | "produtivo" => Some(EmailCategory::Productive),
            "unproductive" | "improdutivo" => Some(EmailCategory::Unproductive),
            _ => None,
        }
    }

    /// 归一化服务返回的类别标签
    ///
    /// 只有 `"Produtivo"` 映射为 `Productive`，其余一律为 `Unproductive`。
    /// 两个已知标签以外的值会记录警告，以便发现服务端标签变化。
    pub fn from_service_label(label: &str) -> Self {
        match label {
            "Produtivo" => EmailCategory::Productive,
            "Improdutivo" => EmailCategory::Unproductive,
            other => {
                warn!("⚠️ 分类服务返回了未知类别 {:?}，按 Improdutivo 处理", other);
                EmailCategory::Unproductive
            }
        }
    }
}

impl std::fmt::Display for EmailCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 优先级（Low < Medium < High）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 情绪倾向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Positivo")]
    Positive,
    #[serde(rename = "Neutro")]
    Neutral,
    #[serde(rename = "Negativo")]
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positivo",
            Sentiment::Neutral => "Neutro",
            Sentiment::Negative => "Negativo",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 单封邮件的分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailClassification {
    pub category: EmailCategory,
    pub reason: String,
    pub summary: String,
    pub suggested_response: String,
    pub priority: Priority,
    pub sentiment: Sentiment,
}

/// 分类服务返回的原始结构
///
/// `category` 保留为字符串，由 [`EmailCategory::from_service_label`] 归一化；
/// 其他多余字段忽略。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassification {
    pub category: String,
    pub reason: String,
    pub summary: String,
    pub suggested_response: String,
    pub priority: Priority,
    pub sentiment: Sentiment,
}

impl From<ServiceClassification> for EmailClassification {
    fn from(raw: ServiceClassification) -> Self {
        Self {
            category: EmailCategory::from_service_label(&raw.category),
            reason: raw.reason,
            summary: raw.summary,
            suggested_response: raw.suggested_response,
            priority: raw.priority,
            sentiment: raw.sentiment,
        }
    }
}
