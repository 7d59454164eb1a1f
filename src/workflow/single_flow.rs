//! 单封邮件处理流程 - 流程层
//!
//! 定义"提交一封邮件"的完整流程：
//! 1. 设置 loading、清空上一次的错误
//! 2. 调用分类服务（只调用一次，不重试）
//! 3. 成功 → 保存为当前结果并写入历史；失败 → 记录面向用户的错误信息
//! 4. 无论如何退出，loading 都会被清除

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::clients::EmailClassifier;
use crate::models::{EmailClassification, EmailRecord};
use crate::services::SharedRecordStore;
use crate::utils::logging::truncate_text;

/// 分类失败且没有具体信息时的提示
pub const GENERIC_ERROR_MESSAGE: &str = "分类失败，请检查网络连接后重试";

/// 单封提交的可见状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleState {
    pub current_result: Option<EmailClassification>,
    pub loading: bool,
    pub error: Option<String>,
}

pub type SharedSingleState = Arc<RwLock<SingleState>>;

/// 单封处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOutcome {
    /// 分类成功并已写入历史
    Classified(EmailRecord),
    /// 分类失败，附带面向用户的错误信息
    Failed(String),
    /// 上一次提交仍在进行中，本次被忽略
    Busy,
}

/// 持有期间 loading 为 true，析构时清除
struct LoadingGuard {
    state: SharedSingleState,
}

impl LoadingGuard {
    fn acquire(state: &SharedSingleState) -> Option<Self> {
        let mut current = state.write();
        if current.loading {
            return None;
        }
        current.loading = true;
        current.error = None;
        Some(Self {
            state: Arc::clone(state),
        })
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}

/// 单封邮件处理流程
pub struct SingleFlow<C> {
    classifier: Arc<C>,
    records: SharedRecordStore,
    state: SharedSingleState,
}

impl<C: EmailClassifier> SingleFlow<C> {
    pub fn new(classifier: Arc<C>, records: SharedRecordStore) -> Self {
        Self {
            classifier,
            records,
            state: SharedSingleState::default(),
        }
    }

    pub fn state(&self) -> SingleState {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// 把历史中的某条结果设为当前结果
    pub fn show(&self, classification: EmailClassification) {
        self.state.write().current_result = Some(classification);
    }

    pub async fn run(&self, text: &str) -> SingleOutcome {
        let Some(_loading) = LoadingGuard::acquire(&self.state) else {
            warn!("⚠️ 上一封邮件仍在分类中，忽略本次提交");
            return SingleOutcome::Busy;
        };

        info!("📨 正在分类: {}", truncate_text(text.trim(), 50));

        match self.classifier.classify(text).await {
            Ok(classification) => {
                info!(
                    "✓ 分类完成: {} | 优先级 {} | {}",
                    classification.category, classification.priority, classification.summary
                );
                let record = EmailRecord::new(text, classification.clone());
                self.state.write().current_result = Some(classification);
                self.records.write().append(record.clone());
                SingleOutcome::Classified(record)
            }
            Err(e) => {
                let message = e.user_message();
                let message = if message.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                error!("❌ 邮件分类失败 ({}): {}", e.endpoint(), message);
                self.state.write().error = Some(message.clone());
                SingleOutcome::Failed(message)
            }
        }
    }
}
