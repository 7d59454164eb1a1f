//! 仪表盘控制器 - 编排层
//!
//! 持有整个会话的应用状态（历史记录、当前结果、错误信息、批量进度），
//! 是展示层唯一的入口。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::EmailClassifier;
use crate::models::{BatchState, BatchSummary, EmailClassification, EmailRecord};
use crate::orchestrator::batch_processor::{BatchProcessor, DelayPolicy};
use crate::services::{HistoryStats, RecordFilter, RecordStore, SharedRecordStore};
use crate::workflow::{SingleFlow, SingleOutcome};

/// 仪表盘控制器
pub struct Dashboard<C> {
    records: SharedRecordStore,
    single: SingleFlow<C>,
    batch: BatchProcessor<C>,
}

impl<C: EmailClassifier> Dashboard<C> {
    pub fn new(classifier: C, policy: DelayPolicy) -> Self {
        let classifier = Arc::new(classifier);
        let records = RecordStore::shared();
        Self {
            single: SingleFlow::new(Arc::clone(&classifier), Arc::clone(&records)),
            batch: BatchProcessor::new(classifier, Arc::clone(&records), policy),
            records,
        }
    }

    // ========== 命令 ==========

    /// 提交一封邮件
    ///
    /// 空白内容直接忽略；批量任务运行期间或上一封仍在处理时也会忽略。
    pub async fn submit_single(&self, text: &str) -> Option<SingleOutcome> {
        if text.trim().is_empty() {
            debug!("忽略空白邮件内容");
            return None;
        }
        if self.batch.is_running() {
            warn!("⚠️ 批量处理进行中，暂不接受单封提交");
            return None;
        }
        Some(self.single.run(text).await)
    }

    /// 提交一批邮件（调用方负责拆行和过滤）
    pub async fn submit_batch(&self, lines: Vec<String>) -> BatchSummary {
        self.batch.run(&lines).await
    }

    pub fn cancel_batch(&self) {
        self.batch.cancel();
    }

    /// 把历史中的某条记录设为当前结果
    pub fn select_record(&self, id: Uuid) -> bool {
        let classification = self
            .records
            .read()
            .get(id)
            .map(|record| record.classification.clone());
        match classification {
            Some(classification) => {
                self.single.show(classification);
                true
            }
            None => false,
        }
    }

    // ========== 只读视图 ==========

    pub fn batch_state(&self) -> BatchState {
        self.batch.state()
    }

    pub fn subscribe_batch(&self) -> watch::Receiver<BatchState> {
        self.batch.subscribe()
    }

    /// 全部历史记录（最新在前）
    pub fn records(&self) -> Vec<EmailRecord> {
        self.records.read().to_vec()
    }

    pub fn filtered_records(&self, filter: &RecordFilter) -> Vec<EmailRecord> {
        self.records.read().filter(filter)
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_records(self.records.read().iter())
    }

    pub fn current_result(&self) -> Option<EmailClassification> {
        self.single.state().current_result
    }

    pub fn error(&self) -> Option<String> {
        self.single.state().error
    }

    pub fn is_loading(&self) -> bool {
        self.single.is_loading()
    }
}
