//! 历史统计 - 业务能力层
//!
//! 按类别和优先级汇总历史记录

use crate::models::{EmailCategory, EmailRecord, Priority};

/// 历史记录汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub productive: usize,
    pub unproductive: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl HistoryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EmailRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut stats, record| {
                stats.total += 1;
                match record.classification.category {
                    EmailCategory::Productive => stats.productive += 1,
                    EmailCategory::Unproductive => stats.unproductive += 1,
                }
                match record.classification.priority {
                    Priority::High => stats.high += 1,
                    Priority::Medium => stats.medium += 1,
                    Priority::Low => stats.low += 1,
                }
                stats
            })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
