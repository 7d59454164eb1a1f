//! 历史记录存储 - 业务能力层
//!
//! 只追加、按时间倒序（最新的在前）保存成功分类的邮件，并提供只读过滤

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{EmailCategory, EmailRecord};

/// 类别过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EmailCategory),
}

impl CategoryFilter {
    /// 解析用户输入：`All`/`Todos` 或类别名
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Some(CategoryFilter::All),
            other => EmailCategory::parse(other).map(CategoryFilter::Only),
        }
    }

    pub fn matches(self, category: EmailCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => expected == category,
        }
    }
}

/// 历史记录过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// 在摘要和原文中搜索（不区分大小写），为空时匹配全部
    pub search: String,
    pub category: CategoryFilter,
}

impl RecordFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn matches(&self, record: &EmailRecord) -> bool {
        if !self.category.matches(record.classification.category) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record.classification.summary.to_lowercase().contains(&needle)
            || record.content.to_lowercase().contains(&needle)
    }
}

/// 单条流程与批量流程共享的历史记录
pub type SharedRecordStore = Arc<RwLock<RecordStore>>;

/// 邮件历史记录
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: VecDeque<EmailRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRecordStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// 追加一条记录到最前面
    ///
    /// 时间戳早于当前最新记录时会被调整为该记录的时间，保证插入顺序上时间不倒退。
    pub fn append(&mut self, mut record: EmailRecord) {
        if let Some(newest) = self.records.front() {
            if record.timestamp < newest.timestamp {
                record.timestamp = newest.timestamp;
            }
        }
        self.records.push_front(record);
    }

    /// 按条件过滤，返回新的列表（顺序与存储一致），不修改存储
    pub fn filter(&self, filter: &RecordFilter) -> Vec<EmailRecord> {
        self.records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    /// 最新在前的迭代器
    pub fn iter(&self) -> impl Iterator<Item = &EmailRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<EmailRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&EmailRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
