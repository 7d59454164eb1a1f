/// 批量处理进度
///
/// 保证 `current <= total` 且 `errors <= current`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchState {
    pub is_processing: bool,
    pub total: usize,
    pub current: usize,
    pub errors: usize,
}

impl BatchState {
    /// 新一批开始时的状态
    pub fn started(total: usize) -> Self {
        Self {
            is_processing: true,
            total,
            current: 0,
            errors: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.current = (self.current + 1).min(self.total);
    }

    pub fn record_failure(&mut self) {
        self.record_success();
        self.errors = (self.errors + 1).min(self.current);
    }

    pub fn finish(&mut self) {
        self.is_processing = false;
    }

    /// 完成百分比（total 为 0 时返回 0）
    pub fn progress_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }

    pub fn succeeded(&self) -> usize {
        self.current - self.errors
    }
}

/// 一次批量处理的最终结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 是否在处理完所有邮件前被取消
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}
