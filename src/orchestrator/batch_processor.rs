//! 批量邮件处理器 - 编排层
//!
//! ## 职责
//!
//! 把一批邮件逐封提交给分类服务，并维护进度状态。
//!
//! ## 处理规则
//!
//! 1. **严格顺序**：上一封的请求返回、间隔等待结束之后才提交下一封，绝不并发
//! 2. **失败隔离**：单封失败只计数，不写入历史，也不会中断整批
//! 3. **限流退避**：错误信息带有限流特征时，额外等待冷却时间
//! 4. **固定间隔**：每封之间等待固定时间，最后一封之后不等待
//! 5. **协作取消**：取消信号在每封开始前和等待期间检查，进行中的请求不会被丢弃
//!
//! 进度通过 `watch` 通道发布，展示层可以随时读取或订阅。

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clients::EmailClassifier;
use crate::config::Config;
use crate::error::{ApiError, ConfigError};
use crate::models::{BatchState, BatchSummary, EmailRecord};
use crate::services::SharedRecordStore;
use crate::utils::logging::{log_batch_complete, log_batch_start, truncate_text};

/// 批量处理的等待策略
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    /// 每封之间的固定间隔
    pub inter_item: Duration,
    /// 触发限流后的额外冷却
    pub rate_limit_cooldown: Duration,
    rate_limit_signature: Regex,
}

impl DelayPolicy {
    pub fn new(inter_item: Duration, rate_limit_cooldown: Duration, signature: Regex) -> Self {
        Self {
            inter_item,
            rate_limit_cooldown,
            rate_limit_signature: signature,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.inter_item_delay(),
            config.rate_limit_cooldown(),
            config.rate_limit_regex()?,
        ))
    }

    /// 判断错误是否为限流：HTTP 429，或服务端错误信息匹配限流特征
    ///
    /// 连接失败不算限流（提示信息里带有后端地址，不参与匹配）。
    pub fn is_rate_limited(&self, err: &ApiError) -> bool {
        match err {
            ApiError::Remote {
                status, message, ..
            } => *status == 429 || self.rate_limit_signature.is_match(message),
            ApiError::Connectivity { .. } => false,
        }
    }
}

/// 批量邮件处理器
pub struct BatchProcessor<C> {
    classifier: Arc<C>,
    records: SharedRecordStore,
    policy: DelayPolicy,
    state: watch::Sender<BatchState>,
    cancellation: Mutex<CancellationToken>,
}

impl<C: EmailClassifier> BatchProcessor<C> {
    pub fn new(classifier: Arc<C>, records: SharedRecordStore, policy: DelayPolicy) -> Self {
        let (state, _) = watch::channel(BatchState::default());
        Self {
            classifier,
            records,
            policy,
            state,
            cancellation: Mutex::new(CancellationToken::new()),
        }
    }

    /// 当前进度快照
    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    /// 订阅进度变化
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_processing
    }

    /// 请求取消当前批次
    ///
    /// 只作用于正在运行的批次：空闲时（包括 `run` 已调用但批次尚未开始的瞬间）
    /// 的取消请求会被丢弃，不会影响下一批。
    pub fn cancel(&self) {
        if self.is_running() {
            info!("⏹️ 收到取消请求，当前邮件处理完后停止");
        }
        self.cancellation.lock().cancel();
    }

    /// 逐封处理一批邮件
    ///
    /// 不会返回错误：单封失败只计入 `errors`。已有批次在运行时直接忽略本次调用。
    pub async fn run(&self, items: &[String]) -> BatchSummary {
        let total = items.len();
        let Some(running) = self.begin(total) else {
            warn!("⚠️ 已有批量任务在运行，忽略本次提交");
            return BatchSummary::default();
        };

        log_batch_start(total, self.policy.inter_item.as_millis());

        let token = &running.token;
        for (index, item) in items.iter().enumerate() {
            if token.is_cancelled() {
                break;
            }
            let position = index + 1;

            match self.classifier.classify(item).await {
                Ok(classification) => {
                    info!(
                        "[邮件 {}/{}] ✓ {} | {}",
                        position,
                        total,
                        classification.category,
                        truncate_text(&classification.summary, 60)
                    );
                    self.records
                        .write()
                        .append(EmailRecord::new(item.as_str(), classification));
                    self.state.send_modify(BatchState::record_success);
                }
                Err(e) => {
                    error!(
                        "[邮件 {}/{}] ❌ 分类失败 ({}): {}",
                        position,
                        total,
                        e.endpoint(),
                        e
                    );
                    if let ApiError::Connectivity { reason, .. } = &e {
                        debug!("连接失败原因: {}", reason);
                    }
                    self.state.send_modify(BatchState::record_failure);

                    if self.policy.is_rate_limited(&e) {
                        warn!(
                            "[邮件 {}/{}] ⏳ 触发限流，额外等待 {} ms",
                            position,
                            total,
                            self.policy.rate_limit_cooldown.as_millis()
                        );
                        if !pause(self.policy.rate_limit_cooldown, token).await {
                            break;
                        }
                    }
                }
            }

            if position < total && !pause(self.policy.inter_item, token).await {
                break;
            }
        }

        drop(running);
        let state = self.state();
        let summary = BatchSummary {
            total,
            succeeded: state.succeeded(),
            failed: state.errors,
            cancelled: state.current < total,
        };
        log_batch_complete(&summary);
        summary
    }

    /// 重置进度并换上新的取消令牌；已有批次在运行时返回 `None`
    fn begin(&self, total: usize) -> Option<RunningBatch<'_>> {
        let mut cancellation = self.cancellation.lock();
        let started = self.state.send_if_modified(|state| {
            if state.is_processing {
                return false;
            }
            *state = BatchState::started(total);
            true
        });
        if !started {
            return None;
        }
        *cancellation = CancellationToken::new();
        Some(RunningBatch {
            state: &self.state,
            token: cancellation.clone(),
        })
    }
}

/// 批次运行期间持有，析构时结束批次
///
/// `run` 的 future 被中途丢弃（超时、select 分支、任务被 abort）时
/// `is_processing` 也会被清除，后续提交不会被永久拒绝。
struct RunningBatch<'a> {
    state: &'a watch::Sender<BatchState>,
    token: CancellationToken,
}

impl Drop for RunningBatch<'_> {
    fn drop(&mut self) {
        self.state.send_modify(BatchState::finish);
    }
}

/// 等待指定时间；被取消时提前返回 `false`
async fn pause(duration: Duration, token: &CancellationToken) -> bool {
    if duration.is_zero() {
        return !token.is_cancelled();
    }
    tokio::select! {
        _ = token.cancelled() => {
            debug!("等待被取消");
            false
        }
        _ = tokio::time::sleep(duration) => true,
    }
}
