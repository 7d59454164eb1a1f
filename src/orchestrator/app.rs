//! 命令行应用 - 编排层
//!
//! 负责应用生命周期：初始化客户端、驱动仪表盘、输出进度和结果

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clients::ClassifierClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{BatchSummary, EmailClassification, EmailRecord};
use crate::orchestrator::batch_processor::DelayPolicy;
use crate::orchestrator::dashboard::Dashboard;
use crate::services::{load_batch_file, RecordFilter};
use crate::utils::logging::{
    log_batch_progress, log_startup, print_history_stats, truncate_text,
};
use crate::workflow::SingleOutcome;

/// 应用主结构
pub struct App {
    config: Config,
    dashboard: Arc<Dashboard<ClassifierClient>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config.api_base_url);

        let client = ClassifierClient::new(&config)?;
        match client.health_check().await {
            Ok(()) => info!("✓ 分类服务在线"),
            Err(e) => warn!("⚠️ 分类服务健康检查失败: {}", e),
        }

        let policy = DelayPolicy::from_config(&config)?;

        Ok(Self {
            config,
            dashboard: Arc::new(Dashboard::new(client, policy)),
        })
    }

    /// 分类单封邮件并输出结果
    pub async fn classify(&self, text: &str) -> AppResult<EmailClassification> {
        match self.dashboard.submit_single(text).await {
            Some(SingleOutcome::Classified(record)) => {
                log_classification(&record.classification);
                Ok(record.classification)
            }
            Some(SingleOutcome::Failed(message)) => Err(AppError::Other(message)),
            Some(SingleOutcome::Busy) => Err(AppError::Other("上一封邮件仍在处理中".to_string())),
            None => Err(AppError::Other("邮件内容不能为空".to_string())),
        }
    }

    /// 批量处理文件中的邮件，结束后输出过滤后的历史和统计
    pub async fn run_batch(&self, path: &Path, filter: &RecordFilter) -> AppResult<BatchSummary> {
        let emails = load_batch_file(path, self.config.min_line_length).await?;

        if emails.is_empty() {
            warn!("⚠️ 文件中没有可处理的邮件，程序结束");
            return Ok(BatchSummary::default());
        }

        let progress = self.spawn_progress_reporter();
        let interrupt = self.spawn_interrupt_handler();

        let summary = self.dashboard.submit_batch(emails).await;

        interrupt.abort();
        let _ = progress.await;

        self.print_history(filter);
        print_history_stats(&self.dashboard.stats());

        Ok(summary)
    }

    /// 每次进度变化输出一行，批次结束后退出
    fn spawn_progress_reporter(&self) -> JoinHandle<()> {
        let mut updates = self.dashboard.subscribe_batch();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let state = *updates.borrow_and_update();
                log_batch_progress(&state);
                if !state.is_processing {
                    break;
                }
            }
        })
    }

    /// Ctrl-C 时请求取消批次
    fn spawn_interrupt_handler(&self) -> JoinHandle<()> {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⏹️ 收到中断信号，正在停止批量处理...");
                dashboard.cancel_batch();
            }
        })
    }

    fn print_history(&self, filter: &RecordFilter) {
        let records = self.dashboard.filtered_records(filter);
        info!("\n📋 历史记录: {} 条", records.len());
        for record in &records {
            log_record(record);
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_classification(classification: &EmailClassification) {
    info!("{}", "─".repeat(60));
    info!("📂 类别: {}", classification.category);
    info!("🔺 优先级: {}", classification.priority);
    info!("💬 情绪: {}", classification.sentiment);
    info!("📝 摘要: {}", classification.summary);
    info!("🔍 理由: {}", classification.reason);
    info!("✉️ 建议回复:\n{}", classification.suggested_response);
    info!("{}", "─".repeat(60));
}

fn log_record(record: &EmailRecord) {
    info!(
        "[{}] {} | {} | {}",
        record.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
        record.classification.category,
        record.classification.priority,
        truncate_text(&record.classification.summary, 60)
    );
}
