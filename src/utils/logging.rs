/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{BatchState, BatchSummary};
use crate::services::HistoryStats;

/// 初始化 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 FinMail 邮件分类启动");
    info!("🌐 分类服务: {}", base_url);
    info!("{}", "=".repeat(60));
}

/// 记录批量处理开始
///
/// # 参数
/// - `total`: 邮件总数
/// - `delay_ms`: 每封之间的间隔
pub fn log_batch_start(total: usize, delay_ms: u128) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始批量处理: 共 {} 封邮件", total);
    info!("⏱️ 每封间隔 {} ms，逐封顺序处理", delay_ms);
    info!("{}", "=".repeat(60));
}

/// 记录批量进度
pub fn log_batch_progress(state: &BatchState) {
    info!(
        "📊 进度: {}/{} ({:.0}%) | 失败 {}",
        state.current,
        state.total,
        state.progress_percentage(),
        state.errors
    );
}

/// 记录批量处理完成
pub fn log_batch_complete(summary: &BatchSummary) {
    info!("\n{}", "─".repeat(60));
    if summary.cancelled {
        info!(
            "⏹️ 批量处理已取消: 已处理 {}/{}",
            summary.attempted(),
            summary.total
        );
    } else {
        info!("✓ 批量处理完成");
    }
    info!("✅ 成功: {}/{}", summary.succeeded, summary.total);
    info!("❌ 失败: {}", summary.failed);
    info!("{}", "─".repeat(60));
}

/// 打印历史统计
pub fn print_history_stats(stats: &HistoryStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 历史统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📨 总数: {}", stats.total);
    info!(
        "🟦 Produtivo: {} | ⬜ Improdutivo: {}",
        stats.productive, stats.unproductive
    );
    info!(
        "🔺 Alta: {} | 🔸 Média: {} | 🔹 Baixa: {}",
        stats.high, stats.medium, stats.low
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
