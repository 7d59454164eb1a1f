//! 批量输入加载 - 业务能力层
//!
//! 把上传的文本文件拆成"一行一封"的邮件列表

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// 默认最短行长度：不超过该长度的行会被丢弃
pub const DEFAULT_MIN_LINE_LENGTH: usize = 10;

/// 按换行拆分文件内容
///
/// 每行去除首尾空白，只保留字符数大于 `min_len` 的行。
pub fn split_batch_lines(content: &str, min_len: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > min_len)
        .map(str::to_string)
        .collect()
}

/// 读取批量文件
pub async fn load_batch_file(path: &Path, min_len: usize) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let total_lines = content.lines().count();
    let emails = split_batch_lines(&content, min_len);
    debug!(
        "丢弃了 {} 行过短内容 (<= {} 字符)",
        total_lines - emails.len(),
        min_len
    );
    info!(
        "📁 已加载 {}: {} 封邮件",
        path.file_name().unwrap_or_default().to_string_lossy(),
        emails.len()
    );

    Ok(emails)
}
