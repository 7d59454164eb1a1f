//! # FinMail Classifier
//!
//! 一个把财务邮件提交给远程分类服务、并在会话内汇总结果的 Rust 客户端
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 唯一与分类服务通信的地方
//! - `EmailClassifier` - 分类能力的 trait，编排层只依赖它
//! - `ClassifierClient` - 基于 reqwest 的 HTTP 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `RecordStore` - 只追加、最新在前的历史记录与过滤
//! - `HistoryStats` - 按类别 / 优先级汇总
//! - `email_loader` - 把上传的文本拆成邮件列表
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一封邮件"的完整处理流程
//! - `SingleFlow` - loading → 分类 → 写入历史 / 记录错误
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，顺序提交并控制节奏
//! - `orchestrator/dashboard` - 持有会话状态，对展示层暴露命令和视图
//! - `orchestrator/app` - 命令行应用

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ClassifierClient, EmailClassifier};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult};
pub use models::{
    BatchState, BatchSummary, EmailCategory, EmailClassification, EmailRecord, Priority,
    Sentiment,
};
pub use orchestrator::{App, BatchProcessor, Dashboard, DelayPolicy};
pub use services::{CategoryFilter, HistoryStats, RecordFilter, RecordStore};
pub use workflow::{SingleFlow, SingleOutcome};
