//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `dashboard` - 仪表盘控制器
//! - 持有会话内的全部状态（历史、当前结果、错误、批量进度）
//! - 对展示层暴露提交命令和只读视图
//! - 批量运行期间拒绝单封提交
//!
//! ### `batch_processor` - 批量处理器
//! - 逐封顺序提交，固定间隔 + 限流冷却
//! - 单封失败隔离，进度通过 watch 通道发布
//! - 协作式取消
//!
//! ### `app` - 命令行应用
//! - 初始化客户端、输出进度、打印历史与统计
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! dashboard ──→ workflow::SingleFlow (单封)
//!     ↓
//! batch_processor (Vec<String>)
//!     ↓
//! services (record_store / history_stats / email_loader)
//!     ↓
//! clients (EmailClassifier / ClassifierClient)
//! ```

pub mod app;
pub mod batch_processor;
pub mod dashboard;

pub use app::App;
pub use batch_processor::{BatchProcessor, DelayPolicy};
pub use dashboard::Dashboard;
