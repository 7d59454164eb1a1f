use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finmail_classifier::utils::logging;
use finmail_classifier::{App, CategoryFilter, Config, RecordFilter};

/// 财务邮件分类命令行工具
#[derive(Parser, Debug)]
#[command(name = "finmail", version, about = "把财务邮件提交给分类服务并汇总结果")]
struct Cli {
    /// TOML 配置文件路径（环境变量会覆盖其中的值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 分类单封邮件
    Classify {
        /// 邮件内容
        text: String,
    },
    /// 批量分类文本文件中的邮件（一行一封）
    Batch {
        /// 邮件文件路径
        file: PathBuf,
        /// 按摘要或原文搜索历史
        #[arg(long, default_value = "")]
        search: String,
        /// 类别过滤：All / Produtivo / Improdutivo
        #[arg(long, default_value = "All")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::initialize(config).await?;

    match cli.command {
        Command::Classify { text } => {
            app.classify(&text).await?;
        }
        Command::Batch {
            file,
            search,
            category,
        } => {
            let category = CategoryFilter::parse(&category)
                .with_context(|| format!("无法识别的类别: {}", category))?;
            app.run_batch(&file, &RecordFilter::new(search, category))
                .await
                .with_context(|| format!("批量处理失败: {}", file.display()))?;
        }
    }

    Ok(())
}
