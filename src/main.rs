//! # 截图自动上传工具 — 应用入口
//!
//! 本文件仅负责参数解析、日志初始化与组件组装。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use imgur_drop::config::{AppConfig, DEFAULT_CONFIG_PATH};
use imgur_drop::dispatcher::EventDispatcher;
use imgur_drop::error::AppError;
use imgur_drop::sink::CompositeSink;
use imgur_drop::upload::ImgurUploader;

/// 监听目录中新建的文件并上传到图床，成功后复制链接并弹出通知。
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// 覆盖配置中的监听目录
    #[arg(short = 'd', long = "directory")]
    directory: Option<String>,

    /// 不写入剪贴板
    #[arg(long)]
    no_clipboard: bool,

    /// 不弹出桌面通知
    #[arg(long)]
    no_notify: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => {
            log::error!("目录订阅意外结束，进程退出");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("启动失败: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(directory) = cli.directory.as_deref() {
        config = config.with_watch_directory(directory)?;
    }
    let config = Arc::new(config);

    log::info!(
        "setup: 监听目录 {}，结算等待 {}ms，上传地址 {}",
        config.watch_directory().display(),
        config.settle_delay.as_millis(),
        config.endpoint
    );

    let uploader = Arc::new(ImgurUploader::new(Arc::clone(&config))?);
    let sink = Arc::new(CompositeSink::desktop(!cli.no_clipboard, !cli.no_notify));
    if sink.is_empty() {
        log::warn!("setup: 剪贴板与通知均已关闭，上传结果只出现在日志中");
    }

    let dispatcher = EventDispatcher::new(uploader, sink, config.settle_delay);
    dispatcher.start(config.watch_directory()).await
}
