//! 目录监听模块
//!
//! # 设计思路
//!
//! 把操作系统的文件事件订阅包装成一条带标签的消息流 `WatchMessage`：
//! 事件与订阅级错误走同一个通道，调度循环只需要一个 `recv()`。
//!
//! # 实现思路
//!
//! - 使用 `notify::RecommendedWatcher`，回调运行在 notify 自己的线程上，
//!   通过无界 `mpsc` 通道把消息转交给 tokio 侧。
//! - 只监听单个目录，`RecursiveMode::NonRecursive`。
//! - 原始事件在这里被归一为 `WatchEvent { path, kind }`：
//!   只有“新建文件”归为 `Create`，其余（修改、删除、访问、新建目录）一律为 `Other`。
//! - `DirectoryWatcher` 持有底层 watcher，被 drop 时订阅结束、通道关闭。

use std::path::{Path, PathBuf};

use notify::event::CreateKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::AppError;

/// 归一后的事件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// 新建了一个文件
    Create,
    /// 其他任何变化
    Other,
}

/// 单个路径上的一次文件事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

impl WatchEvent {
    pub fn new(path: impl Into<PathBuf>, kind: WatchEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// 订阅通道中的消息：事件或订阅级错误。
#[derive(Debug)]
pub enum WatchMessage {
    Event(WatchEvent),
    Error(notify::Error),
}

/// 将 notify 的事件类型映射为 `WatchEventKind`。
pub fn classify(kind: &EventKind) -> WatchEventKind {
    match kind {
        EventKind::Create(CreateKind::Folder) => WatchEventKind::Other,
        EventKind::Create(_) => WatchEventKind::Create,
        _ => WatchEventKind::Other,
    }
}

fn into_watch_events(event: Event) -> impl Iterator<Item = WatchEvent> {
    let kind = classify(&event.kind);
    event
        .paths
        .into_iter()
        .map(move |path| WatchEvent::new(path, kind))
}

/// 单目录、非递归的文件系统订阅。
pub struct DirectoryWatcher {
    directory: PathBuf,
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// 开始监听目录，返回订阅句柄与消息接收端。
    ///
    /// 目录不存在、不是目录或无法注册监听时返回 `AppError::Watch`。
    pub fn subscribe(
        directory: &Path,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WatchMessage>), AppError> {
        if !directory.is_dir() {
            return Err(AppError::Watch(format!(
                "监听目录不存在或不是目录: {}",
                directory.display()
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let delivered = match res {
                    Ok(event) => into_watch_events(event)
                        .try_for_each(|watch_event| tx.send(WatchMessage::Event(watch_event))),
                    Err(err) => tx.send(WatchMessage::Error(err)),
                };
                if delivered.is_err() {
                    log::debug!("监听通道已关闭，丢弃文件事件");
                }
            },
            Config::default(),
        )
        .map_err(|e| AppError::Watch(format!("创建文件监听器失败: {}", e)))?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::Watch(format!("无法监听 {}: {}", directory.display(), e)))?;

        log::info!("👀 开始监听目录: {}", directory.display());

        Ok((
            Self {
                directory: directory.to_path_buf(),
                _watcher: watcher,
            },
            rx,
        ))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}
