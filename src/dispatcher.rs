//! 事件调度模块
//!
//! # 设计思路
//!
//! 调度器持有目录订阅，是整个进程唯一的长生命周期循环：
//! - 非 `Create` 事件直接丢弃；
//! - 每个 `Create` 事件派生一个独立的 `UploadTask`，调度器不等待其完成；
//! - 订阅级错误只记录日志，循环继续。
//!
//! 结算等待发生在任务内部，调度循环本身从不休眠，
//! 因此某个任务等待期间新到达的事件依旧会立刻被派发。
//!
//! # 实现思路
//!
//! - 任务通过 `tokio::spawn` 脱离调度器运行（无监督、无取消、无并发上限），
//!   只能通过日志与结果出口观察其结果。
//! - 任务只共享 `Arc` 包装的只读上传器与结果出口，彼此之间没有可写共享状态。
//! - `dispatch` 返回 `JoinHandle` 仅供测试等待；调度循环直接丢弃它。

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::sink::ResultSink;
use crate::upload::{UploadTask, Uploader};
use crate::watcher::{DirectoryWatcher, WatchEvent, WatchEventKind, WatchMessage};

/// 文件事件调度器。
pub struct EventDispatcher<U, S: ?Sized> {
    uploader: Arc<U>,
    sink: Arc<S>,
    settle_delay: Duration,
}

impl<U, S: ?Sized> std::fmt::Debug for EventDispatcher<U, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

impl<U, S> EventDispatcher<U, S>
where
    U: Uploader + 'static,
    S: ResultSink + ?Sized + 'static,
{
    pub fn new(uploader: Arc<U>, sink: Arc<S>, settle_delay: Duration) -> Self {
        Self {
            uploader,
            sink,
            settle_delay,
        }
    }

    /// 订阅目录并进入调度循环。
    ///
    /// 订阅失败返回 `AppError::Watch`；正常情况下不会返回，
    /// 只有订阅通道关闭时才以 `Ok(())` 结束。
    pub async fn start(&self, directory: &Path) -> Result<(), AppError> {
        let (watcher, messages) = DirectoryWatcher::subscribe(directory)?;
        self.run(messages).await;
        drop(watcher);
        Ok(())
    }

    /// 消费订阅消息直到通道关闭。
    pub async fn run(&self, mut messages: mpsc::UnboundedReceiver<WatchMessage>) {
        while let Some(message) = messages.recv().await {
            match message {
                WatchMessage::Event(event) => {
                    let _detached = self.dispatch(event);
                }
                WatchMessage::Error(err) => {
                    log::error!("目录监听错误: {}", err);
                }
            }
        }
        log::warn!("目录订阅已结束，调度循环退出");
    }

    /// 过滤单个事件；通过过滤时派生上传任务并立即返回。
    pub fn dispatch(&self, event: WatchEvent) -> Option<JoinHandle<()>> {
        if event.kind != WatchEventKind::Create {
            log::debug!("忽略非新建事件: {}", event.path.display());
            return None;
        }

        log::info!("🆕 检测到新文件: {}", event.path.display());

        let task = UploadTask::new(event.path);
        let uploader = Arc::clone(&self.uploader);
        let sink = Arc::clone(&self.sink);
        let settle_delay = self.settle_delay;

        Some(tokio::spawn(async move {
            task.run(&*uploader, sink, settle_delay).await;
        }))
    }
}
