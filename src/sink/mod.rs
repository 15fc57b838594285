//! # 结果出口模块（sink）
//!
//! ## 设计思路
//!
//! 上传成功后的副作用（写剪贴板、弹桌面通知）统一抽象为 `ResultSink`。
//! 这些副作用是尽力而为：失败只记录日志，不影响任务的成功/失败判定。
//!
//! ## 实现思路
//!
//! - `ResultSink::publish` 是同步接口，调用方负责把它放到阻塞线程执行。
//! - `CompositeSink` 依次调用每个子出口，单个子出口失败不影响其余子出口。
//! - 具体实现：
//!   - `clipboard_writer`：通过 `arboard` 写入文本链接（有限重试）
//!   - `notification`：调用平台命令弹出桌面通知

mod clipboard_writer;
mod notification;

pub use clipboard_writer::ClipboardSink;
pub use notification::NotificationSink;

/// 结果出口的失败原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("通知错误：{0}")]
    Notification(String),
}

/// 上传成功后的副作用出口。
pub trait ResultSink: Send + Sync {
    /// 发布一个上传成功的链接。
    fn publish(&self, url: &str) -> Result<(), SinkError>;
}

/// 按顺序调用多个出口，彼此失败隔离。
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl std::fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// 默认出口组合：剪贴板 + 桌面通知，可分别关闭。
    pub fn desktop(clipboard: bool, notification: bool) -> Self {
        let mut composite = Self::new();
        if clipboard {
            composite = composite.with(ClipboardSink::default());
        }
        if notification {
            composite = composite.with(NotificationSink::default());
        }
        composite
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for CompositeSink {
    fn publish(&self, url: &str) -> Result<(), SinkError> {
        for sink in &self.sinks {
            if let Err(err) = sink.publish(url) {
                match err {
                    SinkError::Clipboard(_) => log::warn!("{}", err),
                    SinkError::Notification(_) => log::debug!("{}", err),
                }
            }
        }
        Ok(())
    }
}
