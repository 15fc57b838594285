//! # 剪贴板写入
//!
//! ## 设计思路
//!
//! 把上传得到的链接作为纯文本写入系统剪贴板。剪贴板可能被其他应用短暂占用，
//! 因此做有限次数的重试；全部失败时返回 `SinkError::Clipboard`，由调用方告警。
//!
//! ## 实现思路
//!
//! - 每次尝试新建 `arboard::Clipboard`，写完即释放。
//! - 调用方保证运行在阻塞线程上，这里直接使用 `std::thread::sleep` 做重试间隔。

use std::time::Duration;

use super::{ResultSink, SinkError};

/// 写入剪贴板的出口。
#[derive(Debug, Clone)]
pub struct ClipboardSink {
    /// 最大尝试次数（含第一次）。
    pub retries: u32,
    /// 重试间隔。
    pub retry_delay: Duration,
}

impl Default for ClipboardSink {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl ClipboardSink {
    fn try_set_text(text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("无法访问剪贴板：{}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| format!("复制失败：{}", e))
    }
}

impl ResultSink for ClipboardSink {
    fn publish(&self, url: &str) -> Result<(), SinkError> {
        write_with_retry(self.retries, self.retry_delay, || Self::try_set_text(url))?;
        log::info!("📋 链接已复制到剪贴板");
        Ok(())
    }
}

fn write_with_retry<F>(retries: u32, delay: Duration, mut write: F) -> Result<(), SinkError>
where
    F: FnMut() -> Result<(), String>,
{
    let attempts = retries.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            log::debug!("🔄 剪贴板重试 {}/{}", attempt, attempts);
            std::thread::sleep(delay);
        }

        match write() {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::debug!("剪贴板写入尝试 {} 失败: {}", attempt, e);
                last_error = Some(e);
            }
        }
    }

    Err(SinkError::Clipboard(
        last_error.unwrap_or_else(|| "未知错误".to_string()),
    ))
}
