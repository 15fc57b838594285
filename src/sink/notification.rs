//! # 桌面通知
//!
//! 通过平台自带命令弹出通知，正文为上传得到的链接：
//! macOS 使用 `osascript`，Linux 使用 `notify-send`。其他平台返回错误，由调用方忽略。

use std::process::Command;

use super::{ResultSink, SinkError};

/// 桌面通知出口。
#[derive(Debug, Clone)]
pub struct NotificationSink {
    pub title: String,
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self {
            title: "图片已上传".to_string(),
        }
    }
}

impl ResultSink for NotificationSink {
    fn publish(&self, url: &str) -> Result<(), SinkError> {
        let mut command = notification_command(&self.title, url)?;
        let status = command
            .status()
            .map_err(|e| SinkError::Notification(format!("无法启动通知命令：{}", e)))?;

        if !status.success() {
            return Err(SinkError::Notification(format!("通知命令退出异常：{}", status)));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn notification_command(title: &str, body: &str) -> Result<Command, SinkError> {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(body),
        escape_applescript(title)
    );
    let mut command = Command::new("osascript");
    command.args(["-e", &script]);
    Ok(command)
}

#[cfg(target_os = "linux")]
fn notification_command(title: &str, body: &str) -> Result<Command, SinkError> {
    let mut command = Command::new("notify-send");
    command.args(["--app-name", env!("CARGO_PKG_NAME"), title, body]);
    Ok(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn notification_command(_title: &str, _body: &str) -> Result<Command, SinkError> {
    Err(SinkError::Notification("当前平台不支持桌面通知".to_string()))
}

/// AppleScript 字符串字面量转义。
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
