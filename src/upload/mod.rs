//! # 上传模块（upload）
//!
//! ## 设计思路
//!
//! 将“单事件任务编排 → 上传协议 → 结果与错误模型”按职责拆分：
//!
//! - `task`：单个事件的完整流水线（结算等待 → 读取编码 → 上传 → 结果出口）
//! - `uploader`：`Uploader` trait 与基于 HTTP 的 `ImgurUploader`
//! - `types`：`UploadResult` 与请求/响应线上格式
//! - `error`：任务内可能出现的 `UploadError`
//!
//! ## 调用链
//!
//! ```text
//! dispatcher（过滤 + 派发）
//!    ↓ tokio::spawn（不等待、不取消）
//! task.rs  UploadTask::run
//!    ├─ read_encoded（阻塞线程）
//!    ├─ Uploader::upload
//!    └─ ResultSink::publish（阻塞线程，仅成功时）
//! ```

mod error;
mod task;
mod types;
mod uploader;

pub use error::UploadError;
pub use task::{UploadTask, read_encoded};
pub use types::UploadResult;
pub use uploader::{ImgurUploader, Uploader};
