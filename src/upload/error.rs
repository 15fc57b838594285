//! # 上传错误模型
//!
//! ## 设计思路
//!
//! 单个上传任务内可能出现的失败都收敛到 `UploadError`，只在任务内部记录日志，
//! 永远不会传播到调度循环或其他任务。
//!
//! 传输层错误往往是一条 `source()` 链（例如 “请求失败 → 连接失败 → 拒绝连接”），
//! 这里把链上每一层单独保存，日志按条输出，不折叠成一句话。

use std::path::PathBuf;

/// 单个上传任务的失败原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// 结算等待后无法读取源文件
    #[error("读取文件失败 {path:?}：{message}")]
    FileRead { path: PathBuf, message: String },

    /// 连接、超时或响应体无法解析
    #[error("传输错误：{}", .causes.join(" → "))]
    Transport { causes: Vec<String> },

    /// 请求已送达，但图床返回 `success == false`
    #[error("图床拒绝上传（status={status}）：{message}")]
    RemoteRejected { status: u16, message: String },
}

impl UploadError {
    /// 展开错误的 `source()` 链，每一层作为一个独立原因。
    pub(crate) fn transport(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = vec![error.to_string()];
        let mut source = error.source();
        while let Some(inner) = source {
            let message = inner.to_string();
            if causes.last() != Some(&message) {
                causes.push(message);
            }
            source = inner.source();
        }
        Self::Transport { causes }
    }

    pub(crate) fn file_read(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.into(),
            message: error.to_string(),
        }
    }

    /// 用于日志的原因列表：传输错误逐条给出，其余错误只有一条。
    pub fn causes(&self) -> Vec<String> {
        match self {
            Self::Transport { causes } => causes.clone(),
            other => vec![other.to_string()],
        }
    }
}
