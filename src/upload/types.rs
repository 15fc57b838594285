//! # 上传结果与线上数据模型
//!
//! ## 设计思路
//!
//! 将“对外结果”和“线上格式”解耦：
//! - `UploadResult` 是上传器交给任务的结果，只被消费一次
//! - `UploadRequest` / `ImgurResponse` 只描述 HTTP 请求体与响应体

use serde::{Deserialize, Serialize};

use super::UploadError;

/// 上传器返回给任务的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success { url: String },
    Failure(UploadError),
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<String, UploadError>> for UploadResult {
    fn from(result: Result<String, UploadError>) -> Self {
        match result {
            Ok(url) => Self::Success { url },
            Err(err) => Self::Failure(err),
        }
    }
}

/// 请求体：`{"image": "<base64>"}`。
#[derive(Debug, Serialize)]
pub(crate) struct UploadRequest<'a> {
    pub(crate) image: &'a str,
}

/// 响应体：`{ data: { link }, success, status }`。
#[derive(Debug, Deserialize)]
pub(crate) struct ImgurResponse {
    #[serde(default)]
    pub(crate) data: Option<ImgurData>,
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) status: u16,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImgurData {
    #[serde(default)]
    pub(crate) link: Option<String>,
    /// 失败时图床给出的说明，可能是字符串也可能是对象。
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
}

impl ImgurResponse {
    /// 按 `success` 与 `data.link` 将响应归类为成功或拒绝。
    pub(crate) fn into_result(self) -> Result<String, UploadError> {
        let status = self.status;
        let data = self.data.unwrap_or_default();

        if !self.success {
            return Err(UploadError::RemoteRejected {
                status,
                message: data
                    .error
                    .as_ref()
                    .map(describe_remote_error)
                    .unwrap_or_else(|| "未提供错误说明".to_string()),
            });
        }

        match data.link {
            Some(link) if !link.trim().is_empty() => Ok(link),
            _ => Err(UploadError::RemoteRejected {
                status,
                message: "响应缺少 data.link".to_string(),
            }),
        }
    }
}

fn describe_remote_error(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(message) => message.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
