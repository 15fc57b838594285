//! # 上传器
//!
//! ## 设计思路
//!
//! `Uploader` 是任务与图床之间的窄接口：输入 Base64 负载，输出 `UploadResult`。
//! 任务只依赖这个 trait，测试可以注入记录型实现，不触网。
//!
//! ## 实现思路
//!
//! - `ImgurUploader` 在启动时构建一个复用型 `reqwest::Client`，任务间只读共享。
//! - 凭据每次调用时从配置快照读取，组装 `Authorization: Client-ID <id>`。
//! - 不检查 HTTP 状态码：图床在失败时同样返回 JSON，统一按 `success` 字段归类。
//! - 无重试、无超时覆盖，沿用 `reqwest` 默认行为。

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use reqwest::header::AUTHORIZATION;

use super::types::{ImgurResponse, UploadRequest};
use super::{UploadError, UploadResult};
use crate::config::AppConfig;
use crate::error::AppError;

/// 执行上传协议的能力。
pub trait Uploader: Send + Sync {
    /// 上传已编码的负载。
    fn upload(&self, encoded_payload: String) -> impl Future<Output = UploadResult> + Send;
}

/// 基于 HTTP 的图床上传器。
#[derive(Debug, Clone)]
pub struct ImgurUploader {
    client: reqwest::Client,
    config: Arc<AppConfig>,
}

impl ImgurUploader {
    /// 使用配置快照创建上传器。
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Client(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self { client, config })
    }

    fn authorization(&self) -> String {
        format!("Client-ID {}", self.config.credential())
    }

    async fn send(&self, encoded_payload: &str) -> Result<String, UploadError> {
        let started = Instant::now();
        log::debug!(
            "📡 发送上传请求 - 负载: {} 字节",
            encoded_payload.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, self.authorization())
            .json(&UploadRequest {
                image: encoded_payload,
            })
            .send()
            .await
            .map_err(|e| UploadError::transport(&e))?;

        let http_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::transport(&e))?;

        log::debug!(
            "📥 收到响应 - HTTP {} ({} 字节, {}ms)",
            http_status,
            body.len(),
            started.elapsed().as_millis()
        );

        let parsed: ImgurResponse =
            serde_json::from_slice(&body).map_err(|e| UploadError::transport(&e))?;

        parsed.into_result()
    }
}

impl Uploader for ImgurUploader {
    async fn upload(&self, encoded_payload: String) -> UploadResult {
        self.send(&encoded_payload).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn config_for(endpoint: String) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            watch_directory: std::env::temp_dir(),
            client_id: "test-client".to_string(),
            endpoint,
            settle_delay: Duration::from_millis(0),
        })
    }

    /// 单次应答的 HTTP 桩，返回端口与“收到的原始请求”。
    fn serve_once(status_line: &'static str, body: String) -> (u16, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let port = listener.local_addr().expect("read local addr failed").port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            let header_end = loop {
                let n = stream.read(&mut buf).expect("read request failed");
                assert!(n > 0, "client closed before sending headers");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while request.len() < header_end + content_length {
                let n = stream.read(&mut buf).expect("read body failed");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response failed");
            stream.flush().expect("flush failed");

            String::from_utf8_lossy(&request).to_string()
        });

        (port, server)
    }

    #[tokio::test]
    async fn successful_upload_returns_link_and_sends_expected_request() {
        let (port, server) = serve_once(
            "200 OK",
            r#"{"data":{"link":"https://i.imgur.com/abc123.png"},"success":true,"status":200}"#
                .to_string(),
        );
        let uploader =
            ImgurUploader::new(config_for(format!("http://127.0.0.1:{port}/3/image"))).unwrap();

        let result = uploader.upload("iVBORw0KGgo=".to_string()).await;
        let request = server.join().expect("server thread failed");

        assert_eq!(
            result,
            UploadResult::Success {
                url: "https://i.imgur.com/abc123.png".to_string()
            }
        );
        assert!(request.starts_with("POST /3/image "));
        assert!(request
            .to_lowercase()
            .contains("authorization: client-id test-client\r\n"));
        assert!(request.ends_with(r#"{"image":"iVBORw0KGgo="}"#));
    }

    #[tokio::test]
    async fn rejected_upload_is_remote_rejected() {
        let (port, server) = serve_once(
            "403 Forbidden",
            r#"{"data":{"error":"Invalid client_id"},"success":false,"status":403}"#.to_string(),
        );
        let uploader =
            ImgurUploader::new(config_for(format!("http://127.0.0.1:{port}/3/image"))).unwrap();

        let result = uploader.upload("AAAA".to_string()).await;
        server.join().expect("server thread failed");

        assert_eq!(
            result,
            UploadResult::Failure(UploadError::RemoteRejected {
                status: 403,
                message: "Invalid client_id".to_string()
            })
        );
    }

    #[tokio::test]
    async fn unparseable_body_is_transport_error() {
        let (port, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>".to_string());
        let uploader =
            ImgurUploader::new(config_for(format!("http://127.0.0.1:{port}/3/image"))).unwrap();

        let result = uploader.upload("AAAA".to_string()).await;
        server.join().expect("server thread failed");

        assert!(matches!(
            result,
            UploadResult::Failure(UploadError::Transport { ref causes }) if !causes.is_empty()
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error_with_causes() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
            listener.local_addr().expect("read local addr failed").port()
        };
        let uploader =
            ImgurUploader::new(config_for(format!("http://127.0.0.1:{port}/3/image"))).unwrap();

        let result = uploader.upload("AAAA".to_string()).await;

        match result {
            UploadResult::Failure(UploadError::Transport { causes }) => {
                assert!(!causes.is_empty());
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
