//! # 单事件上传任务
//!
//! ## 设计思路
//!
//! 每个“新建文件”事件对应一个 `UploadTask`，端到端完成一次上传尝试：
//! 1. 结算等待（避免读到写了一半的文件）
//! 2. 读取文件并流式编码为 Base64
//! 3. 调用上传器
//! 4. 成功时交给结果出口（剪贴板 / 通知）
//!
//! 任务之间不共享可写状态，任何一步失败都只记录日志并结束本任务。
//!
//! ## 实现思路
//!
//! - 文件读取与编码是阻塞 I/O，放到 `spawn_blocking` 线程，文件句柄只在这一步内存活。
//! - 编码使用 `EncoderStringWriter` + `io::copy`，不需要先把整份原始字节读进内存。
//! - 结果出口同样可能阻塞（剪贴板、外部命令），在阻塞线程执行，失败只告警。
//! - 记录 `read/upload/total` 阶段耗时，便于诊断。

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;

use super::{UploadError, UploadResult, Uploader};
use crate::sink::ResultSink;

/// 一次上传尝试。创建于事件通过过滤时，结束于成功或失败。
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub source_path: PathBuf,
    pub started_at: Instant,
}

impl UploadTask {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            started_at: Instant::now(),
        }
    }

    /// 执行完整流程，结果只体现在日志与结果出口上。
    pub async fn run<U, S>(self, uploader: &U, sink: Arc<S>, settle_delay: Duration)
    where
        U: Uploader,
        S: ResultSink + ?Sized + 'static,
    {
        if !settle_delay.is_zero() {
            tokio::time::sleep(settle_delay).await;
        }

        match self.upload(uploader).await {
            UploadResult::Success { url } => {
                log::info!(
                    "✅ 上传成功 - 文件: {} 链接: {} (总耗时 {}ms)",
                    self.source_path.display(),
                    url,
                    self.started_at.elapsed().as_millis()
                );
                publish(sink, url).await;
            }
            UploadResult::Failure(err) => self.log_failure(&err),
        }
    }

    /// 读取、编码并上传，不包含结算等待与结果出口。
    pub async fn upload<U>(&self, uploader: &U) -> UploadResult
    where
        U: Uploader,
    {
        let read_start = Instant::now();
        let path = self.source_path.clone();
        let encoded = match tokio::task::spawn_blocking(move || read_encoded(&path)).await {
            Ok(Ok(encoded)) => encoded,
            Ok(Err(err)) => return UploadResult::Failure(err),
            Err(join_err) => {
                return UploadResult::Failure(UploadError::file_read(
                    &self.source_path,
                    format!("读取线程执行失败：{}", join_err),
                ));
            }
        };
        log::debug!(
            "📁 已读取并编码 - 文件: {} 编码后: {} 字节 ({}ms)",
            self.source_path.display(),
            encoded.len(),
            read_start.elapsed().as_millis()
        );

        let upload_start = Instant::now();
        let result = uploader.upload(encoded).await;
        log::debug!(
            "🌐 上传阶段结束 - 文件: {} 成功: {} ({}ms)",
            self.source_path.display(),
            result.is_success(),
            upload_start.elapsed().as_millis()
        );

        result
    }

    fn log_failure(&self, err: &UploadError) {
        let level = failure_level(err);
        for cause in err.causes() {
            log::log!(
                level,
                "❌ 上传失败 - 文件: {} 原因: {}",
                self.source_path.display(),
                cause
            );
        }
    }
}

/// 图床明确拒绝属于可预期的结果，只告警；其余失败记为错误。
fn failure_level(err: &UploadError) -> log::Level {
    match err {
        UploadError::RemoteRejected { .. } => log::Level::Warn,
        UploadError::Transport { .. } | UploadError::FileRead { .. } => log::Level::Error,
    }
}

/// 打开文件并流式编码为标准 Base64。
pub fn read_encoded(path: &Path) -> Result<String, UploadError> {
    let mut file = File::open(path).map_err(|e| UploadError::file_read(path, e))?;
    let mut encoder = EncoderStringWriter::new(&STANDARD);
    io::copy(&mut file, &mut encoder).map_err(|e| UploadError::file_read(path, e))?;
    Ok(encoder.into_inner())
}

async fn publish<S>(sink: Arc<S>, url: String)
where
    S: ResultSink + ?Sized + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || sink.publish(&url)).await;
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("结果出口失败（已忽略）: {}", err),
        Err(join_err) => log::warn!("结果出口线程执行失败（已忽略）: {}", join_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static DIR_SEQ: AtomicU64 = AtomicU64::new(0);

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("imgur-drop-task-test-{nanos}-{seq}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn read_encoded_matches_standard_base64() {
        let dir = unique_temp_dir();
        let path = dir.join("photo.png");
        let bytes = [0x89_u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        std::fs::write(&path, bytes).expect("write file");

        let encoded = read_encoded(&path).expect("read file");

        assert_eq!(encoded, STANDARD.encode(bytes));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn read_encoded_handles_multi_buffer_files() {
        let dir = unique_temp_dir();
        let path = dir.join("large.bin");
        let bytes: Vec<u8> = (0..200_003u32).map(|i| (i * 31 % 251) as u8).collect();
        std::fs::write(&path, &bytes).expect("write file");

        let encoded = read_encoded(&path).expect("read file");

        assert_eq!(STANDARD.decode(encoded).expect("decode"), bytes);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn read_encoded_missing_file_is_file_read_error() {
        let dir = unique_temp_dir();
        let path = dir.join("vanished.png");

        let result = read_encoded(&path);

        assert!(matches!(result, Err(UploadError::FileRead { path: ref p, .. }) if p == &path));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn read_encoded_empty_file_is_empty_payload() {
        let dir = unique_temp_dir();
        let path = dir.join("empty.png");
        std::fs::write(&path, b"").expect("write file");

        assert_eq!(read_encoded(&path).expect("read file"), "");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn remote_rejection_logs_at_warn_and_the_rest_at_error() {
        let rejected = UploadError::RemoteRejected {
            status: 403,
            message: "Invalid client_id".to_string(),
        };
        let transport = UploadError::Transport {
            causes: vec!["error sending request".to_string(), "connection refused".to_string()],
        };
        let unreadable = UploadError::file_read("/shots/gone.png", "No such file or directory");

        assert_eq!(failure_level(&rejected), log::Level::Warn);
        assert_eq!(failure_level(&transport), log::Level::Error);
        assert_eq!(failure_level(&unreadable), log::Level::Error);
        assert_eq!(transport.causes().len(), 2);
        assert_eq!(rejected.causes().len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn encoded_payload_decodes_to_original_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let dir = unique_temp_dir();
            let path = dir.join("payload.bin");
            std::fs::write(&path, &bytes).expect("write file");

            let encoded = read_encoded(&path).expect("read file");
            let _ = std::fs::remove_dir_all(&dir);

            prop_assert_eq!(STANDARD.decode(encoded).expect("decode"), bytes);
        }
    }
}
