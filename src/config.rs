//! 配置模块
//!
//! # 设计思路
//!
//! 配置只在启动时加载一次，之后以不可变快照 `AppConfig` 的形式
//! 通过 `Arc` 共享给调度器与上传器。运行期没有任何写入路径，
//! 因此并发的上传任务读取配置时无需加锁。
//!
//! # 实现思路
//!
//! - 配置文件为 TOML，分 `[general]` 与 `[imgur]` 两节。
//! - 配置文件必须存在且可解析，否则视为启动错误。
//! - 文件中缺失的单个字段通过 `#[serde(default)]` 回退到默认值。
//! - `~` 前缀统一展开为用户主目录，展开逻辑与主目录来源解耦，便于测试。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// 默认配置文件路径（展开前）。
pub const DEFAULT_CONFIG_PATH: &str = "~/.imgurupload.toml";
/// 默认监听目录（展开前）。
pub const DEFAULT_WATCH_DIRECTORY: &str = "~/Desktop";
/// 默认匿名上传凭据。
pub const DEFAULT_CLIENT_ID: &str = "f73c76296263ce7";
/// 图床上传地址。
pub const DEFAULT_ENDPOINT: &str = "https://api.imgur.com/3/image";
/// 新文件出现后等待写入完成的时长（毫秒）。
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

const SETTLE_DELAY_MAX_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    general: GeneralSection,
    imgur: ImgurSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct GeneralSection {
    directory: String,
    settle_delay_ms: u64,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            directory: DEFAULT_WATCH_DIRECTORY.to_string(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ImgurSection {
    client_id: String,
    endpoint: String,
}

impl Default for ImgurSection {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// 启动后只读的配置快照。
///
/// 字段在 `load` 之后不再变化；需要在任务间共享时包一层 `Arc`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 已展开 `~` 的监听目录（非递归）。
    pub watch_directory: PathBuf,
    /// 上传凭据，用于 `Authorization: Client-ID <id>`。
    pub client_id: String,
    /// 上传接口地址。
    pub endpoint: String,
    /// 读取新文件前的等待时长。
    pub settle_delay: Duration,
}

impl AppConfig {
    /// 从配置文件加载（路径允许带 `~`）。
    ///
    /// 文件不存在或无法解析时返回 `AppError::Config`。
    pub fn load(config_path: &str) -> Result<Self, AppError> {
        let home = home_dir();
        let path = expand_home_with(config_path, home.as_deref())?;
        let file = load_config_file_from_path(&path)?;
        let config = resolve_config(file, home.as_deref())?;

        log::debug!("配置来源: {}", path.display());
        Ok(config)
    }

    /// 用命令行参数覆盖监听目录。
    pub fn with_watch_directory(mut self, directory: &str) -> Result<Self, AppError> {
        self.watch_directory = expand_home_with(directory, home_dir().as_deref())?;
        Ok(self)
    }

    /// 监听目录。
    pub fn watch_directory(&self) -> &Path {
        &self.watch_directory
    }

    /// 上传凭据。
    pub fn credential(&self) -> &str {
        &self.client_id
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// 将 `~` / `~/...` 展开为主目录下的路径，其他输入原样返回。
fn expand_home_with(raw: &str, home: Option<&Path>) -> Result<PathBuf, AppError> {
    let trimmed = raw.trim();
    if trimmed != "~" && !trimmed.starts_with("~/") && !trimmed.starts_with("~\\") {
        return Ok(PathBuf::from(trimmed));
    }

    let home = home.ok_or_else(|| {
        AppError::HomeDir(format!("无法定位用户主目录，不能展开 '{}'", trimmed))
    })?;

    let rest = trimmed[1..].trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home.to_path_buf())
    } else {
        Ok(home.join(rest))
    }
}

fn load_config_file_from_path(path: &Path) -> Result<ConfigFile, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("无法读取配置文件 '{}': {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件 '{}' 失败: {}", path.display(), e)))
}

fn resolve_config(file: ConfigFile, home: Option<&Path>) -> Result<AppConfig, AppError> {
    let client_id = file.imgur.client_id.trim().to_string();
    if client_id.is_empty() {
        return Err(AppError::Config("imgur.client-id 不能为空".to_string()));
    }

    let endpoint = file.imgur.endpoint.trim().to_string();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(AppError::Config(format!(
            "imgur.endpoint 仅支持 HTTP/HTTPS: {}",
            endpoint
        )));
    }

    if file.general.settle_delay_ms > SETTLE_DELAY_MAX_MS {
        return Err(AppError::Config(format!(
            "general.settle_delay_ms 不能超过 {} 毫秒",
            SETTLE_DELAY_MAX_MS
        )));
    }

    Ok(AppConfig {
        watch_directory: expand_home_with(&file.general.directory, home)?,
        client_id,
        endpoint,
        settle_delay: Duration::from_millis(file.general.settle_delay_ms),
    })
}
