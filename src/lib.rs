//! # 截图自动上传工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs   命令行参数 → 加载配置 → 组装 → 启动调度        │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓
//! ┌───────┴──────────────────────────────────────────────────┐
//! │  config ─────── AppConfig 只读快照（Arc 共享）            │
//! │                                                          │
//! │  watcher ────── notify 订阅 → WatchMessage 通道           │
//! │     ↓                                                    │
//! │  dispatcher ─── 过滤 Create 事件，逐个 tokio::spawn       │
//! │     ↓                                                    │
//! │  upload                                                  │
//! │   ├─ task       结算等待 → 读取 + Base64 → 上传           │
//! │   ├─ uploader   Uploader trait / ImgurUploader (reqwest) │
//! │   └─ error      UploadError（任务内消化，只记日志）        │
//! │     ↓ 仅成功时                                            │
//! │  sink ───────── 剪贴板 (arboard) + 桌面通知               │
//! │                                                          │
//! │  error ──────── AppError（仅启动期，致命）                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 启动期统一错误类型 `AppError`，到达 `main` 即非零退出 |
//! | [`config`] | 配置文件读取、默认值、`~` 展开，产出只读 `AppConfig` |
//! | [`watcher`] | 单目录非递归文件订阅，事件归一为 `WatchEvent` |
//! | [`dispatcher`] | 调度循环：过滤事件、派生独立上传任务、隔离错误 |
//! | [`upload`] | 单事件上传流水线与上传协议 |
//! | [`sink`] | 上传成功后的副作用出口（剪贴板、通知） |

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod sink;
pub mod upload;
pub mod watcher;
