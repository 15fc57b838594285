//! 启动期错误类型模块
//!
//! # 设计思路
//!
//! 进程只有一个致命出口：启动阶段（读取配置、展开主目录、建立目录监听）失败。
//! 这些错误统一收敛到 `AppError`，由 `main` 记录日志后以非零状态退出。
//!
//! 运行期错误（单个文件读取失败、上传失败、剪贴板不可用）不在此处定义，
//! 它们分别属于 `upload::UploadError` 与 `sink::SinkError`，只记录日志，永不上抛到进程。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 提供 `From` 转换，启动代码可直接使用 `?`。

/// 应用级启动错误
///
/// 任何一个分支到达 `main` 都意味着进程在进入事件循环之前终止。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 配置文件存在但无法解析，或配置值非法
    #[error("配置错误: {0}")]
    Config(String),

    /// 无法定位用户主目录（`~` 展开失败）
    #[error("无法展开主目录: {0}")]
    HomeDir(String),

    /// 目录监听无法建立（目录不存在、无权限、系统监听资源耗尽等）
    #[error("目录监听失败: {0}")]
    Watch(String),

    /// HTTP 客户端初始化失败
    #[error("上传客户端初始化失败: {0}")]
    Client(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}
