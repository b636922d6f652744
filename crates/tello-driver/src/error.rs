//! 驱动层错误类型定义

use crate::session::SessionState;
use std::path::PathBuf;
use tello_link::LinkError;
use thiserror::Error;

/// 会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 链路错误（绑定失败或收发失败）
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// 命令来源读取失败
    #[error("Command source error: {0}")]
    Source(#[from] SourceError),

    /// 等待期间收到取消信号
    #[error("Session cancelled")]
    Cancelled,

    /// 当前状态不允许该操作
    #[error("Cannot {operation} in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// 配置无效
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// 是否为本地地址绑定失败
    pub fn is_bind_error(&self) -> bool {
        matches!(self, SessionError::Link(LinkError::Bind { .. }))
    }
}

/// 命令来源错误
#[derive(Error, Debug)]
pub enum SourceError {
    /// 读取输入失败
    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),

    /// 交互式输入后端错误
    #[error("Interactive input error: {0}")]
    Interactive(String),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 写入配置文件失败
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 字段取值无效
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
