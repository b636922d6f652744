//! # Tello Protocol
//!
//! 无人机 SDK 文本命令协议定义（无网络依赖）
//!
//! ## 模块
//!
//! - `constants`: 端点地址、缓冲区大小、固定命令
//!
//! ## 报文格式
//!
//! 每个 UDP 数据报承载一条 UTF-8 文本命令，无帧头、无校验、无长度前缀，
//! 数据报边界即消息边界。应答同样是一段原始文本（如 `ok`、`error`）。

pub mod constants;

pub use constants::*;

use std::fmt;
use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// 命令字节不是合法的 UTF-8
    #[error("Command payload is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// 单条文本命令
///
/// 命令文本按原样传输，不做任何校验：`encode()` 的结果就是文本的 UTF-8 字节。
///
/// # 示例
///
/// ```rust
/// use tello_protocol::Command;
///
/// let cmd = Command::with_argument("left", 100);
/// assert_eq!(cmd.as_str(), "left 100");
/// assert_eq!(cmd.keyword(), "left");
/// assert_eq!(cmd.argument(), Some(100));
/// assert_eq!(cmd.encode(), b"left 100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    text: String,
}

impl Command {
    /// 按原样构造命令
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 构造带数值参数的命令（如 `forward 200`）
    pub fn with_argument(keyword: &str, value: i32) -> Self {
        Self {
            text: format!("{keyword} {value}"),
        }
    }

    /// 握手命令 `command`
    pub fn handshake() -> Self {
        Self::new(HANDSHAKE_COMMAND)
    }

    /// 降落命令 `land`
    pub fn land() -> Self {
        Self::new(SAFE_STATE_COMMAND)
    }

    /// 起飞命令 `takeoff`
    pub fn takeoff() -> Self {
        Self::new(TAKEOFF_COMMAND)
    }

    /// 命令文本
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 命令关键字（第一个空白分隔的 token）
    pub fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// 数值参数（第二个 token，可解析为整数时）
    pub fn argument(&self) -> Option<i32> {
        self.text.split_whitespace().nth(1)?.parse().ok()
    }

    /// 编码为线上字节
    pub fn encode(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// 从线上字节解码
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::new(text)),
            Err(e) => Err(ProtocolError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// 无人机应答
///
/// 保存接收到的原始字节。若数据报超过接收上限，仅保留前 `capacity` 字节，
/// 并将 `truncated` 置位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    bytes: Vec<u8>,
    truncated: bool,
}

impl Acknowledgement {
    /// 从接收到的数据报构造应答
    ///
    /// `datagram` 可能比 `capacity` 长（调用方多预留了一个字节用于检测截断）。
    pub fn from_datagram(datagram: &[u8], capacity: usize) -> Self {
        let truncated = datagram.len() > capacity;
        let kept = datagram.len().min(capacity);
        Self {
            bytes: datagram[..kept].to_vec(),
            truncated,
        }
    }

    /// 原始字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 用于显示的文本（非法 UTF-8 替换为 U+FFFD）
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// 是否发生截断
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// 应答是否为 `ok`
    ///
    /// 仅作显示提示，会话层不据此做任何判断。
    pub fn is_ok(&self) -> bool {
        self.text().trim() == "ok"
    }
}

impl fmt::Display for Acknowledgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
