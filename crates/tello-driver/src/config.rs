//! 会话配置
//!
//! 默认值即协议常量；TOML 配置文件中每一项都可以省略。
//!
//! ```toml
//! local_addr = "0.0.0.0:9000"
//! remote_addr = "192.168.10.1:8889"
//! ack_capacity = 128
//! poll_interval_ms = 100
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tello_protocol::{ACK_BUFFER_SIZE, DEFAULT_LOCAL_ADDR, DEFAULT_REMOTE_ADDR, MAX_DATAGRAM_SIZE};

/// 默认接收轮询间隔（毫秒）
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// 会话配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// 本地绑定地址
    pub local_addr: SocketAddr,

    /// 无人机地址
    pub remote_addr: SocketAddr,

    /// 应答接收上限（字节）
    pub ack_capacity: usize,

    /// 接收轮询间隔（毫秒），决定取消信号的响应延迟
    pub poll_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local_addr: DEFAULT_LOCAL_ADDR,
            remote_addr: DEFAULT_REMOTE_ADDR,
            ack_capacity: ACK_BUFFER_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 文件存在时加载，否则返回默认配置
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// 写入文件（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(write_err)
    }

    /// 校验字段取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ack_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ack_capacity",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.ack_capacity > MAX_DATAGRAM_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "ack_capacity",
                reason: format!("must not exceed {MAX_DATAGRAM_SIZE} (largest UDP payload)"),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// 接收轮询间隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
