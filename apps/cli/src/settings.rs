//! 连接设置
//!
//! 优先级：命令行参数 > 配置文件 > 内置默认值

use anyhow::{Context, Result};
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use tello_driver::SessionConfig;

/// 默认配置文件路径：`<config_dir>/tello/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("tello");
    path.push("config.toml");
    Ok(path)
}

/// 全局连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// 配置文件路径（默认 <config_dir>/tello/config.toml）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 本地绑定地址（如 0.0.0.0:9000）
    #[arg(long, global = true, value_name = "ADDR")]
    pub local: Option<SocketAddr>,

    /// 无人机地址（如 192.168.10.1:8889）
    #[arg(long, global = true, value_name = "ADDR")]
    pub remote: Option<SocketAddr>,

    /// 应答接收上限（字节）
    #[arg(long, global = true, value_name = "BYTES")]
    pub ack_capacity: Option<usize>,
}

impl ConnectionArgs {
    /// 实际使用的配置文件路径
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    /// 合并配置文件和命令行参数
    pub fn resolve(&self) -> Result<SessionConfig> {
        let path = self.config_path()?;
        let mut config = SessionConfig::load_or_default(&path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()))?;

        if let Some(local) = self.local {
            config.local_addr = local;
        }
        if let Some(remote) = self.remote {
            config.remote_addr = remote;
        }
        if let Some(capacity) = self.ack_capacity {
            config.ack_capacity = capacity;
        }

        config.validate().context("配置无效")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ack_capacity = 256\nremote_addr = \"10.0.0.2:8889\"\n").unwrap();

        let args = ConnectionArgs {
            config: Some(path),
            remote: Some("127.0.0.1:8889".parse().unwrap()),
            ..ConnectionArgs::default()
        };
        let config = args.resolve().unwrap();

        assert_eq!(config.ack_capacity, 256);
        assert_eq!(config.remote_addr.to_string(), "127.0.0.1:8889");
        assert_eq!(config.local_addr.to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConnectionArgs {
            config: Some(dir.path().join("missing.toml")),
            ack_capacity: Some(0),
            ..ConnectionArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
