//! 进程级工具
//!
//! 日志初始化和 Ctrl+C 处理

use anyhow::{Context, Result};
use tello_driver::CancelToken;
use tracing_subscriber::EnvFilter;

/// 默认日志过滤规则（可用 RUST_LOG 覆盖）
const DEFAULT_LOG_FILTER: &str = "tello_cli=info,tello_driver=info";

/// 初始化日志（输出到 stderr，不干扰命令回显）
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 安装 Ctrl+C 处理：只置位取消令牌，由会话负责降落和释放
pub fn install_interrupt_handler(cancel: &CancelToken) -> Result<()> {
    let cancel = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\n🛑 收到 Ctrl+C，准备降落...");
        cancel.cancel();
    })
    .context("安装 Ctrl+C 处理失败")
}
