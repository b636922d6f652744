//! 运行模式
//!
//! - One-shot 模式：发送给定命令后退出
//! - REPL 模式：交互式 Shell
//!
//! 两种模式（以及固定航线）都通过 [`open_session`] 建立会话。

pub mod oneshot;
pub mod repl;

use anyhow::{Context, Result};
use tello_driver::{CancelToken, ExitReason, RunOutcome, Session, UdpLink};
use tracing::{info, warn};

use crate::console::ConsoleObserver;
use crate::settings::ConnectionArgs;
use crate::utils;

/// 绑定 socket、挂上控制台输出并安装 Ctrl+C 处理
pub fn open_session(connection: &ConnectionArgs) -> Result<(Session<UdpLink>, CancelToken)> {
    let config = connection.resolve()?;

    println!("⏳ 连接到 {} (本地 {})...", config.remote_addr, config.local_addr);
    let mut session = Session::open(&config).context("创建会话失败")?;
    session.set_observer(ConsoleObserver);

    let cancel = CancelToken::new();
    utils::install_interrupt_handler(&cancel)?;

    Ok((session, cancel))
}

/// 打印循环结果
pub fn print_outcome(outcome: &RunOutcome) {
    info!(
        reason = ?outcome.reason,
        exchanges = outcome.exchanges,
        commands_sent = outcome.stats.commands_sent,
        acks_received = outcome.stats.acks_received,
        "Session finished"
    );
    match outcome.reason {
        ExitReason::Completed => println!("✅ 完成 {} 条命令", outcome.exchanges),
        ExitReason::Interrupted => println!("🛬 已中断，共完成 {} 条命令", outcome.exchanges),
    }
    if outcome.stats.truncated_acks > 0 {
        warn!(truncated = outcome.stats.truncated_acks, "Some acknowledgements were truncated");
        println!("⚠️  {} 条应答超出接收上限被截断", outcome.stats.truncated_acks);
    }
}
