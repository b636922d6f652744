//! # Tello CLI
//!
//! Command-line interface for Tello drone command sessions.
//!
//! ## 三种模式
//!
//! ### Shell 模式（交互式）
//!
//! ```bash
//! $ tello-cli shell
//! ✅ 已进入 SDK 模式 (ok)
//! tello> takeoff
//! tello> left 100
//! tello> exit
//! ```
//!
//! ### Fly 模式（固定航线）
//!
//! ```bash
//! # 起飞后循环执行固定航线，Ctrl+C 降落
//! tello-cli fly
//! tello-cli fly --cycles 2 --yes
//! ```
//!
//! ### One-shot 模式（脚本/调试）
//!
//! ```bash
//! tello-cli send takeoff "cw 90" land
//! ```
//!
//! 所有模式共用同一个会话：绑定本地 socket → 握手 → 一问一答 → 释放。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod console;
mod modes;
mod safety;
mod settings;
mod utils;

use commands::{ConfigCommand, FlyCommand, SendCommand};
use modes::repl::run_shell;
use settings::ConnectionArgs;

/// Tello CLI - 无人机命令行工具
#[derive(Parser, Debug)]
#[command(name = "tello-cli")]
#[command(about = "Command-line interface for Tello drone command sessions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 启动交互式 Shell（逐条输入命令）
    Shell,

    /// 执行固定航线
    Fly {
        #[command(flatten)]
        args: FlyCommand,
    },

    /// 依次发送给定命令后退出
    Send {
        #[command(flatten)]
        args: SendCommand,
    },
}

fn main() -> Result<()> {
    utils::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.connection),

        Commands::Shell => run_shell(&cli.connection),

        Commands::Fly { args } => args.execute(&cli.connection),

        Commands::Send { args } => args.execute(&cli.connection),
    }
}
