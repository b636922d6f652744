//! 发送命令
//!
//! One-shot：握手后依次发送，每条等待应答

use anyhow::Result;
use clap::Args;

use crate::modes::oneshot::run_commands;
use crate::settings::ConnectionArgs;

/// 发送命令参数
#[derive(Args, Debug)]
pub struct SendCommand {
    /// 要发送的命令（每个参数一条，如 takeoff "cw 90" land）
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl SendCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        run_commands(connection, &self.commands)
    }
}
