//! One-shot 模式
//!
//! 每次调用独立执行：
//! 1. 读取配置
//! 2. 绑定 socket 并握手
//! 3. 依次发送命令，每条等待一条应答
//! 4. 释放 socket

use anyhow::{Context, Result};
use tello_driver::ScriptedSource;

use crate::modes::{open_session, print_outcome};
use crate::settings::ConnectionArgs;

/// 发送一组命令
pub fn run_commands(connection: &ConnectionArgs, commands: &[String]) -> Result<()> {
    let (mut session, cancel) = open_session(connection)?;

    let mut source = ScriptedSource::new(commands.iter().cloned());
    let outcome = session.run_loop(&mut source, &cancel).context("会话异常结束")?;

    print_outcome(&outcome);
    Ok(())
}
