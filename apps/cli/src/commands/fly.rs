//! 固定航线命令
//!
//! 握手 → 确认 → 起飞 → 循环执行航线，Ctrl+C 降落

use anyhow::{Context, Result};
use clap::Args;
use tello_driver::{FlightPlan, SessionError};

use crate::modes::{open_session, print_outcome};
use crate::safety::{Confirmation, confirm_takeoff};
use crate::settings::ConnectionArgs;

/// 固定航线参数
#[derive(Args, Debug)]
pub struct FlyCommand {
    /// 循环次数（不指定则一直循环，直到 Ctrl+C）
    #[arg(short, long)]
    pub cycles: Option<u32>,

    /// 跳过起飞确认
    #[arg(short, long)]
    pub yes: bool,
}

impl FlyCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        let (mut session, cancel) = open_session(connection)?;

        if !self.yes {
            match session.handshake(&cancel) {
                Ok(_) => {},
                Err(SessionError::Cancelled) => {
                    session.shutdown();
                    println!("🛑 已取消");
                    return Ok(());
                },
                Err(e) => return Err(e).context("握手失败"),
            }

            match confirm_takeoff(self.cycles)? {
                Confirmation::Proceed => {},
                Confirmation::Declined | Confirmation::Interrupted => {
                    // 尚未起飞，直接释放
                    session.close();
                    println!("❌ 操作已取消");
                    return Ok(());
                },
            }
        }

        let mut plan = FlightPlan::with_cycles(self.cycles);
        let outcome = session.run_loop(&mut plan, &cancel).context("航线执行失败")?;

        print_outcome(&outcome);
        println!("🔁 完成 {} 圈航线", plan.completed_cycles());
        Ok(())
    }
}
