//! 起飞前确认
//!
//! 固定航线会在握手后立即起飞，执行前需要用户确认。

use anyhow::Result;
use inquire::InquireError;
use tello_protocol::FLIGHT_PATTERN;

/// 确认结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// 继续执行
    Proceed,
    /// 用户拒绝
    Declined,
    /// 用户按下 Ctrl+C / Esc
    Interrupted,
}

/// 航线摘要
pub fn flight_summary(cycles: Option<u32>) -> String {
    let rounds = match cycles {
        Some(n) => format!("{} 圈", n),
        None => "无限循环（Ctrl+C 降落）".to_string(),
    };
    format!("takeoff → [{}] × {}", FLIGHT_PATTERN.join(", "), rounds)
}

/// 显示确认提示
pub fn confirm_takeoff(cycles: Option<u32>) -> Result<Confirmation> {
    println!("🛫 即将执行: {}", flight_summary(cycles));

    // ✅ 默认为 No（安全优先）
    match inquire::Confirm::new("确定要起飞吗？").with_default(false).prompt() {
        Ok(true) => Ok(Confirmation::Proceed),
        Ok(false) => Ok(Confirmation::Declined),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Confirmation::Interrupted)
        },
        Err(e) => Err(anyhow::anyhow!("用户交互失败: {}", e)),
    }
}
