//! 控制台输出
//!
//! 把会话事件打印到标准输出。

use tello_driver::{Acknowledgement, Command, SessionObserver, ShutdownReport};
use tracing::warn;

/// 控制台观察者
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_handshake(&mut self, ack: &Acknowledgement) {
        println!("✅ 已进入 SDK 模式 ({})", ack.text().trim());
    }

    fn on_command_sent(&mut self, command: &Command) {
        println!("📤 Sent: {}", command);
    }

    fn on_ack_received(&mut self, _command: &Command, ack: &Acknowledgement) {
        if ack.is_truncated() {
            println!("📥 Received: {} (已截断)", ack.text().trim_end());
        } else {
            println!("📥 Received: {}", ack.text().trim_end());
        }
    }

    fn on_shutdown(&mut self, report: &ShutdownReport) {
        if report.land_attempted && !report.land_sent {
            warn!(released = report.released, "Failed to send land command during shutdown");
        }
    }
}
