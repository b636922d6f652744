//! 会话观察者
//!
//! 会话本身不做任何输出，命令行等上层通过实现 [`SessionObserver`]
//! 获得每一次收发的通知。所有钩子都有空的默认实现。

use crate::session::ShutdownReport;
use tello_protocol::{Acknowledgement, Command};

/// 会话观察者
pub trait SessionObserver {
    /// 握手应答到达（无人机已进入 SDK 模式）
    fn on_handshake(&mut self, ack: &Acknowledgement) {
        let _ = ack;
    }

    /// 命令发送成功后调用
    fn on_command_sent(&mut self, command: &Command) {
        let _ = command;
    }

    /// 命令的应答到达
    fn on_ack_received(&mut self, command: &Command, ack: &Acknowledgement) {
        let _ = (command, ack);
    }

    /// 会话关闭
    fn on_shutdown(&mut self, report: &ShutdownReport) {
        let _ = report;
    }
}

/// 空观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

impl<O: SessionObserver + ?Sized> SessionObserver for Box<O> {
    fn on_handshake(&mut self, ack: &Acknowledgement) {
        (**self).on_handshake(ack);
    }

    fn on_command_sent(&mut self, command: &Command) {
        (**self).on_command_sent(command);
    }

    fn on_ack_received(&mut self, command: &Command, ack: &Acknowledgement) {
        (**self).on_ack_received(command, ack);
    }

    fn on_shutdown(&mut self, report: &ShutdownReport) {
        (**self).on_shutdown(report);
    }
}
