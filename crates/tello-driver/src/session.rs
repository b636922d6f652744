//! 命令会话
//!
//! 会话独占一条 [`CommandLink`]，严格按"发一条、等一条应答"的方式工作，
//! 任何时刻最多只有一条命令在途。
//!
//! # 状态机
//!
//! ```text
//! Unstarted ──handshake──▶ Handshaking ──ack──▶ AwaitingCommand ⇄ AwaitingAck
//!                                                     │
//!                          shutdown / close / drop    ▼
//!                                                  Shutdown（终态）
//! ```
//!
//! # 资源释放
//!
//! 无论正常结束、中断还是出错，socket 都只释放一次：
//! `run_loop` 在返回前释放，直接使用底层操作时由 `Drop` 兜底。
//! 只有中断才会尽力发送一次 `land`，发送失败只记录日志，不重试。

use crate::cancel::CancelToken;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::hooks::{NoopObserver, SessionObserver};
use crate::source::CommandSource;
use std::net::SocketAddr;
use tello_link::{CommandLink, LinkError, UdpLink};
use tello_protocol::{Acknowledgement, Command, MAX_DATAGRAM_SIZE};
use tracing::{debug, info, warn};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 已绑定，尚未握手
    Unstarted,
    /// 握手命令已发出，等待应答
    Handshaking,
    /// 空闲，可以发送下一条命令
    AwaitingCommand,
    /// 命令已发出，等待应答
    AwaitingAck,
    /// socket 已释放（终态）
    Shutdown,
}

/// 会话统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// 成功发送的命令数（含握手和 land）
    pub commands_sent: u64,
    /// 收到的应答数（含握手应答）
    pub acks_received: u64,
    /// 被截断的应答数
    pub truncated_acks: u64,
}

/// 循环结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// 命令来源耗尽
    Completed,
    /// 收到取消信号
    Interrupted,
}

/// `run_loop` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: ExitReason,
    /// 本次循环完成的"命令-应答"次数（不含握手）
    pub exchanges: u64,
    pub stats: SessionStats,
}

/// 关闭报告
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// 是否尝试发送 `land`
    pub land_attempted: bool,
    /// `land` 是否发送成功
    pub land_sent: bool,
    /// 本次调用是否释放了 socket（重复关闭时为 `false`）
    pub released: bool,
}

/// 命令会话
pub struct Session<L: CommandLink> {
    link: L,
    observer: Box<dyn SessionObserver>,
    state: SessionState,
    ack_capacity: usize,
    stats: SessionStats,
    /// 等待应答的命令
    in_flight: Option<Command>,
}

impl Session<UdpLink> {
    /// 按配置绑定 UDP socket 并创建会话
    ///
    /// # 返回
    /// - `Err(SessionError::Config)`: 配置无效
    /// - `Err(SessionError::Link(LinkError::Bind { .. }))`: 本地地址不可用
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let link = UdpLink::bind(config.local_addr, config.remote_addr, config.poll_interval())?;
        info!(
            local = %config.local_addr,
            remote = %config.remote_addr,
            "Session opened"
        );
        Ok(Self::with_link(link, config.ack_capacity))
    }
}

impl<L: CommandLink> Session<L> {
    /// 使用任意链路创建会话
    ///
    /// `ack_capacity` 会被限制在 `1..=MAX_DATAGRAM_SIZE`。
    pub fn with_link(link: L, ack_capacity: usize) -> Self {
        Self {
            link,
            observer: Box::new(NoopObserver),
            state: SessionState::Unstarted,
            ack_capacity: ack_capacity.clamp(1, MAX_DATAGRAM_SIZE),
            stats: SessionStats::default(),
            in_flight: None,
        }
    }

    /// 设置观察者
    pub fn set_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observer = Box::new(observer);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn ack_capacity(&self) -> usize {
        self.ack_capacity
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.link.remote_addr()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.link.local_addr()
    }

    /// 握手：发送 `command` 并等待一条应答
    ///
    /// 只能在 `Unstarted` 状态调用，因此握手命令总是会话的第一个数据报。
    /// 应答内容不做校验。
    pub fn handshake(&mut self, cancel: &CancelToken) -> Result<Acknowledgement, SessionError> {
        self.expect_state(&[SessionState::Unstarted], "handshake")?;

        let command = Command::handshake();
        self.link.send(command.encode())?;
        self.stats.commands_sent += 1;
        self.state = SessionState::Handshaking;
        debug!(command = %command, "handshake sent");

        let ack = self.receive_ack(cancel)?;
        info!(ack = %ack, "Entered SDK mode");
        self.observer.on_handshake(&ack);
        Ok(ack)
    }

    /// 发送一条命令（不等待应答）
    pub fn send_command(&mut self, command: &Command) -> Result<(), SessionError> {
        self.expect_state(&[SessionState::AwaitingCommand], "send command")?;

        self.link.send(command.encode())?;
        self.stats.commands_sent += 1;
        self.in_flight = Some(command.clone());
        self.state = SessionState::AwaitingAck;

        debug!(command = %command, "command sent");
        self.observer.on_command_sent(command);
        Ok(())
    }

    /// 阻塞等待一条应答
    ///
    /// 没有截止时间：链路每次轮询超时后检查取消令牌，未取消就继续等。
    /// 超过 `ack_capacity` 的应答会被截断并记录告警。
    pub fn receive_ack(&mut self, cancel: &CancelToken) -> Result<Acknowledgement, SessionError> {
        self.expect_state(
            &[SessionState::Handshaking, SessionState::AwaitingAck],
            "receive ack",
        )?;

        // 多留一个字节用于检测截断
        let mut buf = vec![0u8; self.ack_capacity + 1];
        let len = loop {
            match self.link.receive(&mut buf) {
                Ok(len) => break len,
                Err(LinkError::Timeout) => {
                    if cancel.is_cancelled() {
                        debug!(state = ?self.state, "receive cancelled");
                        return Err(SessionError::Cancelled);
                    }
                },
                Err(e) => return Err(e.into()),
            }
        };

        let ack = Acknowledgement::from_datagram(&buf[..len], self.ack_capacity);
        self.stats.acks_received += 1;
        if ack.is_truncated() {
            self.stats.truncated_acks += 1;
            warn!(
                capacity = self.ack_capacity,
                "Acknowledgement exceeded receive buffer and was truncated"
            );
        }
        debug!(ack = %ack, "ack received");

        if let Some(command) = self.in_flight.take() {
            self.observer.on_ack_received(&command, &ack);
        }
        self.state = SessionState::AwaitingCommand;
        Ok(ack)
    }

    /// 运行命令循环
    ///
    /// 尚未握手时先握手；之后每条命令发送一次、接收一次应答。
    /// - 来源耗尽：释放 socket，返回 [`ExitReason::Completed`]
    /// - 取消：执行 [`shutdown`](Self::shutdown)，返回 [`ExitReason::Interrupted`]
    /// - 链路/来源错误：释放 socket 后返回错误（不发送 `land`）
    pub fn run_loop<S: CommandSource>(
        &mut self,
        source: &mut S,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, SessionError> {
        self.expect_state(
            &[SessionState::Unstarted, SessionState::AwaitingCommand],
            "run loop",
        )?;

        let mut exchanges = 0;
        let result = self.drive(source, cancel, &mut exchanges);

        let reason = match result {
            Ok(ExitReason::Completed) => {
                info!(exchanges, "Command source exhausted");
                self.close();
                ExitReason::Completed
            },
            Ok(ExitReason::Interrupted) | Err(SessionError::Cancelled) => {
                info!(exchanges, "Session interrupted, landing");
                self.shutdown();
                ExitReason::Interrupted
            },
            Err(e) => {
                warn!(error = %e, "Session aborted");
                self.close();
                return Err(e);
            },
        };

        Ok(RunOutcome {
            reason,
            exchanges,
            stats: self.stats,
        })
    }

    fn drive<S: CommandSource>(
        &mut self,
        source: &mut S,
        cancel: &CancelToken,
        exchanges: &mut u64,
    ) -> Result<ExitReason, SessionError> {
        if self.state == SessionState::Unstarted {
            self.handshake(cancel)?;
        }

        loop {
            if cancel.is_cancelled() {
                return Ok(ExitReason::Interrupted);
            }

            let Some(command) = source.next_command()? else {
                // 交互式来源被中断时会先取消令牌
                return Ok(if cancel.is_cancelled() {
                    ExitReason::Interrupted
                } else {
                    ExitReason::Completed
                });
            };

            self.send_command(&command)?;
            self.receive_ack(cancel)?;
            *exchanges += 1;
        }
    }

    /// 中断关闭：尽力发送 `land`，然后释放 socket
    ///
    /// `land` 失败只记录日志。重复调用不会再次发送或释放。
    pub fn shutdown(&mut self) -> ShutdownReport {
        self.finish(true)
    }

    /// 正常关闭：直接释放 socket
    pub fn close(&mut self) -> ShutdownReport {
        self.finish(false)
    }

    fn finish(&mut self, land: bool) -> ShutdownReport {
        if self.state == SessionState::Shutdown {
            return ShutdownReport::default();
        }

        let land_sent = land && self.send_land();
        self.link.close();
        self.state = SessionState::Shutdown;
        self.in_flight = None;

        let report = ShutdownReport {
            land_attempted: land,
            land_sent,
            released: true,
        };
        info!(land_sent, "Session closed");
        self.observer.on_shutdown(&report);
        report
    }

    fn send_land(&mut self) -> bool {
        let land = Command::land();
        match self.link.send(land.encode()) {
            Ok(()) => {
                self.stats.commands_sent += 1;
                self.observer.on_command_sent(&land);
                true
            },
            Err(e) => {
                warn!(error = %e, "Best-effort land failed");
                false
            },
        }
    }

    fn expect_state(
        &self,
        allowed: &[SessionState],
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

impl<L: CommandLink> Drop for Session<L> {
    fn drop(&mut self) {
        self.finish(false);
    }
}
