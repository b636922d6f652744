//! # Tello Link Layer
//!
//! 命令链路抽象层：会话层只通过 [`CommandLink`] 收发数据报，
//! 不关心底层是真实 UDP socket 还是测试用的模拟链路。

use std::net::SocketAddr;
use thiserror::Error;

pub mod udp;

pub use udp::UdpLink;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::{LinkEvent, MockLink, MockLinkHandle, MockResponse};

/// 链路层统一错误类型
#[derive(Error, Debug)]
pub enum LinkError {
    /// 本地地址/端口无法绑定
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// 收发时的系统调用失败
    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),
    /// 本轮轮询内没有收到数据报
    #[error("Receive poll timeout")]
    Timeout,
    /// socket 已释放
    #[error("Link closed")]
    Closed,
}

/// 命令链路
///
/// 一条链路对应一个本地 socket 和一个固定的远端端点。
pub trait CommandLink {
    /// 向远端发送一个数据报
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError>;

    /// 接收一个数据报，返回写入 `buf` 的字节数
    ///
    /// 轮询间隔内没有数据时返回 [`LinkError::Timeout`]，由调用方决定是否继续等待。
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// 释放 socket（幂等）
    fn close(&mut self);

    /// 是否已释放
    fn is_closed(&self) -> bool;

    /// 远端地址
    fn remote_addr(&self) -> SocketAddr;

    /// 本地地址（已释放时返回 `None`）
    fn local_addr(&self) -> Option<SocketAddr>;
}

impl<L: CommandLink + ?Sized> CommandLink for Box<L> {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        (**self).send(payload)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        (**self).receive(buf)
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn remote_addr(&self) -> SocketAddr {
        (**self).remote_addr()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        (**self).local_addr()
    }
}
