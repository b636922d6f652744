//! UDP 命令链路
//!
//! 使用 `std::net::UdpSocket`。接收设置了读超时作为轮询间隔，
//! 这样阻塞等待应答的线程也能及时观察到取消信号。

use crate::{CommandLink, LinkError};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;
use tracing::{debug, trace};

/// UDP 命令链路
pub struct UdpLink {
    /// 本地 socket（释放后为 `None`）
    socket: Option<UdpSocket>,

    /// 远端端点（无人机地址）
    remote: SocketAddr,
}

impl UdpLink {
    /// 绑定本地地址并固定远端端点
    ///
    /// # 参数
    /// - `local`: 本地绑定地址（如 `0.0.0.0:9000`）
    /// - `remote`: 无人机地址（如 `192.168.10.1:8889`）
    /// - `poll_interval`: 接收轮询间隔，必须大于 0
    ///
    /// # 返回
    /// - `Err(LinkError::Bind)`: 地址/端口不可用
    pub fn bind(
        local: SocketAddr,
        remote: SocketAddr,
        poll_interval: Duration,
    ) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(local).map_err(|source| LinkError::Bind {
            addr: local,
            source,
        })?;

        // 读超时为 0 会被系统拒绝，这里兜底为 1ms
        let poll_interval = poll_interval.max(Duration::from_millis(1));
        socket.set_read_timeout(Some(poll_interval))?;

        debug!(
            local = %socket.local_addr()?,
            %remote,
            "UDP command link bound"
        );

        Ok(Self {
            socket: Some(socket),
            remote,
        })
    }

    fn socket(&self) -> Result<&UdpSocket, LinkError> {
        self.socket.as_ref().ok_or(LinkError::Closed)
    }
}

impl CommandLink for UdpLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let socket = self.socket()?;
        let sent = socket.send_to(payload, self.remote)?;
        trace!(bytes = sent, remote = %self.remote, "datagram sent");
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let socket = self.socket()?;
        match socket.recv_from(buf) {
            Ok((len, from)) => {
                if from != self.remote {
                    debug!(%from, expected = %self.remote, "datagram from unexpected peer");
                }
                trace!(bytes = len, %from, "datagram received");
                Ok(len)
            },
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Err(LinkError::Timeout)
            },
            Err(e) => Err(LinkError::Io(e)),
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!(remote = %self.remote, "UDP command link closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}
