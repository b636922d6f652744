//! 协议常量定义
//!
//! 端点地址、缓冲区大小以及固定的命令文本。

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// 无人机命令端口
pub const REMOTE_COMMAND_PORT: u16 = 8889;

/// 本地绑定端口
pub const LOCAL_COMMAND_PORT: u16 = 9000;

/// 无人机默认地址（接入无人机热点后固定为 192.168.10.1）
pub const DEFAULT_REMOTE_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 10, 1)), REMOTE_COMMAND_PORT);

/// 本地默认绑定地址
pub const DEFAULT_LOCAL_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), LOCAL_COMMAND_PORT);

/// 应答接收缓冲区上限（字节）
///
/// 超出部分会被截断，截断由会话层检测并记录。
pub const ACK_BUFFER_SIZE: usize = 128;

/// 单个 UDP 数据报的最大负载（IPv4：65535 - 8 - 20）
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// 握手命令：让无人机进入 SDK 命令模式
pub const HANDSHAKE_COMMAND: &str = "command";

/// 安全状态命令（中断时尽力发送）
pub const SAFE_STATE_COMMAND: &str = "land";

/// 起飞命令
pub const TAKEOFF_COMMAND: &str = "takeoff";

/// 固定航线：一个循环内依次执行的命令
pub const FLIGHT_PATTERN: [&str; 6] = [
    "left 100",
    "forward 200",
    "right 100",
    "back 250",
    "up 100",
    "down 50",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        assert_eq!(DEFAULT_REMOTE_ADDR.to_string(), "192.168.10.1:8889");
        assert_eq!(DEFAULT_LOCAL_ADDR.to_string(), "0.0.0.0:9000");
    }
}
