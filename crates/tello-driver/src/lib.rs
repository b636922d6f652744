//! # Tello Driver
//!
//! 同步命令会话：一个 UDP socket、一个固定的无人机端点、一问一答。
//!
//! ## 模块
//!
//! - `session`: 会话状态机（握手、发送、等待应答、关闭）
//! - `source`: 命令来源（按行输入、固定航线、脚本）
//! - `cancel`: 取消令牌
//! - `hooks`: 会话观察者
//! - `config`: 会话配置（TOML）
//! - `error`: 错误类型
//!
//! ## 示例
//!
//! ```no_run
//! use tello_driver::{CancelToken, FlightPlan, Session, SessionConfig};
//!
//! let config = SessionConfig::default();
//! let mut session = Session::open(&config)?;
//! let cancel = CancelToken::new();
//!
//! // 起飞后执行两圈固定航线；取消时自动降落
//! let outcome = session.run_loop(&mut FlightPlan::with_cycles(Some(2)), &cancel)?;
//! println!("{:?}", outcome.reason);
//! # Ok::<(), tello_driver::SessionError>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod hooks;
pub mod session;
pub mod source;

pub use cancel::CancelToken;
pub use config::SessionConfig;
pub use error::{ConfigError, SessionError, SourceError};
pub use hooks::{NoopObserver, SessionObserver};
pub use session::{ExitReason, RunOutcome, Session, SessionState, SessionStats, ShutdownReport};
pub use source::{
    CommandSource, FlightPlan, LineSource, ScriptedSource, is_exit_command, strip_line_ending,
};

pub use tello_link::{CommandLink, LinkError, UdpLink};
pub use tello_protocol::{Acknowledgement, Command};

#[cfg(feature = "mock")]
pub use tello_link::{LinkEvent, MockLink, MockLinkHandle, MockResponse};
