//! 命令定义和实现

pub mod config;
pub mod fly;
pub mod send;

pub use config::ConfigCommand;
pub use fly::FlyCommand;
pub use send::SendCommand;
