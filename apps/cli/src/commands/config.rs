//! 配置管理命令
//!
//! 用于查看和生成会话配置文件（端点地址、接收上限等）

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::settings::ConnectionArgs;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置（配置文件 + 命令行参数）
    Show,

    /// 把生效的配置写入配置文件
    Init {
        /// 覆盖已有文件
        #[arg(short, long)]
        force: bool,
    },

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(connection),

            ConfigCommand::Init { force } => Self::init_(connection, force),

            ConfigCommand::Path => {
                println!("{}", connection.config_path()?.display());
                Ok(())
            },
        }
    }

    fn show_(connection: &ConnectionArgs) -> Result<()> {
        let path = connection.config_path()?;
        let config = connection.resolve()?;

        if path.exists() {
            println!("# 配置文件: {}", path.display());
        } else {
            println!("# 配置文件: {} (不存在，使用默认值)", path.display());
        }
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn init_(connection: &ConnectionArgs, force: bool) -> Result<()> {
        let path = connection.config_path()?;

        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        let config = connection.resolve()?;
        config.save(&path).context("写入配置文件失败")?;

        println!("✅ 已写入配置文件: {}", path.display());
        Ok(())
    }
}
