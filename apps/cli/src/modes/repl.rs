//! REPL 模式（交互式 Shell）
//!
//! 每行输入原样作为一条命令发送，然后等待应答再显示下一个提示符。
//! Ctrl+C 在提示符处由 rustyline 捕获，在等待应答时由 ctrlc 处理，
//! 两种情况都会取消会话并降落。

use anyhow::{Context, Result};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tello_driver::{
    CancelToken, Command, CommandSource, SourceError, is_exit_command, strip_line_ending,
};

use crate::modes::{open_session, print_outcome};
use crate::settings::ConnectionArgs;

/// 历史记录文件
const HISTORY_PATH: &str = ".tello_history";

/// 提示符
const PROMPT: &str = "tello> ";

/// 交互式命令来源
pub struct ReplSource {
    editor: Editor<(), DefaultHistory>,
    cancel: CancelToken,
}

impl ReplSource {
    /// 创建输入编辑器（保留历史记录）
    pub fn new(cancel: CancelToken) -> Result<Self> {
        let mut editor = Editor::<(), DefaultHistory>::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {}", e))?;
        editor.load_history(HISTORY_PATH).ok(); // 忽略错误（首次运行）

        Ok(Self { editor, cancel })
    }

    fn save_history(&mut self) {
        self.editor.save_history(HISTORY_PATH).ok();
    }
}

impl CommandSource for ReplSource {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    // 判断用去空白的副本，发送原始输入
                    let line = strip_line_ending(&line);
                    let keyword = line.trim();

                    if keyword.is_empty() {
                        continue;
                    }

                    if is_exit_command(keyword) {
                        self.save_history();
                        return Ok(None);
                    }

                    if keyword == "help" {
                        print_help();
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);
                    return Ok(Some(Command::new(line)));
                },

                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C：交给会话降落
                    println!("^C");
                    self.save_history();
                    self.cancel.cancel();
                    return Ok(None);
                },

                Err(ReadlineError::Eof) => {
                    // Ctrl+D：正常退出
                    self.save_history();
                    return Ok(None);
                },

                Err(err) => return Err(SourceError::Interactive(err.to_string())),
            }
        }
    }
}

/// 运行交互式 Shell
pub fn run_shell(connection: &ConnectionArgs) -> Result<()> {
    let (mut session, cancel) = open_session(connection)?;
    let mut source = ReplSource::new(cancel.clone())?;

    println!("Tello CLI v{} - 交互式 Shell", env!("CARGO_PKG_VERSION"));
    println!("输入 'help' 查看帮助，'exit' 退出");
    println!();

    let outcome = session.run_loop(&mut source, &cancel).context("会话异常结束")?;

    print_outcome(&outcome);
    Ok(())
}

/// 打印帮助信息
fn print_help() {
    println!("输入的每一行都会原样发送给无人机，例如:");
    println!("  takeoff                       起飞");
    println!("  land                          降落");
    println!("  up/down/left/right <cm>       移动");
    println!("  forward/back <cm>             前进/后退");
    println!("  cw/ccw <deg>                  旋转");
    println!("  battery?                      查询电量");
    println!("  help                          显示帮助（不发送）");
    println!("  exit / quit                   退出（不降落）");
    println!();
    println!("快捷键:");
    println!("  Ctrl+C                        降落并退出");
    println!("  Ctrl+D                        退出");
    println!();
}
