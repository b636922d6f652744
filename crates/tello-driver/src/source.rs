//! 命令来源
//!
//! 会话循环每轮向 [`CommandSource`] 要一条命令，`None` 表示来源耗尽。
//! 交互式来源如果遇到用户中断，应先取消 [`CancelToken`](crate::CancelToken)
//! 再返回 `None`，会话据此区分正常结束和中断。

use crate::error::SourceError;
use std::collections::VecDeque;
use std::io::BufRead;
use tello_protocol::{Command, FLIGHT_PATTERN};

/// 命令来源
pub trait CommandSource {
    /// 取下一条命令
    fn next_command(&mut self) -> Result<Option<Command>, SourceError>;
}

impl<S: CommandSource + ?Sized> CommandSource for &mut S {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        (**self).next_command()
    }
}

impl<S: CommandSource + ?Sized> CommandSource for Box<S> {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        (**self).next_command()
    }
}

/// 输入中表示退出的命令
pub fn is_exit_command(line: &str) -> bool {
    matches!(line, "exit" | "quit")
}

/// 按行读取命令
///
/// 每行去掉首尾空白后作为一条命令；空行跳过；`exit`/`quit` 或 EOF 结束。
pub struct LineSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> CommandSource for LineSource<R> {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }

            // 只去掉行结束符，其余字节原样发送
            let text = strip_line_ending(&self.line);
            let keyword = text.trim();
            if keyword.is_empty() {
                continue;
            }
            if is_exit_command(keyword) {
                return Ok(None);
            }
            return Ok(Some(Command::new(text)));
        }
    }
}

/// 去掉 `\n` 或 `\r\n` 行结束符
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// 预先给定的命令列表（one-shot 模式）
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    commands: VecDeque<Command>,
}

impl ScriptedSource {
    pub fn new<I, C>(commands: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Command>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }
}

impl CommandSource for ScriptedSource {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        Ok(self.commands.pop_front())
    }
}

/// 固定航线
///
/// 先起飞一次，然后循环执行 [`FLIGHT_PATTERN`]。
/// `cycles` 为 `None` 时无限循环，只能通过取消结束。
#[derive(Debug, Clone)]
pub struct FlightPlan {
    cycles: Option<u32>,
    takeoff_pending: bool,
    completed_cycles: u32,
    step: usize,
}

impl FlightPlan {
    /// 无限循环的航线
    pub fn endless() -> Self {
        Self::with_cycles(None)
    }

    /// 指定循环次数的航线
    pub fn with_cycles(cycles: Option<u32>) -> Self {
        Self {
            cycles,
            takeoff_pending: true,
            completed_cycles: 0,
            step: 0,
        }
    }

    /// 已完成的完整循环数
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }
}

impl CommandSource for FlightPlan {
    fn next_command(&mut self) -> Result<Option<Command>, SourceError> {
        if self.takeoff_pending {
            self.takeoff_pending = false;
            return Ok(Some(Command::takeoff()));
        }

        if let Some(limit) = self.cycles
            && self.completed_cycles >= limit
        {
            return Ok(None);
        }

        let command = Command::new(FLIGHT_PATTERN[self.step]);
        self.step += 1;
        if self.step == FLIGHT_PATTERN.len() {
            self.step = 0;
            self.completed_cycles += 1;
        }
        Ok(Some(command))
    }
}
