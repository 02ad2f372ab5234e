use crate::zerotier::{CommandRunner, ZtError, runner::CmdOutput};
use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::cell::Cell;
use std::io;

/// 进入 / 离开全屏界面
pub trait Screen {
    /// 离开备用屏幕并关闭 raw mode，把终端交还给子进程
    fn suspend(&self) -> io::Result<()>;
    fn resume(&self) -> io::Result<()>;
}

/// 基于 crossterm 的 stdout 终端
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermScreen;

impl Screen for CrosstermScreen {
    fn suspend(&self) -> io::Result<()> {
        // 两步都要尝试，返回第一个错误
        let raw = terminal::disable_raw_mode();
        let screen = execute!(io::stdout(), LeaveAlternateScreen);
        raw.and(screen)
    }

    fn resume(&self) -> io::Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()
    }
}

/// 进入全屏界面运行 body，结束后无论成败都恢复终端
///
/// 进入失败时同样会尝试恢复（部分步骤可能已生效），优先返回 body 的错误
pub fn with_screen<S, T, F>(screen: &S, body: F) -> io::Result<T>
where
    S: Screen,
    F: FnOnce() -> io::Result<T>,
{
    let result = screen.resume().and_then(|_| body());
    let restored = screen.suspend();
    match result {
        Ok(value) => restored.map(|_| value),
        Err(e) => Err(e),
    }
}

/// 全屏界面里使用的 runner
///
/// 提权命令可能在终端上询问密码，执行前先让出终端，结束后恢复并要求整屏重绘
pub struct TuiRunner<R: CommandRunner, S: Screen> {
    inner: R,
    screen: S,
    redraw: Cell<bool>,
}

impl<R: CommandRunner, S: Screen> TuiRunner<R, S> {
    pub fn new(inner: R, screen: S) -> Self {
        Self {
            inner,
            screen,
            redraw: Cell::new(false),
        }
    }

    /// 终端被子进程用过之后返回 true（只返回一次）
    pub fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }
}

impl<R: CommandRunner, S: Screen> CommandRunner for TuiRunner<R, S> {
    fn run(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError> {
        self.inner.run(program, args)
    }

    fn run_escalated(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError> {
        let command = crate::zerotier::runner::command_line(program, args);
        self.screen.suspend().map_err(|source| ZtError::Io {
            command: command.clone(),
            source,
        })?;
        let result = self.inner.run_escalated(program, args);
        self.redraw.set(true);
        // 无论命令成败都要回到全屏界面
        self.screen
            .resume()
            .map_err(|source| ZtError::Io { command, source })?;
        result
    }

    fn launch(&self, program: &str, args: &[&str]) -> Result<(), ZtError> {
        self.inner.launch(program, args)
    }
}
