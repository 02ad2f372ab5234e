use super::error::ZtError;
use std::io::ErrorKind;
use std::process::{Command, Stdio};

/// 外部命令的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CmdOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    /// stdout 与 stderr 合并（对应 shell 中的 2>&1）
    pub fn combined(&self) -> String {
        let mut s = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !s.is_empty() && !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }
}

/// 执行外部命令的抽象，测试中用脚本化的假实现替换
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError>;

    /// 提权命令：sudo / 无图形 agent 的 pkexec 会在终端上询问密码
    fn run_escalated(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError>;

    /// 启动后不关心输出的程序（浏览器等），只等待启动器本身退出
    fn launch(&self, program: &str, args: &[&str]) -> Result<(), ZtError>;

    /// 执行并要求成功退出，失败时输出合并进错误
    fn run_checked(&self, program: &str, args: &[&str]) -> Result<String, ZtError> {
        checked(program, args, self.run(program, args)?)
    }

    fn run_escalated_checked(&self, program: &str, args: &[&str]) -> Result<String, ZtError> {
        checked(program, args, self.run_escalated(program, args)?)
    }
}

fn checked(program: &str, args: &[&str], out: CmdOutput) -> Result<String, ZtError> {
    if out.success {
        Ok(out.stdout)
    } else {
        Err(ZtError::CommandFailed {
            command: command_line(program, args),
            output: out.combined(),
        })
    }
}

fn spawn_error(program: &str, args: &[&str], e: std::io::Error) -> ZtError {
    match e.kind() {
        ErrorKind::NotFound => ZtError::NotInstalled(program.to_string()),
        _ => ZtError::Io {
            command: command_line(program, args),
            source: e,
        },
    }
}

fn collect(program: &str, args: &[&str], stdin: Stdio) -> Result<CmdOutput, ZtError> {
    let output = Command::new(program)
        .args(args)
        .stdin(stdin)
        .output()
        .map_err(|e| spawn_error(program, args, e))?;
    Ok(CmdOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// 基于 std::process::Command 的真实实现
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError> {
        collect(program, args, Stdio::null())
    }

    fn run_escalated(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ZtError> {
        // 密码提示走 /dev/tty，stdin 继承终端
        collect(program, args, Stdio::inherit())
    }

    fn launch(&self, program: &str, args: &[&str]) -> Result<(), ZtError> {
        // 不能用 output()：浏览器会继承管道，output() 要等它退出
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| spawn_error(program, args, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(ZtError::CommandFailed {
                command: command_line(program, args),
                output: status.to_string(),
            })
        }
    }
}

/// 拼出用于提示的命令行
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
