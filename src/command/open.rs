use crate::constants::shell;
use crate::zerotier::{CommandRunner, ZtError};
use std::io::Write;
use std::process::{Command, Stdio};

const NO_ARGS: &[&str] = &[];
const WINDOWS_START: &[&str] = &["/c", "start", ""];

/// 各平台打开 URL 的命令
pub fn opener_for(os: &str) -> (&'static str, &'static [&'static str]) {
    match os {
        shell::MACOS_OS => ("open", NO_ARGS),
        shell::WINDOWS_OS => ("cmd", WINDOWS_START),
        // Linux fallback
        _ => ("xdg-open", NO_ARGS),
    }
}

/// 用系统默认浏览器打开 URL，只等待 xdg-open / open 本身返回
pub fn open_url<R: CommandRunner>(runner: &R, url: &str) -> Result<(), ZtError> {
    let (program, prefix) = opener_for(std::env::consts::OS);
    let mut args: Vec<&str> = prefix.to_vec();
    args.push(url);
    runner.launch(program, &args)
}

/// 复制内容到系统剪切板（macOS 使用 pbcopy，Linux 使用 xclip / xsel）
pub fn copy_to_clipboard(content: &str) -> bool {
    let (cmd, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("pbcopy", vec![])
    } else if cfg!(target_os = "linux") {
        if Command::new("which")
            .arg("xclip")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            ("xclip", vec!["-selection", "clipboard"])
        } else {
            ("xsel", vec!["--clipboard", "--input"])
        }
    } else {
        return false;
    };

    let child = Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match child {
        Ok(mut child) => {
            if let Some(ref mut stdin) = child.stdin {
                let _ = stdin.write_all(content.as_bytes());
            }
            // 关闭 stdin，xclip 才会结束读取
            drop(child.stdin.take());
            child.wait().map(|s| s.success()).unwrap_or(false)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zerotier::runner::fake::{FakeRunner, Reply};

    #[test]
    fn opener_per_platform() {
        assert_eq!(opener_for("macos").0, "open");
        assert_eq!(opener_for("windows"), ("cmd", &["/c", "start", ""][..]));
        assert_eq!(opener_for("linux").0, "xdg-open");
    }

    #[test]
    fn open_url_passes_url_last() {
        let runner = FakeRunner::new(vec![Reply::Ok("")]);
        open_url(&runner, "https://my.zerotier.com").unwrap();
        let launched = runner.launched();
        assert_eq!(launched.len(), 1);
        assert!(launched[0].ends_with("https://my.zerotier.com"));
    }
}
