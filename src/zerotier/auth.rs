use super::error::ZtError;
use super::runner::CommandRunner;
use crate::constants::{self, shell};
use std::path::{Path, PathBuf};

/// 把守护进程的 authtoken.secret 复制到用户目录，让普通用户也能使用 zerotier-cli
pub struct AuthTokenSetup<'a, R: CommandRunner> {
    runner: &'a R,
    escalate: &'a str,
    secret: &'a str,
}

impl<'a, R: CommandRunner> AuthTokenSetup<'a, R> {
    pub fn new(runner: &'a R, escalate: &'a str, secret: &'a str) -> Self {
        Self {
            runner,
            escalate,
            secret,
        }
    }

    pub fn username(&self) -> Result<String, ZtError> {
        Ok(self.runner.run_checked("whoami", &[])?.trim().to_string())
    }

    /// 询问用户时展示的说明
    pub fn prompt(username: &str) -> String {
        format!(
            "In order to grant {} access to ZeroTier we need temporary root access to \
             store the Auth Token in your home folder. Otherwise, you would need to run \
             this program as root. Grant access?",
            username
        )
    }

    /// 以提权方式执行复制，返回写入的 token 路径
    pub fn install(&self, username: &str, home: &Path) -> Result<PathBuf, ZtError> {
        let target = home.join(constants::USER_AUTH_TOKEN_FILE);
        let script = install_script(self.secret, username, &target);
        self.runner.run_escalated_checked(
            self.escalate,
            &[shell::BASH_PATH, shell::BASH_CMD_FLAG, &script],
        )?;
        Ok(target)
    }
}

/// root 用户本身就能读取 token，不需要复制
#[cfg(unix)]
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}

/// cp + chown + chmod 0600 的 shell 脚本
pub fn install_script(secret: &str, username: &str, target: &Path) -> String {
    let target = shell_quote(&target.to_string_lossy());
    format!(
        "cp {secret} {target} && chown {user} {target} && chmod 0600 {target}",
        secret = shell_quote(secret),
        user = shell_quote(username),
        target = target,
    )
}

/// 单引号包裹，内部单引号转义为 '\''
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::super::runner::fake::{FakeRunner, Reply};
    use super::*;

    #[test]
    fn script_copies_and_restricts_token() {
        let script = install_script(
            "/var/lib/zerotier-one/authtoken.secret",
            "alice",
            Path::new("/home/alice/.zeroTierOneAuthToken"),
        );
        assert_eq!(
            script,
            "cp '/var/lib/zerotier-one/authtoken.secret' '/home/alice/.zeroTierOneAuthToken' \
             && chown 'alice' '/home/alice/.zeroTierOneAuthToken' \
             && chmod 0600 '/home/alice/.zeroTierOneAuthToken'"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    #[cfg(unix)]
    fn root_detection_matches_id() {
        let uid = crate::zerotier::SystemRunner
            .run_checked("id", &["-u"])
            .unwrap();
        assert_eq!(running_as_root(), uid.trim() == "0");
    }

    #[test]
    fn install_runs_through_escalation() {
        let runner = FakeRunner::new(vec![Reply::Ok("")]);
        let setup = AuthTokenSetup::new(&runner, "pkexec", "/secret");
        let path = setup.install("bob", Path::new("/home/bob")).unwrap();
        assert_eq!(path, PathBuf::from("/home/bob/.zeroTierOneAuthToken"));
        let calls = runner.escalated();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("pkexec bash -c cp '/secret' "));
    }

    #[test]
    fn prompt_names_the_user() {
        assert!(AuthTokenSetup::<FakeRunner>::prompt("carol").contains("grant carol access"));
    }
}
