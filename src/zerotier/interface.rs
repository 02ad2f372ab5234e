use super::error::ZtError;
use super::runner::CommandRunner;

/// 网卡的管理状态（`ip address` 中 `state` 后面的单词）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState(pub String);

impl LinkState {
    pub fn is_down(&self) -> bool {
        self.0.eq_ignore_ascii_case("down")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 从 `ip address` 的输出中找到指定网卡的 state
///
/// 网卡行形如 `5: ztabcdef12: <BROADCAST,MULTICAST,UP> mtu 2800 ... state UNKNOWN group default`，
/// 名称可能带 `@peer` 后缀
pub fn parse_link_state(ip_output: &str, interface: &str) -> Option<LinkState> {
    if interface.is_empty() {
        return None;
    }
    ip_output
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.starts_with('\t'))
        .find(|line| {
            line.split_whitespace()
                .nth(1)
                .map(|name| name.trim_end_matches(':'))
                .map(|name| name.split('@').next().unwrap_or(name))
                == Some(interface)
        })
        .and_then(|line| {
            let mut words = line.split_whitespace();
            words.by_ref().find(|w| *w == "state")?;
            words.next().map(|w| LinkState(w.to_string()))
        })
}

/// 读取与切换网卡状态
pub struct InterfaceControl<'a, R: CommandRunner> {
    runner: &'a R,
    ip: &'a str,
    escalate: &'a str,
}

impl<'a, R: CommandRunner> InterfaceControl<'a, R> {
    pub fn new(runner: &'a R, ip: &'a str, escalate: &'a str) -> Self {
        Self {
            runner,
            ip,
            escalate,
        }
    }

    /// 执行一次 `ip address`，供批量查询复用
    pub fn snapshot(&self) -> Result<String, ZtError> {
        self.runner.run_checked(self.ip, &["address"])
    }

    pub fn state(&self, interface: &str) -> Result<LinkState, ZtError> {
        let output = self.snapshot()?;
        parse_link_state(&output, interface)
            .ok_or_else(|| ZtError::InterfaceNotFound(interface.to_string()))
    }

    /// down 则拉起，否则关闭；返回切换后的目标状态
    pub fn toggle(&self, interface: &str) -> Result<&'static str, ZtError> {
        let target = if self.state(interface)?.is_down() {
            "up"
        } else {
            "down"
        };
        self.runner.run_escalated_checked(
            self.escalate,
            &[self.ip, "link", "set", interface, target],
        )?;
        Ok(target)
    }
}
