use super::error::ZtError;
use super::model::{Network, NodeStatus, Peer};
use super::runner::{CommandRunner, command_line};
use crate::constants;
use serde::de::DeserializeOwned;

/// zerotier-cli 的调用封装
pub struct ZeroTierClient<'a, R: CommandRunner> {
    runner: &'a R,
    program: &'a str,
}

impl<'a, R: CommandRunner> ZeroTierClient<'a, R> {
    pub fn new(runner: &'a R, program: &'a str) -> Self {
        Self { runner, program }
    }

    /// 启动前的连通性检查: `zerotier-cli listnetworks`
    ///
    /// 把常见失败归类为 MissingAuthToken / ServiceNotRunning / NotInstalled
    pub fn preflight(&self) -> Result<(), ZtError> {
        let out = self.runner.run(self.program, &["listnetworks"])?;
        if out.success {
            return Ok(());
        }
        let output = out.combined();
        if output.contains(constants::MISSING_TOKEN_MARKER) {
            Err(ZtError::MissingAuthToken)
        } else if output.contains(constants::NOT_RUNNING_MARKER) {
            Err(ZtError::ServiceNotRunning)
        } else {
            Err(ZtError::CommandFailed {
                command: command_line(self.program, &["listnetworks"]),
                output,
            })
        }
    }

    pub fn list_networks(&self) -> Result<Vec<Network>, ZtError> {
        self.json(&["-j", "listnetworks"])
    }

    pub fn list_peers(&self) -> Result<Vec<Peer>, ZtError> {
        self.json(&["-j", "peers"])
    }

    /// 按 ID 重新获取单个网络
    pub fn network(&self, id: &str) -> Result<Network, ZtError> {
        self.list_networks()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| ZtError::NetworkNotFound(id.to_string()))
    }

    /// 按地址重新获取单个节点，节点已消失时返回 None
    pub fn peer(&self, address: &str) -> Result<Option<Peer>, ZtError> {
        Ok(self
            .list_peers()?
            .into_iter()
            .find(|p| p.address == address))
    }

    pub fn join(&self, network_id: &str) -> Result<(), ZtError> {
        self.runner
            .run_checked(self.program, &["join", network_id])
            .map(|_| ())
    }

    pub fn leave(&self, network_id: &str) -> Result<(), ZtError> {
        self.runner
            .run_checked(self.program, &["leave", network_id])
            .map(|_| ())
    }

    /// `zerotier-cli set <id> <key>=<0|1>`，zerotier-cli 只接受整数
    pub fn set_flag(&self, network_id: &str, key: &str, value: bool) -> Result<(), ZtError> {
        let assignment = format!("{}={}", key, u8::from(value));
        self.runner
            .run_checked(self.program, &["set", network_id, &assignment])
            .map(|_| ())
    }

    pub fn status(&self) -> Result<NodeStatus, ZtError> {
        let text = self.runner.run_checked(self.program, &["status"])?;
        NodeStatus::parse(&text).ok_or_else(|| ZtError::UnexpectedOutput {
            command: command_line(self.program, &["status"]),
            output: text,
        })
    }

    fn json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, ZtError> {
        let text = self.runner.run_checked(self.program, args)?;
        serde_json::from_str(&text).map_err(|source| ZtError::Parse {
            command: command_line(self.program, args),
            source,
        })
    }
}
