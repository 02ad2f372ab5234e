use thiserror::Error;

/// 调用 zerotier-cli / ip / 提权命令时可能出现的错误
#[derive(Error, Debug)]
pub enum ZtError {
    /// 找不到可执行文件
    #[error("'{0}' is not installed or not in PATH")]
    NotInstalled(String),

    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// 命令以非零状态退出，output 为 stdout + stderr
    #[error("'{command}' failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("could not parse output of '{command}': {source}")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing authentication token")]
    MissingAuthToken,

    #[error("zerotier-one service isn't running")]
    ServiceNotRunning,

    #[error("unexpected output from '{command}': {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("invalid network ID")]
    InvalidNetworkId,

    #[error("network {0} not found")]
    NetworkNotFound(String),

    #[error("interface {0} not found")]
    InterfaceNotFound(String),
}

impl ZtError {
    /// 命令失败时的原始输出（去掉首尾空白）
    pub fn output(&self) -> Option<&str> {
        match self {
            ZtError::CommandFailed { output, .. } | ZtError::UnexpectedOutput { output, .. } => {
                Some(output.trim())
            }
            _ => None,
        }
    }
}
