//! zerotier-cli / ip 命令的薄封装
//!
//! 所有网络逻辑都在外部守护进程里，这里只负责拼命令、执行、解析输出

pub mod auth;
pub mod client;
pub mod error;
pub mod interface;
pub mod model;
pub mod runner;

pub use client::ZeroTierClient;
pub use error::ZtError;
pub use interface::{InterfaceControl, LinkState};
pub use model::{Network, NodeStatus, Peer, PeerPath};
pub use runner::{CommandRunner, SystemRunner};
