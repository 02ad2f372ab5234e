use super::render;
use crate::config::YamlConfig;
use crate::constants::{self, msg};
use crate::zerotier::{SystemRunner, ZeroTierClient};
use crate::{error, info, warn};
use colored::Colorize;

/// 处理 peers 命令: ztui peers
pub fn handle_peers(config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match client.list_peers() {
        Ok(peers) => {
            info!("{}", render::header(constants::PEER_HEADER).bold());
            for peer in &peers {
                info!("{}", render::peer_row(peer));
            }
        }
        Err(e) => error!("❌ {}", e),
    }
}

/// 处理 paths 命令: ztui paths <address>
pub fn handle_paths(address: &str, config: &YamlConfig) {
    if address.trim().is_empty() {
        error!("❌ {}", msg::NO_PEER);
        return;
    }
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match client.peer(address.trim()) {
        Ok(Some(peer)) => {
            info!("{}", render::header(constants::PATH_HEADER).bold());
            for path in &peer.paths {
                info!("{}", render::path_row(path));
            }
        }
        Ok(None) => warn!("peer {} is no longer known", address),
        Err(e) => error!("❌ {}", e),
    }
}
