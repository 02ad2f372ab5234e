pub mod dashboard;
pub mod network;
pub mod open;
pub mod peer;
pub mod render;
pub mod system;

use crate::cli::SubCmd;
use crate::config::YamlConfig;

/// 命令分发执行
pub fn dispatch(subcmd: SubCmd, config: &mut YamlConfig) {
    match subcmd {
        // 网络
        SubCmd::Networks => network::handle_networks(config),
        SubCmd::Join { network_id } => network::handle_join(&network_id, config),
        SubCmd::Leave { network_id, yes } => network::handle_leave(&network_id, yes, config),
        SubCmd::Toggle { network_id } => network::handle_toggle(&network_id, config),
        SubCmd::Info { network_id } => network::handle_info(&network_id, config),
        SubCmd::Set {
            network_id,
            flag,
            value,
        } => network::handle_set(&network_id, &flag, &value, config),

        // 节点
        SubCmd::Peers => peer::handle_peers(config),
        SubCmd::Paths { address } => peer::handle_paths(&address, config),

        // 节点信息
        SubCmd::Status => system::handle_status(config),
        SubCmd::Central => system::handle_central(config),
        SubCmd::SetupToken => system::handle_setup_token(config),

        // 系统设置
        SubCmd::Log { key, value } => system::handle_log(&key, &value, config),
        SubCmd::Change { part, field, value } => {
            system::handle_change(&part, &field, &value, config)
        }
        SubCmd::Version => system::handle_version(config),
    }
}
