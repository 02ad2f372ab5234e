use super::render;
use crate::config::YamlConfig;
use crate::constants::{self, msg};
use crate::util::confirm;
use crate::zerotier::{CommandRunner, InterfaceControl, SystemRunner, ZeroTierClient, ZtError};
use crate::zerotier::interface::parse_link_state;
use crate::{debug_log, error, info, usage, warn};
use colored::Colorize;

/// 处理 networks 命令: ztui networks
/// 网卡处于 down 状态的网络标红
pub fn handle_networks(config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    let networks = match client.list_networks() {
        Ok(n) => n,
        Err(e) => {
            error!("❌ {}", e);
            return;
        }
    };

    if networks.is_empty() {
        info!("no joined networks 😢");
        return;
    }

    // 一次 ip address 查询所有网卡
    let ip_output = InterfaceControl::new(&runner, config.ip_program(), config.escalate_program())
        .snapshot()
        .unwrap_or_else(|e| {
            warn!("could not read interface states: {}", e);
            String::new()
        });

    info!("{}", render::header(constants::NETWORK_HEADER).bold());
    for network in &networks {
        let row = render::network_row(network);
        let down = parse_link_state(&ip_output, &network.port_device_name)
            .is_some_and(|s| s.is_down());
        if down {
            info!("{}", row.red());
        } else {
            info!("{}", row);
        }
    }
}

/// 处理 join 命令: ztui join <network_id>
pub fn handle_join(network_id: &str, config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match join_network(&client, network_id) {
        Ok(()) => info!("✅ {}", msg::JOIN_OK),
        Err(e) => {
            debug_log!(config, "join failed: {}", e);
            error!("❌ {}", msg::JOIN_INVALID);
        }
    }
}

/// 空 ID 直接拒绝，不调用 zerotier-cli
pub fn join_network<R: CommandRunner>(
    client: &ZeroTierClient<'_, R>,
    network_id: &str,
) -> Result<(), ZtError> {
    let network_id = network_id.trim();
    if network_id.is_empty() {
        return Err(ZtError::InvalidNetworkId);
    }
    client.join(network_id)
}

/// 处理 leave 命令: ztui leave <network_id> [-y]
pub fn handle_leave(network_id: &str, yes: bool, config: &YamlConfig) {
    if !yes && !confirm(&format!("Are you sure you want to leave {}?", network_id)) {
        info!("Cancelled");
        return;
    }
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match client.leave(network_id) {
        Ok(()) => info!("✅ {}", msg::LEAVE_OK),
        Err(e) => {
            debug_log!(config, "leave failed: {}", e);
            error!("❌ {}", msg::LEAVE_ERROR);
        }
    }
}

/// 处理 toggle 命令: ztui toggle <network_id>
pub fn handle_toggle(network_id: &str, config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    let ctl = InterfaceControl::new(&runner, config.ip_program(), config.escalate_program());
    match toggle_network(&client, &ctl, network_id) {
        Ok((device, target)) => info!("✅ {} is now {}", device, target),
        Err(e) => error!("❌ {}", e),
    }
}

/// 按 ID 重新获取网络再切换其网卡，返回 (网卡名, 目标状态)
pub fn toggle_network<R: CommandRunner>(
    client: &ZeroTierClient<'_, R>,
    ctl: &InterfaceControl<'_, R>,
    network_id: &str,
) -> Result<(String, &'static str), ZtError> {
    let network = client.network(network_id)?;
    let target = ctl.toggle(&network.port_device_name)?;
    Ok((network.port_device_name, target))
}

/// 处理 info 命令: ztui info <network_id>
pub fn handle_info(network_id: &str, config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    let network = match client.network(network_id) {
        Ok(n) => n,
        Err(e) => {
            error!("❌ {}", e);
            return;
        }
    };
    let ctl = InterfaceControl::new(&runner, config.ip_program(), config.escalate_program());
    let state = ctl.state(&network.port_device_name).ok();

    for line in render::network_info_lines(&network, state.as_ref()) {
        info!("{}", line);
    }
    info!("");
    for (key, label) in constants::NETWORK_FLAGS {
        info!(
            "{}",
            render::flag_line(label, network.flag(key).unwrap_or(false))
        );
    }
}

/// 处理 set 命令: ztui set <network_id> <flag> <on|off>
pub fn handle_set(network_id: &str, flag: &str, value: &str, config: &YamlConfig) {
    let Some(key) = flag_key(flag) else {
        error!("❌ unknown flag: {}", flag);
        usage!("ztui set <network_id> <allowDefault|allowGlobal|allowManaged|allowDNS> <on|off>");
        return;
    };
    let Some(enabled) = parse_switch(value) else {
        error!("❌ invalid value: {}", value);
        usage!("ztui set <network_id> {} <on|off>", key);
        return;
    };

    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match client.set_flag(network_id, key, enabled) {
        Ok(()) => info!("✅ {}={}", key, u8::from(enabled)),
        Err(e) => error!("Error: \"{}\"", e.output().unwrap_or(&e.to_string())),
    }
}

/// 接受完整 key（allowDefault）或简写（default），大小写不敏感
pub fn flag_key(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    constants::NETWORK_FLAGS
        .iter()
        .map(|(key, _)| *key)
        .find(|key| {
            let key_lower = key.to_lowercase();
            key_lower == lower || key_lower.trim_start_matches("allow") == lower
        })
}

pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zerotier::runner::fake::{FakeRunner, Reply};

    #[test]
    fn flag_names() {
        assert_eq!(flag_key("allowDefault"), Some("allowDefault"));
        assert_eq!(flag_key("GLOBAL"), Some("allowGlobal"));
        assert_eq!(flag_key("dns"), Some("allowDNS"));
        assert_eq!(flag_key("allowdns"), Some("allowDNS"));
        assert_eq!(flag_key("bridge"), None);
    }

    #[test]
    fn switch_values() {
        assert_eq!(parse_switch("ON"), Some(true));
        assert_eq!(parse_switch("0"), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn empty_join_never_runs_cli() {
        let runner = FakeRunner::new(vec![]);
        let client = ZeroTierClient::new(&runner, "zerotier-cli");
        assert!(join_network(&client, "   ").is_err());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn join_trims_id() {
        let runner = FakeRunner::new(vec![Reply::Ok("200 join OK")]);
        let client = ZeroTierClient::new(&runner, "zerotier-cli");
        join_network(&client, " 8056c2e21c000001\n").unwrap();
        assert_eq!(runner.calls(), vec!["zerotier-cli join 8056c2e21c000001"]);
    }

    #[test]
    fn toggle_resolves_device_by_network_id() {
        let networks = r#"[{"id": "aaaa", "portDeviceName": "zt0"}, {"id": "bbbb", "portDeviceName": "zt1"}]"#;
        let ip = "3: zt1: <BROADCAST> mtu 2800 state DOWN group default\n";
        let runner = FakeRunner::new(vec![Reply::Ok(networks), Reply::Ok(ip), Reply::Ok("")]);
        let client = ZeroTierClient::new(&runner, "zerotier-cli");
        let ctl = InterfaceControl::new(&runner, "ip", "pkexec");
        let (device, target) = toggle_network(&client, &ctl, "bbbb").unwrap();
        assert_eq!(device, "zt1");
        assert_eq!(target, "up");
        assert_eq!(runner.calls()[2], "pkexec ip link set zt1 up");
    }
}
