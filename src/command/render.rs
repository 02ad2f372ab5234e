//! 网络 / 节点 / 路径的定宽文本格式化，CLI 输出与 TUI 列表共用

use crate::constants::{self, msg};
use crate::util::text::{pad_left, pad_right};
use crate::zerotier::{LinkState, Network, NodeStatus, Peer, PeerPath};

/// 按 (列名, 宽度) 拼出表头
pub fn header(columns: &[(&str, usize)]) -> String {
    columns
        .iter()
        .map(|(name, width)| pad_right(name, *width))
        .collect::<String>()
}

/// `{id} | {name:<55} |{status}`
pub fn network_row(network: &Network) -> String {
    let name = if network.name.is_empty() {
        msg::NO_NAME
    } else {
        network.name.as_str()
    };
    format!("{} | {} |{}", network.id, pad_right(name, 55), network.status)
}

/// `{address} | {version:<10} | {role:<10} | {latency:<4}`
pub fn peer_row(peer: &Peer) -> String {
    format!(
        "{} | {} | {} | {}",
        peer.address,
        pad_right(peer_version(peer), 10),
        pad_right(&peer.role, 10),
        pad_right(&peer.latency.to_string(), 4)
    )
}

/// 未知版本显示为 `-`
pub fn peer_version(peer: &Peer) -> &str {
    if peer.version == constants::UNKNOWN_PEER_VERSION {
        "-"
    } else {
        &peer.version
    }
}

pub fn path_row(path: &PeerPath) -> String {
    format!(
        "{} | {} | {} | {} | {} | {} | {}",
        pad_right(&path.active.to_string(), 6),
        pad_right(&path.address, 44),
        pad_right(&path.expired.to_string(), 7),
        pad_right(&path.last_receive.to_string(), 13),
        pad_right(&path.last_send.to_string(), 13),
        pad_right(&path.preferred.to_string(), 9),
        path.trusted_path_id
    )
}

/// 详情页的一行 `{label:<25}{value}`
pub fn labeled(label: &str, value: impl std::fmt::Display) -> String {
    format!("{}{}", pad_right(label, constants::LABEL_WIDTH), value)
}

/// 网络详情（不含开关部分）
///
/// 第一个分配地址跟在标签后，其余地址右对齐到 42 列
pub fn network_info_lines(network: &Network, state: Option<&LinkState>) -> Vec<String> {
    let mut lines = vec![
        labeled("Name:", &network.name),
        labeled("Network ID:", &network.id),
    ];

    match network.assigned_addresses.split_first() {
        Some((first, rest)) => {
            lines.push(labeled("Assigned Addresses:", first));
            for address in rest {
                lines.push(pad_left(address, constants::ADDRESS_CONTINUATION_WIDTH));
            }
        }
        None => lines.push(labeled("Assigned Addresses:", "-")),
    }

    let state = state.map(|s| s.as_str()).unwrap_or("-");
    lines.extend([
        labeled("Status:", &network.status),
        labeled("State:", state),
        labeled("Type:", &network.kind),
        labeled("Device:", &network.port_device_name),
        labeled("Bridge:", network.bridge),
        labeled("MAC Address:", &network.mac),
        labeled("MTU:", network.mtu),
        labeled("DHCP:", network.dhcp),
    ]);
    lines
}

/// 开关行 `{label:<24}[x]`
pub fn flag_line(label: &str, enabled: bool) -> String {
    format!(
        "{}{}",
        pad_right(label, constants::LABEL_WIDTH - 1),
        if enabled { "[x]" } else { "[ ]" }
    )
}

/// About 页的节点信息
pub fn status_lines(status: &NodeStatus) -> Vec<String> {
    vec![
        labeled("My ZeroTier Address:", &status.address),
        labeled("ZeroTier Version:", &status.version),
        labeled("ztui Version:", constants::VERSION),
        labeled("Status:", &status.online),
    ]
}
