use serde::Deserialize;

// ========== zerotier-cli -j 输出的数据结构 ==========
// 只读快照，未知字段忽略，缺失字段取默认值

/// `zerotier-cli -j listnetworks` 中的一条网络
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub port_device_name: String,
    pub bridge: bool,
    pub mac: String,
    pub mtu: u32,
    pub dhcp: bool,
    pub allow_default: bool,
    pub allow_global: bool,
    pub allow_managed: bool,
    #[serde(rename = "allowDNS")]
    pub allow_dns: bool,
    pub assigned_addresses: Vec<String>,
}

impl Network {
    /// 按 zerotier-cli set 使用的 key 读取开关值
    pub fn flag(&self, key: &str) -> Option<bool> {
        match key {
            "allowDefault" => Some(self.allow_default),
            "allowGlobal" => Some(self.allow_global),
            "allowManaged" => Some(self.allow_managed),
            "allowDNS" => Some(self.allow_dns),
            _ => None,
        }
    }
}

/// `zerotier-cli -j peers` 中的一个节点
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Peer {
    pub address: String,
    pub version: String,
    pub role: String,
    pub latency: i64,
    pub paths: Vec<PeerPath>,
}

/// 节点的一条物理路径
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PeerPath {
    pub active: bool,
    pub address: String,
    pub expired: bool,
    pub last_receive: i64,
    pub last_send: i64,
    pub preferred: bool,
    pub trusted_path_id: u64,
}

/// `zerotier-cli status` 的纯文本输出
/// 形如 `200 info 1a2b3c4d5e 1.10.6 ONLINE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub address: String,
    pub version: String,
    pub online: String,
}

impl NodeStatus {
    /// 按空白切分，取第 3/4/5 个字段
    pub fn parse(text: &str) -> Option<Self> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < 5 {
            return None;
        }
        Some(Self {
            address: fields[2].to_string(),
            version: fields[3].to_string(),
            online: fields[4].to_string(),
        })
    }
}
