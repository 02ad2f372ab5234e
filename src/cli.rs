use clap::{Parser, Subcommand};

/// ztui - ZeroTier One 终端前端 🌐
/// 不带子命令时进入全屏界面
#[derive(Parser, Debug)]
#[command(name = "ztui", version, about = "A terminal front-end for ZeroTier One", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<SubCmd>,
}

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    // ========== 网络 ==========
    /// List joined networks
    #[command(alias = "ls")]
    Networks,

    /// Join a network
    Join {
        /// 16-digit network ID
        network_id: String,
    },

    /// Leave a network
    Leave {
        network_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Bring a network's interface up or down
    Toggle { network_id: String },

    /// Show details of a joined network
    Info { network_id: String },

    /// Change a network flag (allowDefault, allowGlobal, allowManaged, allowDNS)
    Set {
        network_id: String,
        /// Flag name, e.g. allowDefault or just default
        flag: String,
        /// on/off, 1/0 or true/false
        value: String,
    },

    // ========== 节点 ==========
    /// List peers
    Peers,

    /// List the paths of one peer
    Paths {
        /// 10-digit ZeroTier address of the peer
        address: String,
    },

    // ========== 节点信息 ==========
    /// Show this node's address, version and status
    #[command(alias = "about")]
    Status,

    /// Open ZeroTier Central in the browser
    Central,

    /// Copy the daemon auth token to the home folder
    SetupToken,

    // ========== 系统设置 ==========
    /// Log mode: ztui log mode <verbose|concise>
    Log { key: String, value: String },

    /// Change a config value: ztui change <section> <field> <value>
    #[command(alias = "chg")]
    Change {
        part: String,
        field: String,
        value: String,
    },

    /// Version information
    #[command(alias = "v")]
    Version,
}

impl SubCmd {
    /// 是否需要先确认 zerotier-cli 可用
    pub fn needs_daemon(&self) -> bool {
        !matches!(
            self,
            SubCmd::Central
                | SubCmd::SetupToken
                | SubCmd::Log { .. }
                | SubCmd::Change { .. }
                | SubCmd::Version
        )
    }
}
