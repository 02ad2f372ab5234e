// 项目全局常量定义
// 所有魔法字符串和可复用常量统一在此维护

// ========== 版本信息 ==========

/// 版本号（自动从 Cargo.toml 读取，编译时确定）
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 项目名称
pub const APP_NAME: &str = "ztui";

/// 标题
pub const APP_TITLE: &str = "ZeroTier";

/// 致谢
pub const CREDITS: &str = "Terminal front-end for ZeroTier One";

/// 项目主页
pub const HOMEPAGE: &str = "github.com/tralph3/zerotier-gui";

// ========== Section 名称 ==========

/// 配置文件中的 section 名称常量
pub mod section {
    pub const ZEROTIER: &str = "zerotier";
    pub const SYSTEM: &str = "system";
    pub const LOG: &str = "log";
}

/// 所有 section 名称列表（有序）
pub const ALL_SECTIONS: &[&str] = &[section::ZEROTIER, section::SYSTEM, section::LOG];

// ========== 配置 key ==========

/// 配置 key 名称常量
pub mod config_key {
    pub const CLI: &str = "cli";
    pub const AUTH_SECRET: &str = "auth_secret";
    pub const CENTRAL_URL: &str = "central_url";
    pub const IP: &str = "ip";
    pub const ESCALATE: &str = "escalate";
    pub const MODE: &str = "mode";
    pub const VERBOSE: &str = "verbose";
    pub const CONCISE: &str = "concise";
}

// ========== 默认值 ==========

/// 默认 zerotier-cli 可执行文件
pub const DEFAULT_CLI: &str = "zerotier-cli";

/// 默认 ip 命令
pub const DEFAULT_IP: &str = "ip";

/// 默认提权命令
pub const DEFAULT_ESCALATE: &str = "pkexec";

/// ZeroTier Central 地址
pub const DEFAULT_CENTRAL_URL: &str = "https://my.zerotier.com";

/// 守护进程的 auth token 位置
pub const DEFAULT_AUTH_SECRET: &str = "/var/lib/zerotier-one/authtoken.secret";

/// 用户目录下 auth token 的文件名（zerotier-cli 会自动读取）
pub const USER_AUTH_TOKEN_FILE: &str = ".zeroTierOneAuthToken";

// ========== 数据目录 ==========

/// 数据根目录名
pub const DATA_DIR: &str = ".ztui";

/// 数据路径环境变量名
pub const DATA_PATH_ENV: &str = "ZTUI_DATA_PATH";

/// 配置文件名
pub const CONFIG_FILE: &str = "config.yaml";

// ========== zerotier-cli 输出识别 ==========

/// 缺少 auth token 时 zerotier-cli 的输出片段
pub const MISSING_TOKEN_MARKER: &str = "missing authentication token";

/// 服务未运行时 zerotier-cli 的输出片段
pub const NOT_RUNNING_MARKER: &str = "Error connecting";

/// peers 中未知版本的占位
pub const UNKNOWN_PEER_VERSION: &str = "-1.-1.-1";

// ========== 提示消息 ==========

/// 用户可见的提示消息
pub mod msg {
    pub const JOIN_OK: &str = "Successfully joined network";
    pub const JOIN_INVALID: &str = "Invalid network ID";
    pub const LEAVE_OK: &str = "Successfully left network";
    pub const LEAVE_ERROR: &str = "Error";
    pub const NO_NETWORK: &str = "No network selected";
    pub const NO_PEER: &str = "No peer selected";
    pub const NO_NAME: &str = "No name";
    pub const NOT_INSTALLED: &str = "ZeroTier isn't installed!";
    pub const NO_ACCESS: &str = "This user doesn't have access to ZeroTier!";
    pub const NOT_RUNNING: &str = "\"zerotier-one\" service isn't running!";
}

// ========== 表格布局 ==========

/// 详情页标签列宽
pub const LABEL_WIDTH: usize = 25;

/// 详情页中后续分配地址的右对齐宽度
pub const ADDRESS_CONTINUATION_WIDTH: usize = 42;

/// 网络列表表头（列名, 宽度）
pub const NETWORK_HEADER: &[(&str, usize)] = &[("Network ID", 19), ("Name", 57), ("Status", 26)];

/// 节点列表表头
pub const PEER_HEADER: &[(&str, usize)] = &[
    ("ZT Address", 13),
    ("Version", 13),
    ("Role", 13),
    ("Latency", 13),
];

/// 路径列表表头
pub const PATH_HEADER: &[(&str, usize)] = &[
    ("Active", 9),
    ("Address", 47),
    ("Expired", 10),
    ("Last Receive", 16),
    ("Last Send", 16),
    ("Preferred", 12),
    ("Trusted Path ID", 17),
];

// ========== 网络开关 ==========

/// 可在详情页切换的网络开关（zerotier-cli set 的 key, 显示名）
pub const NETWORK_FLAGS: &[(&str, &str)] = &[
    ("allowDefault", "Allow Default Route"),
    ("allowGlobal", "Allow Global IP"),
    ("allowManaged", "Allow Managed IP"),
    ("allowDNS", "Allow DNS"),
];

// ========== Shell 命令 ==========

pub mod shell {
    pub const BASH_PATH: &str = "bash";
    pub const BASH_CMD_FLAG: &str = "-c";
    pub const WINDOWS_OS: &str = "windows";
    pub const MACOS_OS: &str = "macos";
}
