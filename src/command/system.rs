use super::{open, render};
use crate::config::YamlConfig;
use crate::constants::{self, config_key, msg, section};
use crate::util::confirm;
use crate::zerotier::auth::{AuthTokenSetup, running_as_root};
use crate::zerotier::{CommandRunner, SystemRunner, ZeroTierClient, ZtError};
use crate::{debug_log, error, info, md, usage};

/// 启动检查的结论
#[derive(Debug, PartialEq, Eq)]
pub enum Preflight {
    /// 可以继续
    Ready,
    /// 用户拒绝授权，正常退出
    Declined,
    /// 无法继续，携带退出码
    Fatal(i32),
}

/// 复制 auth token 的结果
#[derive(Debug, PartialEq, Eq)]
pub enum TokenSetup {
    /// 已复制，或者本来就是 root
    Ready,
    /// 用户回答了否
    Declined,
    /// 提权或复制失败
    Failed,
}

/// 启动前检查 zerotier-cli 是否可用，必要时引导复制 auth token
///
/// root 表示当前是否以 root 运行，ask 用于 y/N 询问
pub fn preflight<R, F>(runner: &R, config: &YamlConfig, root: bool, ask: F) -> Preflight
where
    R: CommandRunner,
    F: Fn(&str) -> bool,
{
    let client = ZeroTierClient::new(runner, config.cli_program());
    match client.preflight() {
        Ok(()) => Preflight::Ready,
        Err(ZtError::NotInstalled(_)) => {
            error!("{}", msg::NOT_INSTALLED);
            Preflight::Fatal(1)
        }
        Err(ZtError::ServiceNotRunning) => {
            error!("{}", msg::NOT_RUNNING);
            Preflight::Fatal(1)
        }
        Err(ZtError::MissingAuthToken) => {
            error!("{}", msg::NO_ACCESS);
            match setup_token(runner, config, root, ask) {
                TokenSetup::Ready => Preflight::Ready,
                TokenSetup::Declined => Preflight::Declined,
                TokenSetup::Failed => Preflight::Fatal(1),
            }
        }
        Err(e) => {
            // 其他错误交给后续界面展示
            debug_log!(config, "preflight: {}", e);
            Preflight::Ready
        }
    }
}

/// 处理 setup-token 命令: ztui setup-token
pub fn handle_setup_token(config: &YamlConfig) {
    match setup_token(&SystemRunner, config, running_as_root(), confirm) {
        TokenSetup::Ready => info!("✅ auth token ready"),
        TokenSetup::Declined => info!("Cancelled"),
        TokenSetup::Failed => {}
    }
}

/// 复制 auth token，root 用户无需复制
pub fn setup_token<R, F>(runner: &R, config: &YamlConfig, root: bool, ask: F) -> TokenSetup
where
    R: CommandRunner,
    F: Fn(&str) -> bool,
{
    if root {
        return TokenSetup::Ready;
    }

    let setup = AuthTokenSetup::new(runner, config.escalate_program(), config.auth_secret());
    let username = match setup.username() {
        Ok(u) => u,
        Err(e) => {
            error!("❌ {}", e);
            return TokenSetup::Failed;
        }
    };

    if !ask(&AuthTokenSetup::<R>::prompt(&username)) {
        return TokenSetup::Declined;
    }

    let Some(home) = dirs::home_dir() else {
        error!("❌ could not determine the home folder");
        return TokenSetup::Failed;
    };

    match setup.install(&username, &home) {
        Ok(path) => {
            debug_log!(config, "auth token copied to {}", path.display());
            TokenSetup::Ready
        }
        Err(e) => {
            error!("❌ {}", e);
            TokenSetup::Failed
        }
    }
}

/// 处理 status 命令: ztui status
pub fn handle_status(config: &YamlConfig) {
    let runner = SystemRunner;
    let client = ZeroTierClient::new(&runner, config.cli_program());
    match client.status() {
        Ok(status) => {
            for line in render::status_lines(&status) {
                info!("{}", line);
            }
        }
        Err(e) => error!("❌ {}", e),
    }
}

/// 处理 central 命令: ztui central
pub fn handle_central(config: &YamlConfig) {
    let url = config.central_url();
    match open::open_url(&SystemRunner, url) {
        Ok(()) => info!("✅ opened {}", url),
        Err(e) => error!("💥 failed to open {}: {}", url, e),
    }
}

/// 处理 version 命令: ztui version
pub fn handle_version(config: &YamlConfig) {
    let text = format!(
        "# {} {}\n\n| | |\n|-|-|\n| ZeroTier CLI | `{}` |\n| OS | {} |\n| Config | `{}` |\n\n{} · {}\n",
        constants::APP_NAME,
        constants::VERSION,
        config.cli_program(),
        std::env::consts::OS,
        YamlConfig::data_dir().join(constants::CONFIG_FILE).display(),
        constants::CREDITS,
        constants::HOMEPAGE,
    );
    md!("{}", text);
}

/// 处理 log 命令: ztui log mode <verbose|concise>
pub fn handle_log(key: &str, value: &str, config: &mut YamlConfig) {
    if key == config_key::MODE {
        let mode = if value == config_key::VERBOSE {
            config_key::VERBOSE
        } else {
            config_key::CONCISE
        };
        config.set_property(section::LOG, config_key::MODE, mode);
        info!("✅ log mode: {}", mode);
    } else {
        usage!("ztui log mode <verbose|concise>");
    }
}

/// 处理 change 命令: ztui change <part> <field> <value>
/// 直接修改配置文件中的某个字段（如果字段不存在则新增）
pub fn handle_change(part: &str, field: &str, value: &str, config: &mut YamlConfig) {
    if config.get_section(part).is_none() {
        error!(
            "❌ unknown section: {} (expected one of {})",
            part,
            config.all_section_names().join(", ")
        );
        return;
    }

    let old_value = config.get_property(part, field).cloned();
    config.set_property(part, field, value);

    match old_value {
        Some(old) => info!("✅ {}.{} = {} (was {})", part, field, value, old),
        None => info!("✅ {}.{} = {}", part, field, value),
    }
}
