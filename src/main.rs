mod cli;
mod command;
mod config;
mod constants;
mod util;
mod zerotier;

use clap::Parser;
use cli::Cli;
use command::system::{Preflight, preflight};
use config::YamlConfig;
use util::confirm;
use zerotier::SystemRunner;
use zerotier::auth::running_as_root;

fn main() {
    // 加载配置
    let mut config = YamlConfig::load();

    let verbose = config.is_verbose();
    let start = if verbose {
        Some(std::time::Instant::now())
    } else {
        None
    };

    let cli = Cli::parse();

    // 需要守护进程的操作先做启动检查
    let needs_daemon = cli.command.as_ref().is_none_or(|c| c.needs_daemon());
    if needs_daemon {
        match preflight(&SystemRunner, &config, running_as_root(), confirm) {
            Preflight::Ready => {}
            Preflight::Declined => return,
            Preflight::Fatal(code) => std::process::exit(code),
        }
    }

    match cli.command {
        Some(subcmd) => command::dispatch(subcmd, &mut config),
        // 无参数：进入全屏界面
        None => command::dashboard::run(&config),
    }

    if let Some(start) = start {
        let elapsed = start.elapsed();
        debug_log!(config, "duration: {} ms", elapsed.as_millis());
    }
}
