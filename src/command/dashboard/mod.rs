pub mod app;
pub mod terminal;
pub mod ui;

use crate::config::YamlConfig;
use crate::zerotier::{InterfaceControl, SystemRunner, ZeroTierClient};
use crate::{debug_log, error};
use app::{Dashboard, handle_key};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use terminal::{CrosstermScreen, TuiRunner, with_screen};
use ui::draw_ui;

type DashRunner = TuiRunner<SystemRunner, CrosstermScreen>;

/// 不带子命令时启动的主界面
pub fn run(config: &YamlConfig) {
    if let Err(e) = run_internal(config) {
        error!("❌ TUI failed: {}", e);
    }
}

fn run_internal(config: &YamlConfig) -> io::Result<()> {
    let runner = TuiRunner::new(SystemRunner, CrosstermScreen);
    let mut app = Dashboard::new(
        ZeroTierClient::new(&runner, config.cli_program()),
        InterfaceControl::new(&runner, config.ip_program(), config.escalate_program()),
        &runner,
        config.central_url(),
    );
    app.refresh_networks();
    debug_log!(config, "loaded {} networks", app.networks.len());

    with_screen(&CrosstermScreen, || {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let looped = event_loop(&mut terminal, &mut app, &runner);
        let cursor = terminal.show_cursor();
        looped.and(cursor)
    })
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut Dashboard<'_, DashRunner>,
    runner: &DashRunner,
) -> io::Result<()> {
    loop {
        // 提权命令用过终端后，旧画面已失效
        if runner.take_redraw() {
            terminal.clear()?;
        }
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows 上会同时收到 Press 和 Release
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) {
                    return Ok(());
                }
            }
        }
    }
}
