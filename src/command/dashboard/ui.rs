use super::app::{AppMode, Dashboard, Popup};
use crate::command::render;
use crate::constants;
use crate::util::text::{split_input_at_cursor, truncate_to_width};
use crate::zerotier::CommandRunner;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

fn highlight() -> Style {
    Style::default()
        .bg(Color::Indexed(24))
        .add_modifier(Modifier::BOLD)
}

fn bordered(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

/// 绘制 TUI 界面
pub fn draw_ui<R: CommandRunner>(f: &mut ratatui::Frame, app: &mut Dashboard<'_, R>) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(size);

    // ========== 标题栏 ==========
    let down = app.networks.iter().filter(|e| e.is_down()).count();
    let mut title = format!(
        " 🌐 {} | {} networks | {} down ",
        constants::APP_TITLE,
        app.networks.len(),
        down
    );
    if let Some(at) = &app.refreshed_at {
        title.push_str(&format!("| refreshed {} ", at));
    }
    let title_block = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title_block, chunks[0]);

    // ========== 主区域 ==========
    match app.mode {
        AppMode::Help => draw_help(f, chunks[1]),
        AppMode::NetworkInfo => draw_info(f, app, chunks[1]),
        AppMode::Peers => draw_peers(f, app, chunks[1]),
        AppMode::Paths => draw_paths(f, app, chunks[1]),
        AppMode::About => draw_about(f, app, chunks[1]),
        AppMode::Normal | AppMode::Joining | AppMode::ConfirmLeave => {
            draw_networks(f, app, chunks[1])
        }
    }

    // ========== 状态/输入栏 ==========
    match app.mode {
        AppMode::Joining => {
            let (before, cursor_ch, after) = split_input_at_cursor(&app.input, app.cursor_pos);
            let input_widget = Paragraph::new(Line::from(vec![
                Span::styled(" Network ID: ", Style::default().fg(Color::Green)),
                Span::raw(before),
                Span::styled(
                    cursor_ch,
                    Style::default().fg(Color::Black).bg(Color::White),
                ),
                Span::raw(after),
            ]))
            .block(bordered(
                " Join Network (Enter join / Esc cancel) ",
                Color::Green,
            ));
            f.render_widget(input_widget, chunks[2]);
        }
        AppMode::ConfirmLeave => {
            let id = app.pending_leave.as_deref().unwrap_or_default();
            let confirm_widget = Paragraph::new(Line::from(Span::styled(
                format!(" Are you sure you want to leave {}? (y / n)", id),
                Style::default().fg(Color::Red),
            )))
            .block(bordered(" ⚠️ Leave Network ", Color::Red));
            f.render_widget(confirm_widget, chunks[2]);
        }
        _ => {
            let inner_width = chunks[2].width.saturating_sub(2) as usize;
            let msg = truncate_to_width(
                app.message.as_deref().unwrap_or("Press ? for help"),
                inner_width,
            );
            let status_widget = Paragraph::new(Line::from(Span::styled(
                msg,
                Style::default().fg(Color::Gray),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(status_widget, chunks[2]);
        }
    }

    // ========== 帮助栏 ==========
    let help_text = match app.mode {
        AppMode::Normal => {
            " ↑↓ move | a join | d leave | t toggle | Enter info | p peers | s about | c central | y copy | r refresh | ? help | q quit"
        }
        AppMode::Joining => " Enter join | Esc cancel | ←→ move cursor | Home/End",
        AppMode::ConfirmLeave => " y leave | n/Esc cancel",
        AppMode::NetworkInfo => " ↑↓ select | Space/Enter toggle | y copy ID | r refresh | Esc back",
        AppMode::Peers => " ↑↓ move | Enter/p paths | y copy address | r refresh | Esc back",
        AppMode::Paths => " ↑↓ move | y copy address | r refresh | Esc back",
        AppMode::About => " y copy address | c central | any other key back",
        AppMode::Help => " any key back",
    };
    let help_widget = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(help_widget, chunks[3]);

    // ========== 消息框 ==========
    if let Some(popup) = &app.popup {
        draw_popup(f, popup, size);
    }
}

/// 表头 + 列表
fn table_chunks(area: Rect) -> (Rect, Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    (parts[0], parts[1])
}

fn draw_header(f: &mut ratatui::Frame, columns: &[(&str, usize)], area: Rect) {
    // 与列表内容对齐：边框 1 列 + 高亮符号 3 列
    let header = Paragraph::new(Line::from(Span::styled(
        format!("    {}", render::header(columns)),
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(header, area);
}

fn draw_networks<R: CommandRunner>(f: &mut ratatui::Frame, app: &mut Dashboard<'_, R>, area: Rect) {
    let (header_area, list_area) = table_chunks(area);
    draw_header(f, constants::NETWORK_HEADER, header_area);

    let block = bordered(" Joined Networks ", Color::White);
    if app.networks.is_empty() {
        let empty_hint = List::new(vec![ListItem::new(Line::from(Span::styled(
            "   (none) press a to join a network...",
            Style::default().fg(Color::DarkGray),
        )))])
        .block(block);
        f.render_widget(empty_hint, list_area);
        return;
    }

    let items: Vec<ListItem> = app
        .networks
        .iter()
        .map(|entry| {
            let style = if entry.is_down() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                render::network_row(&entry.network),
                style,
            )))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(highlight())
        .highlight_symbol(" ▶ ");
    f.render_stateful_widget(list_widget, list_area, &mut app.state);
}

fn draw_info<R: CommandRunner>(f: &mut ratatui::Frame, app: &Dashboard<'_, R>, area: Rect) {
    let Some(view) = &app.info else {
        return;
    };

    let mut lines: Vec<Line> = render::network_info_lines(&view.network, view.link.as_ref())
        .into_iter()
        .map(Line::from)
        .collect();
    lines.push(Line::from(""));
    for (i, (key, label)) in constants::NETWORK_FLAGS.iter().enumerate() {
        let enabled = view.network.flag(key).unwrap_or(false);
        let text = render::flag_line(label, enabled);
        let line = if i == view.flag_cursor {
            Line::from(Span::styled(format!("▶ {}", text), highlight()))
        } else {
            Line::from(Span::raw(format!("  {}", text)))
        };
        lines.push(line);
    }

    let title = format!(" Network {} ", view.network.id);
    let widget = Paragraph::new(lines)
        .block(bordered(&title, Color::Cyan))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn draw_peers<R: CommandRunner>(f: &mut ratatui::Frame, app: &mut Dashboard<'_, R>, area: Rect) {
    let (header_area, list_area) = table_chunks(area);
    draw_header(f, constants::PEER_HEADER, header_area);

    let items: Vec<ListItem> = app
        .peers
        .iter()
        .map(|peer| ListItem::new(render::peer_row(peer)))
        .collect();
    let list_widget = List::new(items)
        .block(bordered(" Peers ", Color::White))
        .highlight_style(highlight())
        .highlight_symbol(" ▶ ");
    f.render_stateful_widget(list_widget, list_area, &mut app.peer_state);
}

fn draw_paths<R: CommandRunner>(f: &mut ratatui::Frame, app: &mut Dashboard<'_, R>, area: Rect) {
    let Some(view) = app.paths.as_mut() else {
        return;
    };
    let (header_area, list_area) = table_chunks(area);
    draw_header(f, constants::PATH_HEADER, header_area);

    let title = format!(" Paths of {} ", view.address);
    let block = bordered(&title, Color::White);

    if !view.found {
        let gone = Paragraph::new(Line::from(Span::styled(
            format!("   peer {} is no longer known", view.address),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(gone, list_area);
        return;
    }

    let items: Vec<ListItem> = view
        .paths
        .iter()
        .map(|path| ListItem::new(render::path_row(path)))
        .collect();
    let list_widget = List::new(items)
        .block(block)
        .highlight_style(highlight())
        .highlight_symbol(" ▶ ");
    f.render_stateful_widget(list_widget, list_area, &mut view.state);
}

fn draw_about<R: CommandRunner>(f: &mut ratatui::Frame, app: &Dashboard<'_, R>, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        lines.extend(render::status_lines(status).into_iter().map(Line::from));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} {}", constants::APP_NAME, constants::VERSION),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(constants::CREDITS));
    lines.push(Line::from(Span::styled(
        constants::HOMEPAGE,
        Style::default().fg(Color::Blue),
    )));

    let widget = Paragraph::new(lines).block(bordered(" About ", Color::Cyan));
    f.render_widget(widget, area);
}

fn draw_help(f: &mut ratatui::Frame, area: Rect) {
    let keys: &[(&str, &str)] = &[
        ("↓ / j", "move down"),
        ("↑ / k", "move up"),
        ("a", "join a network"),
        ("d", "leave the selected network (asks first)"),
        ("t", "bring the network interface up / down"),
        ("Enter / i", "network info and route settings"),
        ("p", "peers, Enter on a peer shows its paths"),
        ("s", "node status"),
        ("c", "open ZeroTier Central in the browser"),
        ("y", "copy the selected ID / address"),
        ("r / F5", "refresh"),
        ("q / Esc", "quit"),
        ("Ctrl+C", "quit from anywhere"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled(
            "  📖 Keys",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    help_lines.extend(keys.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("  {:<13}", key), Style::default().fg(Color::Yellow)),
            Span::raw(*desc),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "  Red rows are networks whose interface is down.",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(
        Paragraph::new(help_lines).block(bordered(" Help ", Color::Cyan)),
        area,
    );
}

fn draw_popup(f: &mut ratatui::Frame, popup: &Popup, area: Rect) {
    let rect = centered_rect(50, 25, area);
    let color = if popup.is_error {
        Color::Red
    } else {
        Color::Green
    };
    let title = format!(" {} ", popup.title);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            popup.text.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(ratatui::layout::Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(bordered(&title, color));

    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zerotier::runner::fake::{FakeRunner, Reply};
    use crate::zerotier::{InterfaceControl, ZeroTierClient};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    const NETWORKS: &str = r#"[
        {"id": "aaaa000000000001", "name": "home", "status": "OK", "portDeviceName": "zt0"},
        {"id": "bbbb000000000002", "name": "lab", "status": "OK", "portDeviceName": "zt1"}
    ]"#;
    const IP: &str = "4: zt1: <BROADCAST,MULTICAST> mtu 2800 state DOWN group default\n";

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw<R: CommandRunner>(app: &mut Dashboard<'_, R>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn dashboard(runner: &FakeRunner) -> Dashboard<'_, FakeRunner> {
        Dashboard::new(
            ZeroTierClient::new(runner, "zerotier-cli"),
            InterfaceControl::new(runner, "ip", "pkexec"),
            runner,
            "https://my.zerotier.com",
        )
    }

    #[test]
    fn down_rows_are_red() {
        let runner = FakeRunner::new(vec![Reply::Ok(NETWORKS), Reply::Ok(IP)]);
        let mut app = dashboard(&runner);
        app.refresh_networks();
        let buffer = draw(&mut app);
        let text = buffer_text(&buffer);
        assert!(text.contains("1 down"));
        assert!(text.contains("aaaa000000000001 | home"));

        let row = (0..buffer.area.height)
            .find(|&y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .contains("bbbb000000000002")
            })
            .unwrap();
        let x = (0..buffer.area.width)
            .find(|&x| buffer[(x, row)].symbol() == "b")
            .unwrap();
        assert_eq!(buffer[(x, row)].fg, Color::Red);
    }

    #[test]
    fn empty_list_hint() {
        let runner = FakeRunner::new(vec![Reply::Ok("[]"), Reply::Ok("")]);
        let mut app = dashboard(&runner);
        app.refresh_networks();
        let text = buffer_text(&draw(&mut app));
        assert!(text.contains("press a to join"));
    }

    #[test]
    fn popup_is_drawn_on_top() {
        let runner = FakeRunner::new(vec![]);
        let mut app = dashboard(&runner);
        app.popup = Some(Popup::error(constants::msg::NO_NETWORK));
        let text = buffer_text(&draw(&mut app));
        assert!(text.contains(constants::msg::NO_NETWORK));
        assert!(text.contains("press any key"));
    }

    #[test]
    fn join_prompt_shows_input() {
        let runner = FakeRunner::new(vec![]);
        let mut app = dashboard(&runner);
        app.start_join();
        app.input = "8056c2e2".into();
        app.cursor_pos = 8;
        let text = buffer_text(&draw(&mut app));
        assert!(text.contains("Network ID: 8056c2e2"));
    }

    #[test]
    fn help_lists_keys() {
        let runner = FakeRunner::new(vec![]);
        let mut app = dashboard(&runner);
        app.mode = AppMode::Help;
        let text = buffer_text(&draw(&mut app));
        assert!(text.contains("join a network"));
        assert!(text.contains("any key back"));
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(50, 25, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 25);
    }
}
