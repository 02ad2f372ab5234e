use crate::command::{network, open};
use crate::constants::{self, msg};
use crate::zerotier::interface::parse_link_state;
use crate::zerotier::{
    CommandRunner, InterfaceControl, LinkState, Network, NodeStatus, Peer, PeerPath,
    ZeroTierClient, ZtError,
};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

// ========== 数据结构 ==========

/// 列表中的一行网络，附带刷新时读到的网卡状态
#[derive(Debug, Clone)]
pub struct NetworkEntry {
    pub network: Network,
    pub link: Option<LinkState>,
}

impl NetworkEntry {
    pub fn is_down(&self) -> bool {
        self.link.as_ref().is_some_and(|l| l.is_down())
    }
}

/// 模态消息框
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub text: String,
    pub is_error: bool,
}

impl Popup {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            title: "Info".to_string(),
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            text: text.into(),
            is_error: true,
        }
    }
}

/// 网络详情页
#[derive(Debug, Clone)]
pub struct InfoView {
    pub network: Network,
    pub link: Option<LinkState>,
    /// 当前选中的开关（NETWORK_FLAGS 下标）
    pub flag_cursor: usize,
}

/// 节点路径页，按地址跟踪节点
#[derive(Debug, Clone)]
pub struct PathsView {
    pub address: String,
    pub paths: Vec<PeerPath>,
    /// 最近一次刷新时节点是否还存在
    pub found: bool,
    pub state: ListState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// 网络列表
    Normal,
    /// 输入要加入的网络 ID
    Joining,
    /// 确认离开网络
    ConfirmLeave,
    /// 网络详情
    NetworkInfo,
    /// 节点列表
    Peers,
    /// 节点路径
    Paths,
    /// 关于 / 节点状态
    About,
    /// 显示帮助
    Help,
}

// ========== TUI 应用状态 ==========

pub struct Dashboard<'a, R: CommandRunner> {
    client: ZeroTierClient<'a, R>,
    iface: InterfaceControl<'a, R>,
    runner: &'a R,
    central_url: String,

    pub mode: AppMode,
    pub networks: Vec<NetworkEntry>,
    pub state: ListState,
    pub peers: Vec<Peer>,
    pub peer_state: ListState,
    pub info: Option<InfoView>,
    pub paths: Option<PathsView>,
    pub status: Option<NodeStatus>,

    /// 输入缓冲区（加入网络时使用）
    pub input: String,
    pub cursor_pos: usize,
    /// 待确认离开的网络 ID
    pub pending_leave: Option<String>,
    /// 状态栏消息
    pub message: Option<String>,
    /// 模态消息框，任意键关闭
    pub popup: Option<Popup>,
    /// 最近一次刷新网络列表的时间
    pub refreshed_at: Option<String>,
}

impl<'a, R: CommandRunner> Dashboard<'a, R> {
    pub fn new(
        client: ZeroTierClient<'a, R>,
        iface: InterfaceControl<'a, R>,
        runner: &'a R,
        central_url: &str,
    ) -> Self {
        Self {
            client,
            iface,
            runner,
            central_url: central_url.to_string(),
            mode: AppMode::Normal,
            networks: Vec::new(),
            state: ListState::default(),
            peers: Vec::new(),
            peer_state: ListState::default(),
            info: None,
            paths: None,
            status: None,
            input: String::new(),
            cursor_pos: 0,
            pending_leave: None,
            message: None,
            popup: None,
            refreshed_at: None,
        }
    }

    // ========== 网络列表 ==========

    /// 重新获取网络列表，尽量保持原来的选中项
    pub fn refresh_networks(&mut self) {
        let selected_id = self.selected_network().map(|e| e.network.id.clone());

        let networks = match self.client.list_networks() {
            Ok(n) => n,
            Err(e) => {
                self.networks.clear();
                self.state.select(None);
                self.popup = Some(Popup::error(e.to_string()));
                return;
            }
        };
        // ip address 失败时只是不标红
        let ip_output = self.iface.snapshot().unwrap_or_default();

        self.networks = networks
            .into_iter()
            .map(|network| {
                let link = parse_link_state(&ip_output, &network.port_device_name);
                NetworkEntry { network, link }
            })
            .collect();

        let index = selected_id
            .and_then(|id| self.networks.iter().position(|e| e.network.id == id))
            .or(if self.networks.is_empty() { None } else { Some(0) });
        self.state.select(index);
        self.refreshed_at = Some(Local::now().format("%H:%M:%S").to_string());
    }

    pub fn selected_network(&self) -> Option<&NetworkEntry> {
        self.state.selected().and_then(|i| self.networks.get(i))
    }

    /// 选中的网络 ID，未选中时弹出提示
    fn require_selection(&mut self) -> Option<String> {
        match self.selected_network() {
            Some(entry) => Some(entry.network.id.clone()),
            None => {
                self.popup = Some(Popup::error(msg::NO_NETWORK));
                None
            }
        }
    }

    pub fn move_down(&mut self) {
        step(&mut self.state, self.networks.len(), true);
    }

    pub fn move_up(&mut self) {
        step(&mut self.state, self.networks.len(), false);
    }

    pub fn start_join(&mut self) {
        self.mode = AppMode::Joining;
        self.input.clear();
        self.cursor_pos = 0;
        self.message = None;
    }

    /// 提交输入框中的网络 ID，无论成败都刷新列表
    pub fn submit_join(&mut self) {
        let id = self.input.trim().to_string();
        let result = network::join_network(&self.client, &id);
        self.popup = Some(match result {
            Ok(()) => Popup::info(msg::JOIN_OK),
            Err(_) => Popup::error(msg::JOIN_INVALID),
        });
        self.input.clear();
        self.cursor_pos = 0;
        self.mode = AppMode::Normal;
        self.refresh_networks();
    }

    pub fn start_leave(&mut self) {
        if let Some(id) = self.require_selection() {
            self.pending_leave = Some(id);
            self.mode = AppMode::ConfirmLeave;
        }
    }

    pub fn confirm_leave(&mut self) {
        self.mode = AppMode::Normal;
        let Some(id) = self.pending_leave.take() else {
            return;
        };
        self.popup = Some(match self.client.leave(&id) {
            Ok(()) => Popup::info(msg::LEAVE_OK),
            Err(_) => Popup::error(msg::LEAVE_ERROR),
        });
        self.refresh_networks();
    }

    pub fn cancel_leave(&mut self) {
        self.pending_leave = None;
        self.mode = AppMode::Normal;
    }

    /// 切换选中网络的网卡 up/down
    pub fn toggle_interface(&mut self) {
        let Some(id) = self.require_selection() else {
            return;
        };
        match network::toggle_network(&self.client, &self.iface, &id) {
            Ok((device, target)) => {
                self.message = Some(format!("{} is now {}", device, target));
            }
            Err(e) => self.popup = Some(Popup::error(describe(&e))),
        }
        self.refresh_networks();
    }

    // ========== 网络详情 ==========

    pub fn open_info(&mut self) {
        let Some(id) = self.require_selection() else {
            return;
        };
        match self.load_info(&id, 0) {
            Ok(view) => {
                self.info = Some(view);
                self.mode = AppMode::NetworkInfo;
            }
            Err(e) => self.popup = Some(Popup::error(e.to_string())),
        }
    }

    fn load_info(&self, id: &str, flag_cursor: usize) -> Result<InfoView, ZtError> {
        let network = self.client.network(id)?;
        let link = self.iface.state(&network.port_device_name).ok();
        Ok(InfoView {
            network,
            link,
            flag_cursor,
        })
    }

    /// 重新读取详情，开关以守护进程的实际值为准
    pub fn reload_info(&mut self) {
        let Some((id, cursor)) = self
            .info
            .as_ref()
            .map(|v| (v.network.id.clone(), v.flag_cursor))
        else {
            return;
        };
        match self.load_info(&id, cursor) {
            Ok(view) => self.info = Some(view),
            Err(e) => {
                self.popup = Some(Popup::error(e.to_string()));
                self.close_info();
            }
        }
    }

    pub fn close_info(&mut self) {
        self.info = None;
        self.mode = AppMode::Normal;
        self.refresh_networks();
    }

    pub fn move_flag(&mut self, down: bool) {
        if let Some(view) = self.info.as_mut() {
            let count = constants::NETWORK_FLAGS.len();
            view.flag_cursor = if down {
                (view.flag_cursor + 1) % count
            } else {
                (view.flag_cursor + count - 1) % count
            };
        }
    }

    /// 翻转当前选中的开关并写回守护进程
    pub fn toggle_flag(&mut self) {
        let Some(view) = self.info.as_ref() else {
            return;
        };
        let (key, _) = constants::NETWORK_FLAGS[view.flag_cursor];
        let current = view.network.flag(key).unwrap_or(false);
        let id = view.network.id.clone();

        if let Err(e) = self.client.set_flag(&id, key, !current) {
            let detail = e.output().map(str::to_string).unwrap_or_else(|| e.to_string());
            self.popup = Some(Popup::error(format!("Error: \"{}\"", detail)));
        }
        self.reload_info();
    }

    // ========== 节点 / 路径 ==========

    pub fn open_peers(&mut self) {
        self.mode = AppMode::Peers;
        self.refresh_peers();
    }

    pub fn refresh_peers(&mut self) {
        let selected = self
            .selected_peer()
            .map(|p| p.address.clone());
        match self.client.list_peers() {
            Ok(peers) => {
                self.peers = peers;
                let index = selected
                    .and_then(|a| self.peers.iter().position(|p| p.address == a))
                    .or(if self.peers.is_empty() { None } else { Some(0) });
                self.peer_state.select(index);
            }
            Err(e) => {
                self.peers.clear();
                self.peer_state.select(None);
                self.popup = Some(Popup::error(e.to_string()));
            }
        }
    }

    pub fn selected_peer(&self) -> Option<&Peer> {
        self.peer_state.selected().and_then(|i| self.peers.get(i))
    }

    pub fn open_paths(&mut self) {
        let Some(address) = self.selected_peer().map(|p| p.address.clone()) else {
            self.popup = Some(Popup::error(msg::NO_PEER));
            return;
        };
        self.paths = Some(PathsView {
            address,
            paths: Vec::new(),
            found: true,
            state: ListState::default(),
        });
        self.mode = AppMode::Paths;
        self.refresh_paths();
    }

    /// 重新获取节点并按地址找回，节点已消失时清空列表
    pub fn refresh_paths(&mut self) {
        let Some(address) = self.paths.as_ref().map(|v| v.address.clone()) else {
            return;
        };
        let result = self.client.peer(&address);
        let Some(view) = self.paths.as_mut() else {
            return;
        };
        match result {
            Ok(Some(peer)) => {
                view.found = true;
                view.paths = peer.paths;
            }
            Ok(None) => {
                view.found = false;
                view.paths.clear();
            }
            Err(e) => {
                view.paths.clear();
                self.popup = Some(Popup::error(e.to_string()));
            }
        }
        let index = if view.paths.is_empty() { None } else { Some(0) };
        view.state.select(index);
    }

    pub fn close_paths(&mut self) {
        self.paths = None;
        self.mode = AppMode::Peers;
    }

    // ========== 关于 ==========

    pub fn open_about(&mut self) {
        match self.client.status() {
            Ok(status) => {
                self.status = Some(status);
                self.mode = AppMode::About;
            }
            Err(e) => self.popup = Some(Popup::error(e.to_string())),
        }
    }

    pub fn open_central(&mut self) {
        match open::open_url(self.runner, &self.central_url) {
            Ok(()) => self.message = Some(format!("Opened {}", self.central_url)),
            Err(e) => self.popup = Some(Popup::error(e.to_string())),
        }
    }

    /// 当前界面中最适合复制的内容（网络 ID / 节点地址）
    pub fn copy_target(&self) -> Option<String> {
        match self.mode {
            AppMode::Normal => self.selected_network().map(|e| e.network.id.clone()),
            AppMode::NetworkInfo => self.info.as_ref().map(|v| v.network.id.clone()),
            AppMode::Peers => self.selected_peer().map(|p| p.address.clone()),
            AppMode::Paths => self.paths.as_ref().map(|v| v.address.clone()),
            AppMode::About => self.status.as_ref().map(|s| s.address.clone()),
            _ => None,
        }
    }

    pub fn copy_selected(&mut self) {
        if let Some(text) = self.copy_target() {
            self.message = Some(if open::copy_to_clipboard(&text) {
                format!("📋 Copied {}", text)
            } else {
                "❌ Failed to copy to clipboard".to_string()
            });
        }
    }
}

/// 在 len 个元素中循环移动选中项
fn step(state: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if down => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    state.select(Some(i));
}

/// 提权失败时优先展示命令输出
fn describe(e: &ZtError) -> String {
    match e.output() {
        Some(out) if !out.is_empty() => out.to_string(),
        _ => e.to_string(),
    }
}

// ========== 按键处理 ==========

/// 处理一次按键，返回 true 表示退出
pub fn handle_key<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // 消息框打开时，任意键关闭
    if app.popup.is_some() {
        app.popup = None;
        return false;
    }

    match app.mode {
        AppMode::Normal => return handle_normal_mode(app, key),
        AppMode::Joining => handle_input_mode(app, key),
        AppMode::ConfirmLeave => handle_confirm_leave(app, key),
        AppMode::NetworkInfo => handle_info_mode(app, key),
        AppMode::Peers => handle_peers_mode(app, key),
        AppMode::Paths => handle_paths_mode(app, key),
        AppMode::About => handle_about_mode(app, key),
        AppMode::Help => app.mode = AppMode::Normal,
    }
    false
}

/// 正常模式按键处理，返回 true 表示退出
pub fn handle_normal_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Char('r') | KeyCode::F(5) => {
            app.refresh_networks();
            app.message = Some("Networks refreshed".to_string());
        }
        KeyCode::Char('a') => app.start_join(),
        KeyCode::Char('d') => app.start_leave(),
        KeyCode::Char('t') => app.toggle_interface(),
        KeyCode::Enter | KeyCode::Char('i') => app.open_info(),
        KeyCode::Char('p') => app.open_peers(),
        KeyCode::Char('s') => app.open_about(),
        KeyCode::Char('c') => app.open_central(),
        KeyCode::Char('y') => app.copy_selected(),
        KeyCode::Char('?') => app.mode = AppMode::Help,
        _ => {}
    }
    false
}

/// 输入模式按键处理（支持光标移动和行内编辑）
pub fn handle_input_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    let char_count = app.input.chars().count();

    match key.code {
        KeyCode::Enter => app.submit_join(),
        KeyCode::Esc => {
            app.mode = AppMode::Normal;
            app.input.clear();
            app.cursor_pos = 0;
            app.message = Some("Cancelled".to_string());
        }
        KeyCode::Left => app.cursor_pos = app.cursor_pos.saturating_sub(1),
        KeyCode::Right => {
            if app.cursor_pos < char_count {
                app.cursor_pos += 1;
            }
        }
        KeyCode::Home => app.cursor_pos = 0,
        KeyCode::End => app.cursor_pos = char_count,
        KeyCode::Backspace => {
            if app.cursor_pos > 0 {
                let idx = byte_index(&app.input, app.cursor_pos - 1);
                app.input.remove(idx);
                app.cursor_pos -= 1;
            }
        }
        KeyCode::Delete => {
            if app.cursor_pos < char_count {
                let idx = byte_index(&app.input, app.cursor_pos);
                app.input.remove(idx);
            }
        }
        KeyCode::Char(c) => {
            let idx = byte_index(&app.input, app.cursor_pos);
            app.input.insert(idx, c);
            app.cursor_pos += 1;
        }
        _ => {}
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// 确认离开按键处理
pub fn handle_confirm_leave<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_leave(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_leave(),
        _ => {}
    }
}

pub fn handle_info_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_info(),
        KeyCode::Down | KeyCode::Char('j') => app.move_flag(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_flag(false),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_flag(),
        KeyCode::Char('r') => app.reload_info(),
        KeyCode::Char('y') => app.copy_selected(),
        _ => {}
    }
}

pub fn handle_peers_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.mode = AppMode::Normal;
            app.peers.clear();
            app.peer_state.select(None);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.peers.len();
            step(&mut app.peer_state, len, true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let len = app.peers.len();
            step(&mut app.peer_state, len, false);
        }
        KeyCode::Char('r') => app.refresh_peers(),
        KeyCode::Enter | KeyCode::Char('p') => app.open_paths(),
        KeyCode::Char('y') => app.copy_selected(),
        _ => {}
    }
}

pub fn handle_paths_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_paths(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Up | KeyCode::Char('k') => {
            if let Some(view) = app.paths.as_mut() {
                let down = matches!(key.code, KeyCode::Down | KeyCode::Char('j'));
                let len = view.paths.len();
                step(&mut view.state, len, down);
            }
        }
        KeyCode::Char('r') => app.refresh_paths(),
        KeyCode::Char('y') => app.copy_selected(),
        _ => {}
    }
}

pub fn handle_about_mode<R: CommandRunner>(app: &mut Dashboard<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.copy_selected(),
        KeyCode::Char('c') => app.open_central(),
        _ => app.mode = AppMode::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zerotier::runner::fake::{FakeRunner, Reply};

    const NETWORKS: &str = r#"[
        {"id": "aaaa000000000001", "name": "home", "status": "OK", "portDeviceName": "zt0",
         "allowDefault": false, "allowGlobal": false, "allowManaged": true, "allowDNS": false,
         "assignedAddresses": ["10.0.0.2/24"]},
        {"id": "bbbb000000000002", "name": "", "status": "OK", "portDeviceName": "zt1",
         "allowManaged": true}
    ]"#;
    const ONE_NETWORK: &str = r#"[{"id": "bbbb000000000002", "portDeviceName": "zt1"}]"#;
    const NETWORKS_DEFAULT_ON: &str = r#"[
        {"id": "aaaa000000000001", "name": "home", "status": "OK", "portDeviceName": "zt0",
         "allowDefault": true, "allowManaged": true}
    ]"#;
    const IP: &str = "\
3: zt0: <BROADCAST,MULTICAST,UP> mtu 2800 qdisc fq_codel state UNKNOWN group default
4: zt1: <BROADCAST,MULTICAST> mtu 2800 qdisc fq_codel state DOWN group default
";
    const PEERS: &str = r#"[
        {"address": "1111111111", "version": "1.10.6", "role": "LEAF", "latency": 5,
         "paths": [{"active": true, "address": "1.2.3.4/9993", "preferred": true}]},
        {"address": "2222222222", "version": "-1.-1.-1", "role": "PLANET", "latency": 80,
         "paths": []}
    ]"#;
    const PEERS_REORDERED: &str = r#"[
        {"address": "2222222222", "role": "PLANET", "paths": []},
        {"address": "1111111111", "role": "LEAF",
         "paths": [{"address": "5.6.7.8/9993"}, {"address": "9.9.9.9/9993"}]}
    ]"#;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard(runner: &FakeRunner) -> Dashboard<'_, FakeRunner> {
        Dashboard::new(
            ZeroTierClient::new(runner, "zerotier-cli"),
            InterfaceControl::new(runner, "ip", "pkexec"),
            runner,
            "https://my.zerotier.com",
        )
    }

    fn loaded(runner: &FakeRunner) -> Dashboard<'_, FakeRunner> {
        let mut app = dashboard(runner);
        app.refresh_networks();
        app
    }

    #[test]
    fn refresh_marks_down_interfaces() {
        let runner = FakeRunner::new(vec![Reply::Ok(NETWORKS), Reply::Ok(IP)]);
        let app = loaded(&runner);
        assert_eq!(app.networks.len(), 2);
        assert!(!app.networks[0].is_down());
        assert!(app.networks[1].is_down());
        assert_eq!(app.state.selected(), Some(0));
        assert!(app.refreshed_at.is_some());
    }

    #[test]
    fn refresh_survives_ip_failure() {
        let runner = FakeRunner::new(vec![Reply::Ok(NETWORKS), Reply::Fail("ip: not permitted")]);
        let app = loaded(&runner);
        assert_eq!(app.networks.len(), 2);
        assert!(app.networks.iter().all(|e| !e.is_down()));
        assert!(app.popup.is_none());
    }

    #[test]
    fn refresh_failure_shows_popup() {
        let runner = FakeRunner::new(vec![Reply::Fail("Error connecting to the ZeroTier service")]);
        let app = loaded(&runner);
        assert!(app.networks.is_empty());
        assert!(app.popup.as_ref().is_some_and(|p| p.is_error));
    }

    #[test]
    fn refresh_keeps_selection_by_id() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Ok(ONE_NETWORK),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        app.move_down();
        app.refresh_networks();
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(
            app.selected_network().map(|e| e.network.id.as_str()),
            Some("bbbb000000000002")
        );
    }

    #[test]
    fn selection_wraps() {
        let runner = FakeRunner::new(vec![Reply::Ok(NETWORKS), Reply::Ok(IP)]);
        let mut app = loaded(&runner);
        app.move_up();
        assert_eq!(app.state.selected(), Some(1));
        app.move_down();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn actions_without_selection_warn() {
        let runner = FakeRunner::new(vec![Reply::Ok("[]"), Reply::Ok("")]);
        let mut app = loaded(&runner);
        for code in [KeyCode::Char('d'), KeyCode::Char('t'), KeyCode::Enter] {
            handle_key(&mut app, key(code));
            assert_eq!(app.popup, Some(Popup::error(msg::NO_NETWORK)));
            // 任意键关闭消息框
            handle_key(&mut app, key(KeyCode::Char('x')));
            assert!(app.popup.is_none());
        }
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn join_flow() {
        let runner = FakeRunner::new(vec![
            Reply::Ok("[]"),
            Reply::Ok(""),
            Reply::Ok("200 join OK"),
            Reply::Ok(ONE_NETWORK),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.mode, AppMode::Joining);
        for c in "bbbb000000000002".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.popup, Some(Popup::info(msg::JOIN_OK)));
        assert_eq!(app.networks.len(), 1);
        assert!(runner.calls().contains(&"zerotier-cli join bbbb000000000002".to_string()));
    }

    #[test]
    fn failed_join_says_invalid_and_still_refreshes() {
        let runner = FakeRunner::new(vec![
            Reply::Ok("[]"),
            Reply::Ok(""),
            Reply::Fail("invalid network id"),
            Reply::Ok("[]"),
            Reply::Ok(""),
        ]);
        let mut app = loaded(&runner);
        app.start_join();
        app.input = "nope".into();
        app.submit_join();
        assert_eq!(app.popup, Some(Popup::error(msg::JOIN_INVALID)));
        assert_eq!(runner.calls().len(), 5);
    }

    #[test]
    fn empty_join_is_rejected_locally() {
        let runner = FakeRunner::new(vec![Reply::Ok("[]"), Reply::Ok(""), Reply::Ok("[]"), Reply::Ok("")]);
        let mut app = loaded(&runner);
        app.start_join();
        app.submit_join();
        assert_eq!(app.popup, Some(Popup::error(msg::JOIN_INVALID)));
        assert!(!runner.calls().iter().any(|c| c.contains(" join")));
    }

    #[test]
    fn input_editing() {
        let runner = FakeRunner::new(vec![]);
        let mut app = dashboard(&runner);
        app.start_join();
        for c in "abd".chars() {
            handle_input_mode(&mut app, key(KeyCode::Char(c)));
        }
        handle_input_mode(&mut app, key(KeyCode::Left));
        handle_input_mode(&mut app, key(KeyCode::Char('c')));
        assert_eq!(app.input, "abcd");
        handle_input_mode(&mut app, key(KeyCode::Home));
        handle_input_mode(&mut app, key(KeyCode::Delete));
        handle_input_mode(&mut app, key(KeyCode::End));
        handle_input_mode(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "bc");
        handle_input_mode(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn leave_declined_runs_nothing() {
        let runner = FakeRunner::new(vec![Reply::Ok(NETWORKS), Reply::Ok(IP)]);
        let mut app = loaded(&runner);
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::ConfirmLeave);
        assert_eq!(app.pending_leave.as_deref(), Some("aaaa000000000001"));
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn leave_confirmed() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Ok("200 leave OK"),
            Reply::Ok(ONE_NETWORK),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        handle_key(&mut app, key(KeyCode::Char('d')));
        handle_key(&mut app, key(KeyCode::Char('y')));
        assert_eq!(app.popup, Some(Popup::info(msg::LEAVE_OK)));
        assert_eq!(runner.calls()[2], "zerotier-cli leave aaaa000000000001");
        assert_eq!(app.networks.len(), 1);
    }

    #[test]
    fn leave_failure_says_error() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Fail("boom"),
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        app.start_leave();
        app.confirm_leave();
        assert_eq!(app.popup, Some(Popup::error(msg::LEAVE_ERROR)));
    }

    #[test]
    fn toggle_brings_selected_interface_up() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            // toggle: 重新获取网络、查询状态、提权切换
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Ok(""),
            // 刷新
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        app.move_down();
        handle_key(&mut app, key(KeyCode::Char('t')));
        assert_eq!(runner.calls()[4], "pkexec ip link set zt1 up");
        // 只有提权命令会让出终端
        assert_eq!(runner.escalated(), vec!["pkexec ip link set zt1 up"]);
        assert_eq!(app.message.as_deref(), Some("zt1 is now up"));
    }

    #[test]
    fn toggle_failure_shows_escalation_output() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Fail("Error executing command as another user: Request dismissed"),
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        app.toggle_interface();
        assert_eq!(
            app.popup.map(|p| p.text),
            Some("Error executing command as another user: Request dismissed".to_string())
        );
    }

    #[test]
    fn info_flag_toggle_round_trip() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            // 打开详情
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            // set allowDefault=1 后重新读取
            Reply::Ok(""),
            Reply::Ok(NETWORKS_DEFAULT_ON),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::NetworkInfo);
        let view = app.info.as_ref().unwrap();
        assert_eq!(view.link, Some(LinkState("UNKNOWN".into())));
        assert!(!view.network.allow_default);

        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(runner.calls()[4], "zerotier-cli set aaaa000000000001 allowDefault=1");
        assert!(app.info.as_ref().unwrap().network.allow_default);
        assert!(app.popup.is_none());
    }

    #[test]
    fn info_flag_error_is_quoted() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
            Reply::Fail("400 set <nwid> <setting> <value>\n"),
            Reply::Ok(NETWORKS),
            Reply::Ok(IP),
        ]);
        let mut app = loaded(&runner);
        app.open_info();
        app.move_flag(false);
        assert_eq!(app.info.as_ref().unwrap().flag_cursor, 3);
        app.toggle_flag();
        assert_eq!(runner.calls()[4], "zerotier-cli set aaaa000000000001 allowDNS=1");
        assert_eq!(
            app.popup.map(|p| p.text),
            Some("Error: \"400 set <nwid> <setting> <value>\"".to_string())
        );
        // 开关保持守护进程的值
        assert!(!app.info.as_ref().unwrap().network.allow_dns);
    }

    #[test]
    fn peers_and_paths_follow_address() {
        let runner = FakeRunner::new(vec![
            Reply::Ok(PEERS),
            // 打开路径
            Reply::Ok(PEERS),
            // 刷新路径，节点顺序已变化
            Reply::Ok(PEERS_REORDERED),
            // 再次刷新，节点已消失
            Reply::Ok("[]"),
        ]);
        let mut app = dashboard(&runner);
        handle_key(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.mode, AppMode::Peers);
        assert_eq!(app.peers.len(), 2);

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Paths);
        let view = app.paths.as_ref().unwrap();
        assert_eq!(view.address, "1111111111");
        assert_eq!(view.paths.len(), 1);

        handle_key(&mut app, key(KeyCode::Char('r')));
        let view = app.paths.as_ref().unwrap();
        assert_eq!(view.paths.len(), 2);
        assert_eq!(view.paths[0].address, "5.6.7.8/9993");

        handle_key(&mut app, key(KeyCode::Char('r')));
        let view = app.paths.as_ref().unwrap();
        assert!(!view.found);
        assert!(view.paths.is_empty());

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Peers);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn paths_without_peer_selected() {
        let runner = FakeRunner::new(vec![Reply::Ok("[]")]);
        let mut app = dashboard(&runner);
        app.open_peers();
        app.open_paths();
        assert_eq!(app.popup, Some(Popup::error(msg::NO_PEER)));
        assert_eq!(app.mode, AppMode::Peers);
    }

    #[test]
    fn central_is_launched_not_awaited() {
        let runner = FakeRunner::new(vec![Reply::Ok("")]);
        let mut app = dashboard(&runner);
        handle_key(&mut app, key(KeyCode::Char('c')));
        let launched = runner.launched();
        assert_eq!(launched.len(), 1);
        assert!(launched[0].ends_with("https://my.zerotier.com"));
        assert_eq!(
            app.message.as_deref(),
            Some("Opened https://my.zerotier.com")
        );
    }

    #[test]
    fn about_shows_status() {
        let runner = FakeRunner::new(vec![Reply::Ok("200 info 1a2b3c4d5e 1.10.6 ONLINE")]);
        let mut app = dashboard(&runner);
        handle_key(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.mode, AppMode::About);
        assert_eq!(app.copy_target().as_deref(), Some("1a2b3c4d5e"));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn quit_keys() {
        let runner = FakeRunner::new(vec![]);
        let mut app = dashboard(&runner);
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))));
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        app.mode = AppMode::Help;
        assert!(!handle_key(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
