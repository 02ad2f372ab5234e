//! 终端输出宏，子命令用它们打印结果；全屏界面内改用状态栏和消息框

/// 打印普通信息
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        println!($($arg)*)
    }};
}

/// 打印警告（不影响后续流程）
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprint!("{}", "[WARN] ".yellow());
        eprintln!($($arg)*)
    }};
}

/// 打印错误信息
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprint!("{}", "[ERROR] ".red());
        eprintln!($($arg)*)
    }};
}

/// 打印 usage 提示
#[macro_export]
macro_rules! usage {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        print!("{}", "💡 Usage: ".green());
        println!($($arg)*)
    }};
}

/// verbose 模式下带时间戳输出到 stderr，不干扰 stdout 的表格
#[macro_export]
macro_rules! debug_log {
    ($config:expr, $($arg:tt)*) => {{
        if $config.is_verbose() {
            use colored::Colorize;
            eprint!("{} ", $crate::util::log::debug_prefix().dimmed());
            eprintln!($($arg)*)
        }
    }};
}

/// 在终端中渲染 Markdown 文本
#[macro_export]
macro_rules! md {
    ($($arg:tt)*) => {{
        let text = format!($($arg)*);
        $crate::util::log::render_markdown(&text);
    }};
}

pub fn debug_prefix() -> String {
    format!("[DEBUG {}]", chrono::Local::now().format("%H:%M:%S%.3f"))
}

/// 渲染 Markdown 文本到终端，标题用青色
pub fn render_markdown(text: &str) {
    let mut skin = termimad::MadSkin::default();
    skin.set_headers_fg(termimad::crossterm::style::Color::Cyan);
    skin.print_text(text);
}
