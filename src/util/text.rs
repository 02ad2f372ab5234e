use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 计算字符串的显示宽度（全角字符占 2 列）
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// 右侧补空格到指定显示宽度，超出时原样返回（不截断）
pub fn pad_right(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - w))
}

/// 左侧补空格到指定显示宽度（右对齐）
pub fn pad_left(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - w), s)
}

/// 将字符串截断到指定的显示宽度，超出部分用 ".." 替代
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let ellipsis = "..";
    let content_budget = max_width.saturating_sub(ellipsis.len());
    let mut width = 0;
    let mut result = String::new();
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > content_budget {
            break;
        }
        width += ch_width;
        result.push(ch);
    }
    result.push_str(ellipsis);
    result
}

/// 将输入字符串按光标位置分割为三部分：光标前、光标处字符、光标后
pub fn split_input_at_cursor(input: &str, cursor_pos: usize) -> (String, String, String) {
    let chars: Vec<char> = input.chars().collect();
    let cursor_pos = cursor_pos.min(chars.len());
    let before: String = chars[..cursor_pos].iter().collect();
    let cursor_ch = if cursor_pos < chars.len() {
        chars[cursor_pos].to_string()
    } else {
        " ".to_string()
    };
    let after: String = if cursor_pos < chars.len() {
        chars[cursor_pos + 1..].iter().collect()
    } else {
        String::new()
    };
    (before, cursor_ch, after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_counts_wide_chars_twice() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("网络", 6), "网络  ");
        assert_eq!(pad_right("too long", 3), "too long");
        assert_eq!(pad_left("x", 3), "  x");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 7), "hello..");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn cursor_split() {
        assert_eq!(
            split_input_at_cursor("abc", 1),
            ("a".to_string(), "b".to_string(), "c".to_string())
        );
        assert_eq!(
            split_input_at_cursor("abc", 3),
            ("abc".to_string(), " ".to_string(), String::new())
        );
        assert_eq!(
            split_input_at_cursor("abc", 9),
            ("abc".to_string(), " ".to_string(), String::new())
        );
    }
}
