//! Line-oriented JSON syntax highlighting
//!
//! Works on one line at a time, which is enough for pretty-printed
//! documents. A string left open at the end of a line is closed there.

use crate::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Lexical class of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonClass {
    Key,
    String,
    Number,
    Literal,
    Punct,
    Plain,
}

impl JsonClass {
    pub fn style(self, theme: &Theme) -> Style {
        match self {
            Self::Key => Style::default().fg(theme.json_key),
            Self::String => Style::default().fg(theme.json_string),
            Self::Number => Style::default().fg(theme.json_number),
            Self::Literal => Style::default()
                .fg(theme.json_literal)
                .add_modifier(Modifier::ITALIC),
            Self::Punct => Style::default().fg(theme.muted),
            Self::Plain => Style::default().fg(theme.fg),
        }
    }
}

/// Class of every char in `line`
pub fn classify(line: &str) -> Vec<JsonClass> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut classes = vec![JsonClass::Plain; len];
    let mut i = 0;

    while i < len {
        let start = i;
        let class = match chars[i] {
            '"' => {
                i += 1;
                while i < len {
                    match chars[i] {
                        '\\' => i += 2,
                        '"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                i = i.min(len);
                let next = chars[i..].iter().find(|c| !c.is_whitespace());
                if next == Some(&':') {
                    JsonClass::Key
                } else {
                    JsonClass::String
                }
            }
            '{' | '}' | '[' | ']' | ':' | ',' => {
                i += 1;
                JsonClass::Punct
            }
            c if c == '-' || c.is_ascii_digit() => {
                i += 1;
                while i < len && matches!(chars[i], '0'..='9' | '.' | 'e' | 'E' | '+' | '-') {
                    i += 1;
                }
                JsonClass::Number
            }
            c if c.is_ascii_alphabetic() => {
                while i < len && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if matches!(word.as_str(), "true" | "false" | "null") {
                    JsonClass::Literal
                } else {
                    JsonClass::Plain
                }
            }
            _ => {
                i += 1;
                JsonClass::Plain
            }
        };
        classes[start..i].fill(class);
    }

    classes
}

/// One highlighted line, consecutive chars of a class merged into a span
pub fn highlight_line(line: &str, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut current_class = None;

    for (c, class) in line.chars().zip(classify(line)) {
        if current_class != Some(class) {
            if let Some(prev) = current_class {
                spans.push(Span::styled(std::mem::take(&mut current), prev.style(theme)));
            }
            current_class = Some(class);
        }
        current.push(c);
    }
    if let Some(prev) = current_class {
        spans.push(Span::styled(current, prev.style(theme)));
    }

    Line::from(spans)
}

/// Highlight a whole document
pub fn highlight(json: &str, theme: &Theme) -> Vec<Line<'static>> {
    json.lines().map(|line| highlight_line(line, theme)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::JsonClass::{Key, Literal, Number, Plain, Punct};

    fn runs(line: &str) -> Vec<(String, JsonClass)> {
        let mut out: Vec<(String, JsonClass)> = Vec::new();
        for (c, class) in line.chars().zip(classify(line)) {
            match out.last_mut() {
                Some((text, last)) if *last == class => text.push(c),
                _ => out.push((c.to_string(), class)),
            }
        }
        out
    }

    #[test]
    fn test_key_and_string_value() {
        assert_eq!(
            runs(r#"  "url": "/a:b","#),
            vec![
                ("  ".to_string(), Plain),
                (r#""url""#.to_string(), Key),
                (":".to_string(), Punct),
                (" ".to_string(), Plain),
                (r#""/a:b""#.to_string(), JsonClass::String),
                (",".to_string(), Punct),
            ]
        );
    }

    #[test]
    fn test_numbers_and_literals() {
        let classes = classify(r#"[-1.5e3, true, null]"#);
        assert_eq!(classes[1], Number);
        assert_eq!(classes[6], Number);
        assert_eq!(classes[9], Literal);
        assert_eq!(classes[15], Literal);
    }

    #[test]
    fn test_escaped_quotes_stay_in_string() {
        let line = r#""a\"b""#;
        assert!(classify(line).iter().all(|c| *c == JsonClass::String));
    }

    #[test]
    fn test_unterminated_string() {
        let line = r#""abc\"#;
        assert_eq!(classify(line).len(), line.chars().count());
    }

    #[test]
    fn test_highlight_line_preserves_text() {
        let theme = Theme::default();
        let line = highlight_line(r#"{"a": [1, "x"]}"#, &theme);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, r#"{"a": [1, "x"]}"#);
    }
}
