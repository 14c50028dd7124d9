use serde::de::IgnoredAny;

use crate::http::ResponseData;

/// Completion of one transport call, posted back to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    ResponseArrived(ResponseData),
    RequestFailed { message: String },
}

impl From<Result<ResponseData, String>> for TransportEvent {
    fn from(result: Result<ResponseData, String>) -> Self {
        match result {
            Ok(data) => TransportEvent::ResponseArrived(data),
            Err(message) => TransportEvent::RequestFailed { message },
        }
    }
}

/// What the response tab shows. A response and an error never coexist.
#[derive(Debug, Clone, Default)]
pub struct ResponseView {
    pub body: String,
    pub status_line: String,
    pub elapsed: String,
    pub error: String,
    pub loading: bool,
    pub scroll: u16,
    pub page_height: u16,
}

impl ResponseView {
    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    pub fn apply(&mut self, event: TransportEvent) {
        self.loading = false;
        self.scroll = 0;
        match event {
            TransportEvent::ResponseArrived(data) => {
                self.body = format_body(&data.body);
                self.status_line = format!("{} ({})", data.status, data.status_code);
                self.elapsed = data.elapsed;
                self.error.clear();
            }
            TransportEvent::RequestFailed { message } => {
                self.body.clear();
                self.status_line = "Error".to_string();
                self.elapsed.clear();
                self.error = message;
            }
        }
    }

    /// Text shown in the viewport: the body, or the error in its place.
    pub fn content(&self) -> &str {
        if self.error.is_empty() {
            &self.body
        } else {
            &self.error
        }
    }

    fn max_scroll(&self) -> u16 {
        let lines = self.content().lines().count();
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_height.max(1));
    }
}

/// Re-indents JSON with two spaces per level. Token text is copied as
/// received, so key order, duplicate keys, escapes and number spelling all
/// survive. Anything that is not a single valid JSON value is returned as is.
pub fn format_body(text: &str) -> String {
    if serde_json::from_str::<IgnoredAny>(text).is_err() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.peek().is_some_and(|n| is_json_space(*n)) {
                    chars.next();
                }
                let close = if c == '{' { '}' } else { ']' };
                if chars.peek() == Some(&close) {
                    chars.next();
                    out.push(close);
                } else {
                    depth += 1;
                    push_newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                push_newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                push_newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            c if is_json_space(c) => {}
            _ => out.push(c),
        }
    }
    out
}

fn is_json_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn push_newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}
