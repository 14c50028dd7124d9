use ratatui::layout::{Constraint, Layout, Rect};

/// Header bar, tab content, footer line.
pub struct AppLayout {
    pub header: Rect,
    pub content: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        Self {
            header: vertical[0],
            content: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Layout for the request editor: [Method] [URL] on top, then headers,
/// body and params stacked.
pub struct RequestLayout {
    pub method_area: Rect,
    pub url_area: Rect,
    pub headers_area: Rect,
    pub body_area: Rect,
    pub params_area: Rect,
}

impl RequestLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(3), // Method + URL
            Constraint::Length(7), // Headers list + input
            Constraint::Min(5),    // Body
            Constraint::Length(6), // Params list + input
        ])
        .split(area);

        let top = Layout::horizontal([
            Constraint::Length(14), // fits "OPTIONS" plus title
            Constraint::Min(1),
        ])
        .split(rows[0]);

        Self {
            method_area: top[0],
            url_area: top[1],
            headers_area: rows[1],
            body_area: rows[2],
            params_area: rows[3],
        }
    }
}

/// Splits the inside of a pair block into the list and the one-line input.
pub struct PairListLayout {
    pub list_area: Rect,
    pub input_area: Rect,
}

impl PairListLayout {
    pub fn new(inner: Rect) -> Self {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
        Self {
            list_area: chunks[0],
            input_area: chunks[1],
        }
    }
}

/// Rows of response text visible at once for a terminal of size `area`.
pub fn response_page_height(area: Rect) -> u16 {
    AppLayout::new(area).content.height.saturating_sub(2)
}
