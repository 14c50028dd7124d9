mod layout;

use layout::{AppLayout, PairListLayout, RequestLayout};
pub use layout::response_page_height;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::focus::FocusTarget;
use crate::model::{KeyValue, Mode, Section, Tab};
use crate::state::UiState;

const APP_TITLE: &str = " hermes ";

pub fn render(frame: &mut Frame, state: &UiState) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, state, layout.header);
    match state.tab() {
        Tab::Request => render_request_tab(frame, state, layout.content),
        Tab::Response => render_response_tab(frame, state, layout.content),
        Tab::Saved => render_saved_tab(frame, state, layout.content),
    }
    render_footer(frame, state, layout.footer);
}

fn render_header(frame: &mut Frame, state: &UiState, area: Rect) {
    let mut spans = vec![Span::styled(
        APP_TITLE,
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    for tab in Tab::ALL {
        let style = if tab == state.tab() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tab.title(), style));
    }

    let mode = format!(" {} ", state.mode());
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let spacer = (area.width as usize).saturating_sub(used + mode.width());
    spans.push(Span::raw(" ".repeat(spacer)));
    spans.push(Span::styled(mode, Style::default().fg(Color::Black).bg(mode_color(state.mode()))));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Navigation => Color::Blue,
        Mode::TextEdit => Color::Green,
        Mode::SaveNamePrompt | Mode::DeleteConfirm => Color::Magenta,
    }
}

fn section_color(state: &UiState, section: Section) -> Color {
    if state.section() != section {
        Color::White
    } else if state.mode() == Mode::TextEdit {
        Color::Green
    } else {
        Color::Yellow
    }
}

fn section_block(state: &UiState, section: Section) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(section_color(state, section)))
        .title(format!(" {} {} ", section.index() + 1, section.title()))
}

fn render_request_tab(frame: &mut Frame, state: &UiState, area: Rect) {
    let layout = RequestLayout::new(area);

    let method = Paragraph::new(Line::from(Span::styled(
        state.draft.method.as_str(),
        Style::default()
            .fg(section_color(state, Section::Method))
            .add_modifier(Modifier::BOLD),
    )))
    .block(section_block(state, Section::Method));
    frame.render_widget(method, layout.method_area);

    render_editor(frame, state, Section::Url, FocusTarget::Url, layout.url_area);
    render_pairs(
        frame,
        state,
        Section::Headers,
        FocusTarget::Header,
        &state.draft.headers,
        layout.headers_area,
    );
    render_editor(frame, state, Section::Body, FocusTarget::Body, layout.body_area);
    render_pairs(
        frame,
        state,
        Section::Params,
        FocusTarget::Param,
        &state.draft.params,
        layout.params_area,
    );
}

fn render_editor(frame: &mut Frame, state: &UiState, section: Section, target: FocusTarget, area: Rect) {
    let block = section_block(state, section);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(state.editors.area(target), inner);
}

fn render_pairs(
    frame: &mut Frame,
    state: &UiState,
    section: Section,
    target: FocusTarget,
    pairs: &[KeyValue],
    area: Rect,
) {
    let block = section_block(state, section);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = PairListLayout::new(inner);
    // newest pairs stay visible when the list overflows
    let visible = layout.list_area.height as usize;
    let skip = pairs.len().saturating_sub(visible);
    let lines: Vec<Line> = pairs
        .iter()
        .skip(skip)
        .map(|pair| {
            Line::from(vec![
                Span::styled(pair.key.clone(), Style::default().fg(Color::Cyan)),
                Span::raw(": "),
                Span::raw(pair.value.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), layout.list_area);
    frame.render_widget(state.editors.area(target), layout.input_area);
}

fn render_response_tab(frame: &mut Frame, state: &UiState, area: Rect) {
    let view = &state.response;
    let mut title = vec![Span::raw(" Response ")];
    if !view.status_line.is_empty() {
        let color = if view.error.is_empty() {
            Color::Green
        } else {
            Color::Red
        };
        title.push(Span::styled(
            format!("{} ", view.status_line),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    if !view.elapsed.is_empty() {
        title.push(Span::styled(
            format!("{} ", view.elapsed),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Line::from(title));

    let paragraph = if view.loading && view.content().is_empty() {
        Paragraph::new("Sending request...").style(Style::default().fg(Color::DarkGray))
    } else if !view.error.is_empty() {
        Paragraph::new(view.error.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(view.body.as_str())
    };
    frame.render_widget(paragraph.block(block).scroll((view.scroll, 0)), area);
}

fn render_saved_tab(frame: &mut Frame, state: &UiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Saved ({}) ", state.presets.len()));

    if state.presets.is_empty() {
        let hint = Paragraph::new("No saved requests. Press ctrl+s on the Request tab to save one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .presets
        .iter()
        .map(|preset| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", preset.method.as_str()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(preset.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(preset.url.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default().with_selected(Some(state.selected_preset));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_footer(frame: &mut Frame, state: &UiState, area: Rect) {
    if state.mode() == Mode::SaveNamePrompt {
        let label = "Save as: ";
        let chunks = Layout::horizontal([
            Constraint::Length(label.width() as u16),
            Constraint::Min(1),
        ])
        .split(area);
        frame.render_widget(
            Paragraph::new(label).style(Style::default().fg(Color::Magenta)),
            chunks[0],
        );
        frame.render_widget(state.editors.area(FocusTarget::SaveName), chunks[1]);
        return;
    }

    let line = footer_line(state);
    frame.render_widget(Paragraph::new(line), area);
}

fn footer_line(state: &UiState) -> Line<'static> {
    if state.mode() == Mode::DeleteConfirm {
        let name = state
            .selected_preset()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        return Line::styled(
            format!("Delete \"{}\"? (y/n)", name),
            Style::default().fg(Color::Magenta),
        );
    }
    if let Some(notice) = &state.notice {
        return Line::styled(notice.clone(), Style::default().fg(Color::Yellow));
    }
    let view = &state.response;
    if view.loading {
        return Line::styled("Sending request...", Style::default().fg(Color::Cyan));
    }
    if !view.error.is_empty() {
        return Line::styled(
            format!("Error: {}", view.error),
            Style::default().fg(Color::Red),
        );
    }
    if !view.status_line.is_empty() && state.tab() != Tab::Response {
        return Line::from(format!("{}  {}", view.status_line, view.elapsed));
    }
    Line::styled(help_text(state), Style::default().fg(Color::DarkGray))
}

fn help_text(state: &UiState) -> &'static str {
    match (state.mode(), state.tab()) {
        (Mode::TextEdit, _) if matches!(state.section(), Section::Headers | Section::Params) => {
            "esc done  enter add key=value  backspace on empty removes last"
        }
        (Mode::TextEdit, _) => "esc done",
        (_, Tab::Request) => {
            "q quit  i edit  j/k section  h/l method/tab  enter send  ctrl+s save"
        }
        (_, Tab::Response) => "q quit  j/k scroll  pgup/pgdn page  y copy  h/l tab",
        (_, Tab::Saved) => "q quit  j/k select  enter load  d delete  h/l tab",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseData;
    use crate::model::{HttpMethod, SavedRequest};
    use crate::response::TransportEvent;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state_with(presets: Vec<SavedRequest>) -> UiState {
        UiState::new(Box::new(MemoryStore {
            initial: presets,
            ..MemoryStore::default()
        }))
    }

    #[test]
    fn test_request_tab_shows_draft() {
        let mut state = state_with(Vec::new());
        state.draft.method = HttpMethod::Patch;
        state.draft.params.push(KeyValue::new("page", "2"));

        let screen = draw(&state);
        assert!(screen.contains("hermes"));
        assert!(screen.contains("1 Method"));
        assert!(screen.contains("PATCH"));
        assert!(screen.contains("Content-Type: application/json"));
        assert!(screen.contains("page: 2"));
        assert!(screen.contains(" NAV "));
    }

    #[test]
    fn test_response_tab_shows_status_and_body() {
        let mut state = state_with(Vec::new());
        state.apply_transport_event(TransportEvent::ResponseArrived(ResponseData {
            status: "200 OK".into(),
            status_code: 200,
            body: "{\"a\":1}".into(),
            elapsed: "12ms".into(),
        }));

        let screen = draw(&state);
        assert!(screen.contains("200 OK (200)"));
        assert!(screen.contains("12ms"));
        assert!(screen.contains("\"a\": 1"));
    }

    #[test]
    fn test_saved_tab_lists_presets() {
        let mut state = state_with(vec![SavedRequest {
            name: "Ping".into(),
            method: HttpMethod::Get,
            url: "http://localhost/ping".into(),
            body: String::new(),
            headers: Vec::new(),
            params: Vec::new(),
        }]);
        state.set_tab(Tab::Saved);

        let screen = draw(&state);
        assert!(screen.contains("Saved (1)"));
        assert!(screen.contains("Ping"));
        assert!(screen.contains("http://localhost/ping"));

        state.set_mode(Mode::DeleteConfirm);
        assert!(draw(&state).contains("Delete \"Ping\"? (y/n)"));
    }

    #[test]
    fn test_footer_priority() {
        let mut state = state_with(Vec::new());
        state.response.start_loading();
        state.notice = Some("Could not save presets".into());
        assert_eq!(footer_line(&state).to_string(), "Could not save presets");

        state.notice = None;
        assert_eq!(footer_line(&state).to_string(), "Sending request...");

        state.apply_transport_event(TransportEvent::RequestFailed {
            message: "Request timed out".into(),
        });
        assert_eq!(footer_line(&state).to_string(), "Error: Request timed out");
    }
}
