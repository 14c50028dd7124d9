use crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use tui_textarea::{Input, Key, TextArea};

use crate::model::{Mode, Section, Tab};

/// An editable widget that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Url,
    Header,
    Body,
    Param,
    SaveName,
}

impl FocusTarget {
    fn single_line(&self) -> bool {
        !matches!(self, FocusTarget::Body)
    }
}

/// Which widget receives raw keys for the given interaction state.
///
/// Navigation and delete confirmation have no editable widget. `Method` has
/// none either, so text-edit mode on it focuses nothing.
pub fn compute_focus(mode: Mode, tab: Tab, section: Section) -> Option<FocusTarget> {
    match mode {
        Mode::Navigation | Mode::DeleteConfirm => None,
        Mode::SaveNamePrompt => Some(FocusTarget::SaveName),
        Mode::TextEdit if tab != Tab::Request => None,
        Mode::TextEdit => match section {
            Section::Url => Some(FocusTarget::Url),
            Section::Headers => Some(FocusTarget::Header),
            Section::Body => Some(FocusTarget::Body),
            Section::Params => Some(FocusTarget::Param),
            Section::Method => None,
        },
    }
}

/// The text widgets owned by the UI state. At most one is focused.
pub struct Editors {
    url: TextArea<'static>,
    header: TextArea<'static>,
    body: TextArea<'static>,
    param: TextArea<'static>,
    save_name: TextArea<'static>,
    focused: Option<FocusTarget>,
}

impl Default for Editors {
    fn default() -> Self {
        Self::new()
    }
}

impl Editors {
    pub fn new() -> Self {
        Self {
            url: new_area(FocusTarget::Url, ""),
            header: new_area(FocusTarget::Header, ""),
            body: new_area(FocusTarget::Body, ""),
            param: new_area(FocusTarget::Param, ""),
            save_name: new_area(FocusTarget::SaveName, ""),
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    /// Blurs every widget, then focuses `target`.
    pub fn focus(&mut self, target: Option<FocusTarget>) {
        for area in [
            &mut self.url,
            &mut self.header,
            &mut self.body,
            &mut self.param,
            &mut self.save_name,
        ] {
            blur(area);
        }
        self.focused = target;
        if let Some(target) = target {
            focus(self.area_mut(target));
        }
    }

    pub fn area(&self, target: FocusTarget) -> &TextArea<'static> {
        match target {
            FocusTarget::Url => &self.url,
            FocusTarget::Header => &self.header,
            FocusTarget::Body => &self.body,
            FocusTarget::Param => &self.param,
            FocusTarget::SaveName => &self.save_name,
        }
    }

    fn area_mut(&mut self, target: FocusTarget) -> &mut TextArea<'static> {
        match target {
            FocusTarget::Url => &mut self.url,
            FocusTarget::Header => &mut self.header,
            FocusTarget::Body => &mut self.body,
            FocusTarget::Param => &mut self.param,
            FocusTarget::SaveName => &mut self.save_name,
        }
    }

    pub fn text(&self, target: FocusTarget) -> String {
        self.area(target).lines().join("\n")
    }

    pub fn is_empty(&self, target: FocusTarget) -> bool {
        self.area(target).lines().iter().all(|line| line.is_empty())
    }

    /// Replaces the widget content, keeping its focus state.
    pub fn set_text(&mut self, target: FocusTarget, text: &str) {
        let mut area = new_area(target, text);
        if self.focused == Some(target) {
            focus(&mut area);
        } else {
            blur(&mut area);
        }
        *self.area_mut(target) = area;
    }

    pub fn clear(&mut self, target: FocusTarget) {
        self.set_text(target, "");
    }

    /// Feeds a raw key to the focused widget. Returns false when nothing is
    /// focused or the key was rejected.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let Some(target) = self.focused else {
            return false;
        };
        let input = Input::from(key);
        if target.single_line() && is_newline(&input) {
            return false;
        }
        self.area_mut(target).input(input);
        true
    }
}

fn is_newline(input: &Input) -> bool {
    matches!(
        input,
        Input { key: Key::Enter, .. }
            | Input {
                key: Key::Char('m' | 'j'),
                ctrl: true,
                ..
            }
    )
}

fn placeholder(target: FocusTarget) -> &'static str {
    match target {
        FocusTarget::Url => "https://api.example.com/endpoint",
        FocusTarget::Header => "Content-Type=application/json",
        FocusTarget::Body => "{\"key\": \"value\"}",
        FocusTarget::Param => "key=value",
        FocusTarget::SaveName => "My request",
    }
}

fn new_area(target: FocusTarget, text: &str) -> TextArea<'static> {
    let lines: Vec<String> = if text.is_empty() {
        vec![String::new()]
    } else if target.single_line() {
        vec![text.replace('\n', " ")]
    } else {
        text.split('\n').map(String::from).collect()
    };
    let mut area = TextArea::new(lines);
    area.set_placeholder_text(placeholder(target));
    area.set_cursor_line_style(Style::default());
    area.move_cursor(tui_textarea::CursorMove::Bottom);
    area.move_cursor(tui_textarea::CursorMove::End);
    area
}

fn focus(area: &mut TextArea<'_>) {
    area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
}

fn blur(area: &mut TextArea<'_>) {
    area.set_cursor_style(Style::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_no_focus_outside_text_edit() {
        for section in Section::ALL {
            assert_eq!(compute_focus(Mode::Navigation, Tab::Request, section), None);
            assert_eq!(compute_focus(Mode::DeleteConfirm, Tab::Saved, section), None);
        }
    }

    #[test]
    fn test_text_edit_section_mapping() {
        let focus = |section| compute_focus(Mode::TextEdit, Tab::Request, section);
        assert_eq!(focus(Section::Url), Some(FocusTarget::Url));
        assert_eq!(focus(Section::Headers), Some(FocusTarget::Header));
        assert_eq!(focus(Section::Body), Some(FocusTarget::Body));
        assert_eq!(focus(Section::Params), Some(FocusTarget::Param));
        assert_eq!(focus(Section::Method), None);
    }

    #[test]
    fn test_save_prompt_focuses_name_buffer() {
        assert_eq!(
            compute_focus(Mode::SaveNamePrompt, Tab::Request, Section::Body),
            Some(FocusTarget::SaveName)
        );
    }

    #[test]
    fn test_input_goes_to_focused_widget_only() {
        let mut editors = Editors::new();
        assert!(!editors.input(key(KeyCode::Char('x'))));

        editors.focus(Some(FocusTarget::Url));
        editors.input(key(KeyCode::Char('h')));
        editors.input(key(KeyCode::Char('i')));
        assert_eq!(editors.text(FocusTarget::Url), "hi");
        assert!(editors.is_empty(FocusTarget::Body));

        editors.focus(None);
        assert_eq!(editors.focused(), None);
        assert!(!editors.input(key(KeyCode::Char('!'))));
        assert_eq!(editors.text(FocusTarget::Url), "hi");
    }

    #[test]
    fn test_single_line_rejects_newline() {
        let mut editors = Editors::new();
        editors.focus(Some(FocusTarget::Header));
        editors.input(key(KeyCode::Char('a')));
        assert!(!editors.input(key(KeyCode::Enter)));
        assert_eq!(editors.text(FocusTarget::Header), "a");

        editors.focus(Some(FocusTarget::Body));
        editors.input(key(KeyCode::Char('{')));
        editors.input(key(KeyCode::Enter));
        editors.input(key(KeyCode::Char('}')));
        assert_eq!(editors.text(FocusTarget::Body), "{\n}");
    }

    #[test]
    fn test_set_text_replaces_content() {
        let mut editors = Editors::new();
        editors.set_text(FocusTarget::Body, "line1\nline2");
        assert_eq!(editors.text(FocusTarget::Body), "line1\nline2");
        editors.clear(FocusTarget::Body);
        assert!(editors.is_empty(FocusTarget::Body));
    }
}
