//! Modal key dispatch.
//!
//! Every key goes through [`UiState::handle_key`]. The active [`Mode`] picks
//! exactly one handler; overlay modes swallow every key, navigation treats
//! keys as shortcuts, and text-edit mode intercepts a few reserved keys before
//! the rest reach the focused widget.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::focus::FocusTarget;
use crate::http::RequestSpec;
use crate::model::{KeyValue, Mode, RequestDraft, Section, Tab};
use crate::perf;
use crate::state::UiState;

/// Side effect requested from the top-level loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    SendRequest(RequestSpec),
    CopyToClipboard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub command: Command,
    pub consumed: bool,
}

impl Dispatch {
    fn consumed() -> Self {
        Self {
            command: Command::None,
            consumed: true,
        }
    }

    fn ignored() -> Self {
        Self {
            command: Command::None,
            consumed: false,
        }
    }

    fn command(command: Command) -> Self {
        Self {
            command,
            consumed: true,
        }
    }
}

type Handler = fn(&mut UiState, KeyEvent) -> Dispatch;

fn handler_for(mode: Mode) -> Handler {
    match mode {
        Mode::SaveNamePrompt => UiState::on_save_prompt,
        Mode::DeleteConfirm => UiState::on_delete_confirm,
        Mode::Navigation => UiState::on_navigation,
        Mode::TextEdit => UiState::on_text_edit,
    }
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

impl UiState {
    /// Runs the state machine for one key, then hands unconsumed keys in
    /// text-edit mode to the focused widget.
    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        let _guard = perf::scope("handle_key");
        self.notice = None;

        let mode = self.mode();
        let Dispatch { command, consumed } = self.dispatch(key);
        if !consumed && mode == Mode::TextEdit && self.mode() == Mode::TextEdit {
            self.forward_to_widget(key);
        }
        command
    }

    pub fn dispatch(&mut self, key: KeyEvent) -> Dispatch {
        handler_for(self.mode())(self, key)
    }

    fn on_save_prompt(&mut self, key: KeyEvent) -> Dispatch {
        match key.code {
            KeyCode::Enter => {
                let name = self.editors.text(FocusTarget::SaveName);
                if !name.is_empty() {
                    self.add_preset(name);
                }
                self.close_save_prompt();
            }
            KeyCode::Esc => self.close_save_prompt(),
            _ => {
                self.editors.input(key);
            }
        }
        Dispatch::consumed()
    }

    fn close_save_prompt(&mut self) {
        self.editors.clear(FocusTarget::SaveName);
        self.set_mode(Mode::Navigation);
    }

    fn on_delete_confirm(&mut self, key: KeyEvent) -> Dispatch {
        match key.code {
            KeyCode::Char(c) if !is_ctrl(&key) && c.eq_ignore_ascii_case(&'y') => {
                self.delete_selected_preset();
                self.set_mode(Mode::Navigation);
            }
            KeyCode::Char(c) if !is_ctrl(&key) && c.eq_ignore_ascii_case(&'n') => {
                self.set_mode(Mode::Navigation);
            }
            KeyCode::Esc => self.set_mode(Mode::Navigation),
            _ => {}
        }
        Dispatch::consumed()
    }

    fn on_navigation(&mut self, key: KeyEvent) -> Dispatch {
        if is_ctrl(&key) {
            return match key.code {
                KeyCode::Char('c') => Dispatch::command(Command::Quit),
                KeyCode::Char('s') if self.tab() == Tab::Request => {
                    self.editors.clear(FocusTarget::SaveName);
                    self.set_mode(Mode::SaveNamePrompt);
                    Dispatch::consumed()
                }
                _ => Dispatch::ignored(),
            };
        }

        match key.code {
            KeyCode::Char('q') => Dispatch::command(Command::Quit),
            KeyCode::Char('i' | 'a') if self.tab() == Tab::Request => {
                self.set_mode(Mode::TextEdit);
                Dispatch::consumed()
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.step_horizontal(false);
                Dispatch::consumed()
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.step_horizontal(true);
                Dispatch::consumed()
            }
            KeyCode::Up | KeyCode::Char('k') => self.step_vertical(false),
            KeyCode::Down | KeyCode::Char('j') => self.step_vertical(true),
            KeyCode::Tab if self.tab() == Tab::Request => {
                self.set_section(self.section().next());
                Dispatch::consumed()
            }
            KeyCode::BackTab if self.tab() == Tab::Request => {
                self.set_section(self.section().prev());
                Dispatch::consumed()
            }
            KeyCode::Char(c) if self.tab() == Tab::Request && c.is_ascii_digit() => {
                match Section::from_digit(c) {
                    Some(section) => {
                        self.set_section(section);
                        Dispatch::consumed()
                    }
                    None => Dispatch::ignored(),
                }
            }
            KeyCode::PageUp if self.tab() == Tab::Response => {
                self.response.page_up();
                Dispatch::consumed()
            }
            KeyCode::PageDown if self.tab() == Tab::Response => {
                self.response.page_down();
                Dispatch::consumed()
            }
            KeyCode::Char('d') if self.tab() == Tab::Saved && !self.presets.is_empty() => {
                self.set_mode(Mode::DeleteConfirm);
                Dispatch::consumed()
            }
            KeyCode::Char('y') if self.tab() == Tab::Response => {
                let content = self.response.content();
                if content.is_empty() {
                    return Dispatch::consumed();
                }
                Dispatch::command(Command::CopyToClipboard(content.to_string()))
            }
            KeyCode::Enter if self.tab() == Tab::Saved => {
                self.load_selected_preset();
                Dispatch::consumed()
            }
            KeyCode::Enter => self.enter_action(),
            KeyCode::Backspace if self.tab() == Tab::Request => self.backspace_action(),
            _ => Dispatch::ignored(),
        }
    }

    fn on_text_edit(&mut self, key: KeyEvent) -> Dispatch {
        let in_body = self.section() == Section::Body;
        match key.code {
            KeyCode::Esc => {
                self.set_mode(Mode::Navigation);
                Dispatch::consumed()
            }
            KeyCode::Char('c') if is_ctrl(&key) && !in_body => Dispatch::command(Command::Quit),
            KeyCode::Char('q') if !is_ctrl(&key) && !in_body => Dispatch::command(Command::Quit),
            KeyCode::Enter if self.edits_pairs() => self.enter_action(),
            KeyCode::Backspace if self.edits_pairs() => self.backspace_action(),
            _ => Dispatch::ignored(),
        }
    }

    fn edits_pairs(&self) -> bool {
        matches!(self.section(), Section::Headers | Section::Params)
    }

    /// Method cycling on the method row of the request tab, tab cycling
    /// everywhere else.
    fn step_horizontal(&mut self, forward: bool) {
        if self.tab() == Tab::Request && self.section() == Section::Method {
            self.draft.method = if forward {
                self.draft.method.next()
            } else {
                self.draft.method.prev()
            };
            return;
        }
        let tab = if forward {
            self.tab().next()
        } else {
            self.tab().prev()
        };
        self.set_tab(tab);
    }

    fn step_vertical(&mut self, forward: bool) -> Dispatch {
        match (self.tab(), forward) {
            (Tab::Request, true) => self.set_section(self.section().next()),
            (Tab::Request, false) => self.set_section(self.section().prev()),
            (Tab::Response, true) => self.response.scroll_down(1),
            (Tab::Response, false) => self.response.scroll_up(1),
            (Tab::Saved, true) => self.select_next_preset(),
            (Tab::Saved, false) => self.select_prev_preset(),
        }
        Dispatch::consumed()
    }

    /// Pair sections commit their buffer only on the request tab. Everywhere
    /// else Enter sends.
    fn enter_action(&mut self) -> Dispatch {
        if self.tab() != Tab::Request {
            return self.send();
        }
        match self.section() {
            Section::Headers => {
                self.commit_pair(FocusTarget::Header, RequestDraft::push_header);
                Dispatch::consumed()
            }
            Section::Params => {
                self.commit_pair(FocusTarget::Param, RequestDraft::push_param);
                Dispatch::consumed()
            }
            _ => self.send(),
        }
    }

    /// Moves a `key=value` buffer into the draft. Input without `=` stays in
    /// the buffer and nothing is added.
    fn commit_pair(&mut self, target: FocusTarget, push: fn(&mut RequestDraft, KeyValue)) {
        let input = self.editors.text(target);
        if input.is_empty() {
            return;
        }
        match KeyValue::parse(&input) {
            Some(pair) => {
                debug!(?target, key = %pair.key, "adding pair");
                push(&mut self.draft, pair);
                self.editors.clear(target);
            }
            None => debug!(?target, input = %input, "discarding input without '='"),
        }
    }

    fn send(&mut self) -> Dispatch {
        if self.draft.url.is_empty() {
            return Dispatch::consumed();
        }
        if self.response.loading {
            debug!("request already in flight, sending another");
        }
        let spec = RequestSpec::snapshot(&self.draft);
        info!(method = %spec.method, url = %spec.url, "sending request");
        self.response.start_loading();
        Dispatch::command(Command::SendRequest(spec))
    }

    /// Backspace over an empty pair buffer removes the newest pair.
    fn backspace_action(&mut self) -> Dispatch {
        let popped = match self.section() {
            Section::Headers if self.editors.is_empty(FocusTarget::Header) => {
                self.draft.pop_header()
            }
            Section::Params if self.editors.is_empty(FocusTarget::Param) => {
                self.draft.pop_param()
            }
            _ => None,
        };
        match popped {
            Some(pair) => {
                debug!(key = %pair.key, "removed last pair");
                Dispatch::consumed()
            }
            None => Dispatch::ignored(),
        }
    }
}
