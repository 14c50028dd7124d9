use crossterm::event::KeyEvent;
use tracing::{error, info, warn};

use crate::focus::{compute_focus, Editors, FocusTarget};
use crate::model::{Mode, RequestDraft, SavedRequest, Section, Tab};
use crate::response::{ResponseView, TransportEvent};
use crate::storage::PresetStore;

/// Everything the UI loop owns. Handlers get it by `&mut` one event at a time.
pub struct UiState {
    pub draft: RequestDraft,
    pub response: ResponseView,
    pub presets: Vec<SavedRequest>,
    pub selected_preset: usize,
    /// One-shot message for the footer, cleared by the next key press.
    pub notice: Option<String>,
    pub editors: Editors,
    mode: Mode,
    tab: Tab,
    section: Section,
    store: Box<dyn PresetStore>,
}

impl UiState {
    pub fn new(store: Box<dyn PresetStore>) -> Self {
        let presets = store.load().unwrap_or_else(|e| {
            error!("could not load presets, starting with none: {}", e);
            Vec::new()
        });
        info!(count = presets.len(), "presets loaded");

        let mut state = Self {
            draft: RequestDraft::default(),
            response: ResponseView::default(),
            presets,
            selected_preset: 0,
            notice: None,
            editors: Editors::new(),
            mode: Mode::Navigation,
            tab: Tab::Request,
            section: Section::Method,
            store,
        };
        state.refocus();
        state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.refocus();
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        self.refocus();
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.refocus();
    }

    /// Re-derives widget focus from mode, tab and section.
    fn refocus(&mut self) {
        self.editors
            .focus(compute_focus(self.mode, self.tab, self.section));
    }

    /// Feeds a key the state machine did not consume to the focused widget and
    /// mirrors URL/body edits into the draft.
    pub fn forward_to_widget(&mut self, key: KeyEvent) {
        if !self.editors.input(key) {
            return;
        }
        match self.editors.focused() {
            Some(FocusTarget::Url) => self.draft.url = self.editors.text(FocusTarget::Url),
            Some(FocusTarget::Body) => self.draft.body = self.editors.text(FocusTarget::Body),
            _ => {}
        }
    }

    /// Replaces the whole draft and refills the URL and body widgets.
    pub fn replace_draft(&mut self, draft: RequestDraft) {
        self.editors.set_text(FocusTarget::Url, &draft.url);
        self.editors.set_text(FocusTarget::Body, &draft.body);
        self.draft = draft;
    }

    pub fn selected_preset(&self) -> Option<&SavedRequest> {
        self.presets.get(self.selected_preset)
    }

    pub fn select_next_preset(&mut self) {
        if self.selected_preset + 1 < self.presets.len() {
            self.selected_preset += 1;
        }
    }

    pub fn select_prev_preset(&mut self) {
        self.selected_preset = self.selected_preset.saturating_sub(1);
    }

    pub fn add_preset(&mut self, name: String) {
        info!(name = %name, url = %self.draft.url, "saving preset");
        self.presets.push(SavedRequest::from_draft(name, &self.draft));
        self.persist_presets();
    }

    pub fn delete_selected_preset(&mut self) {
        if self.selected_preset >= self.presets.len() {
            return;
        }
        let removed = self.presets.remove(self.selected_preset);
        info!(name = %removed.name, "deleted preset");
        self.selected_preset = self
            .selected_preset
            .min(self.presets.len().saturating_sub(1));
        self.persist_presets();
    }

    pub fn load_selected_preset(&mut self) {
        let Some(preset) = self.selected_preset() else {
            return;
        };
        info!(name = %preset.name, "loading preset");
        let draft = preset.to_draft();
        self.replace_draft(draft);
        self.set_tab(Tab::Request);
    }

    fn persist_presets(&mut self) {
        if let Err(e) = self.store.save(&self.presets) {
            error!("failed to persist presets: {}", e);
            self.notice = Some(format!("Could not save presets: {}", e));
        }
    }

    pub fn apply_transport_event(&mut self, event: TransportEvent) {
        match &event {
            TransportEvent::ResponseArrived(data) => {
                info!(status = %data.status, elapsed = %data.elapsed, "response arrived")
            }
            TransportEvent::RequestFailed { message } => {
                warn!(message = %message, "request failed")
            }
        }
        self.response.apply(event);
        // Editing and overlays keep their tab; the result waits on the Response tab.
        if self.mode == Mode::Navigation {
            self.set_tab(Tab::Response);
        }
    }
}
