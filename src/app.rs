use std::io::stdout;
use std::panic;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::clipboard::ClipboardProvider;
use crate::dispatch::Command;
use crate::http::{self, RequestSpec};
use crate::perf;
use crate::response::TransportEvent;
use crate::state::UiState;
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct App {
    running: bool,
    state: UiState,
    client: Client,
    clipboard: ClipboardProvider,
}

impl App {
    pub fn new(state: UiState, client: Client) -> Self {
        Self {
            running: true,
            state,
            client,
            clipboard: ClipboardProvider::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.install_panic_hook();
        self.setup_terminal()?;

        let result = self.event_loop().await;

        self.restore_terminal()?;
        result
    }

    fn install_panic_hook(&self) {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            original_hook(panic_info);
        }));
    }

    fn setup_terminal(&self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        Ok(())
    }

    fn restore_terminal(&self) -> Result<()> {
        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        Ok(())
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (tx, mut rx) = mpsc::channel::<TransportEvent>(16);

        while self.running {
            let area = {
                let _guard = perf::scope("draw");
                terminal.draw(|frame| ui::render(frame, &self.state))?.area
            };
            self.state.response.page_height = ui::response_page_height(area);

            drain_transport_events(&mut self.state, &mut rx);

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let command = self.state.handle_key(key);
                        self.execute(command, &tx);
                    }
                }
            }
        }

        info!("shutting down");
        Ok(())
    }

    fn execute(&mut self, command: Command, tx: &mpsc::Sender<TransportEvent>) {
        match command {
            Command::None => {}
            Command::Quit => self.running = false,
            Command::SendRequest(spec) => self.spawn_request(spec, tx.clone()),
            Command::CopyToClipboard(text) => match self.clipboard.set_text(text) {
                Ok(()) => self.state.notice = Some("Response copied to clipboard".to_string()),
                Err(e) => {
                    warn!("clipboard copy failed: {}", e);
                    self.state.notice = Some(e.to_string());
                }
            },
        }
    }

    /// The request runs off the UI loop; its outcome comes back over `tx`.
    fn spawn_request(&self, spec: RequestSpec, tx: mpsc::Sender<TransportEvent>) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let event = TransportEvent::from(http::send_request(&client, spec).await);
            let _ = tx.send(event).await;
        });
    }
}

/// Folds every transport result that has arrived since the last tick, in
/// arrival order.
fn drain_transport_events(state: &mut UiState, rx: &mut mpsc::Receiver<TransportEvent>) -> usize {
    let mut folded = 0;
    while let Ok(event) = rx.try_recv() {
        state.apply_transport_event(event);
        folded += 1;
    }
    folded
}
