// ABOUTME: App orchestrator: wires the webhook client, the TUI model, and the terminal together.
// ABOUTME: Runs the UI loop and spawns one task per chat send and per file upload.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use futures::StreamExt;
use ratatui::DefaultTerminal;
use reqwest::Url;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{Config, Endpoints};
use crate::notify::Notice;
use crate::tui::events;
use crate::tui::model::{DeskApp, Flags};
use crate::tui::state::{AppEvent, Command};
use crate::upload::{SelectedFile, UploadJob, UploadLimits, run_job};
use crate::webhook::{ChatEndpoint, ChatRequest, UploadEndpoint, WebhookClient};

/// Interval for notice expiry while nothing else is happening.
const HOUSEKEEPING_TICK: Duration = Duration::from_millis(250);

/// Executes the side effects DeskApp asks for, reporting back over the event channel.
#[derive(Clone)]
pub struct Dispatcher {
    pub chat: Arc<dyn ChatEndpoint>,
    pub upload: Arc<dyn UploadEndpoint>,
    pub events: mpsc::Sender<AppEvent>,
    pub progress_interval: Duration,
}

impl Dispatcher {
    /// Run a command. Returns false when the app should quit.
    pub fn dispatch(&self, command: Command) -> bool {
        match command {
            Command::None => {}
            Command::Quit => return false,
            Command::SendChat(request) => self.spawn_chat(request),
            Command::StartUploads(jobs) => {
                for job in jobs {
                    self.spawn_upload(job);
                }
            }
        }
        true
    }

    fn spawn_chat(&self, request: ChatRequest) {
        let endpoint = self.chat.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = endpoint.send(&request).await;
            let _ = tx.send(AppEvent::ChatSettled(result)).await;
        });
    }

    fn spawn_upload(&self, job: UploadJob) {
        let endpoint = self.upload.clone();
        let tx = self.events.clone();
        let tick_tx = self.events.clone();
        let interval = self.progress_interval;
        let id = job.id;
        debug!(%id, name = %job.name, "spawning upload task");
        tokio::spawn(async move {
            // Progress ticks are cosmetic; drop them if the UI is behind.
            let tick = move || {
                let _ = tick_tx.try_send(AppEvent::UploadProgress(id));
            };
            let result = run_job(job, endpoint, interval, tick).await;
            let _ = tx.send(AppEvent::UploadSettled { id, result }).await;
        });
    }
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    endpoints: Endpoints,
    initial_files: Vec<PathBuf>,
}

impl App {
    pub fn new(config: Config, endpoints: Endpoints) -> Self {
        Self {
            config,
            endpoints,
            initial_files: Vec::new(),
        }
    }

    /// Files to submit as soon as the UI starts.
    pub fn with_initial_files(mut self, files: Vec<PathBuf>) -> Self {
        self.initial_files = files;
        self
    }

    /// Run the application: set up the client and terminal, drive the UI loop, restore the terminal.
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc::new(
            WebhookClient::new(self.endpoints.clone(), &self.config.http)
                .context("failed to build HTTP client")?,
        );
        info!(
            chat = %client.chat_url(),
            upload = %client.upload_url(),
            "starting hookdesk"
        );

        let (event_tx, event_rx) = mpsc::channel::<AppEvent>(256);
        let dispatcher = Dispatcher {
            chat: client.clone(),
            upload: client,
            events: event_tx,
            progress_interval: self.config.upload.progress_interval(),
        };

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut model = DeskApp::new(Flags {
            greeting: self.config.chat.greeting.clone(),
            limits: UploadLimits::from(&self.config.upload),
            notice_ttl: self.config.ui.notice_ttl(),
            cwd,
            chat_host: host_label(&self.endpoints.chat),
            upload_host: host_label(&self.endpoints.upload),
        });

        let mut initial = Vec::new();
        for path in &self.initial_files {
            match SelectedFile::from_path(path) {
                Ok(file) => initial.push(file),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping initial file");
                    model.notify(Notice::error(
                        "File Unavailable",
                        format!("Could not read \"{}\".", path.display()),
                    ));
                }
            }
        }
        if !initial.is_empty() {
            dispatcher.dispatch(model.submit_files(initial));
        }

        let mut terminal = ratatui::init();
        let restore = Cleanup::new(|| {
            let _ = execute!(std::io::stdout(), DisableBracketedPaste, DisableMouseCapture);
            ratatui::restore();
        });
        execute!(std::io::stdout(), EnableBracketedPaste, EnableMouseCapture)
            .context("failed to configure terminal")?;

        let result = run_loop(&mut terminal, &mut model, &dispatcher, event_rx).await;
        drop(restore);

        print_exit_screen(&model);
        result
    }
}

/// Runs a closure once when dropped, including on early `?` returns.
struct Cleanup<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Cleanup<F> {
    fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }
}

impl<F: FnOnce()> Drop for Cleanup<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

async fn run_loop(
    terminal: &mut DefaultTerminal,
    model: &mut DeskApp,
    dispatcher: &Dispatcher,
    event_rx: mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    let mut stream = events::event_stream(event_rx, HOUSEKEEPING_TICK);

    terminal.draw(|frame| model.view(frame))?;
    while let Some(msg) = stream.next().await {
        let command = model.update(msg);
        if !dispatcher.dispatch(command) {
            break;
        }
        terminal.draw(|frame| model.view(frame))?;
    }
    Ok(())
}

fn host_label(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => url.as_str().to_string(),
    }
}

/// Print a farewell summary after the TUI exits.
fn print_exit_screen(app: &DeskApp) {
    let elapsed = crate::tui::widgets::status::format_elapsed(app.session_start.elapsed().as_secs());
    let msg_count = app.chat.messages().len();
    let file_count = app.uploads.records().len();

    println!();
    println!("  \x1b[1mhookdesk closed\x1b[0m");
    println!("  Session lasted {elapsed} with {msg_count} messages and {file_count} files.");
    println!();
}
