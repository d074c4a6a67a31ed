// ABOUTME: DeskApp: the Elm-style TUI model holding both session managers.
// ABOUTME: update() routes keys, pastes, and task events to the focused pane and returns a Command.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;

use crate::chat::ChatSession;
use crate::notify::{Notice, NoticeBoard};
use crate::tui::input::InputBuffer;
use crate::tui::state::{AppEvent, Command, Focus};
use crate::tui::ui;
use crate::upload::{SelectedFile, UploadLimits, UploadSession, resolve_selection};

const MOUSE_SCROLL_STEP: u16 = 3;
const PAGE_SCROLL_STEP: u16 = 10;

/// Messages that drive the DeskApp update cycle.
pub enum Msg {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    App(AppEvent),
    /// Periodic housekeeping: expire notices.
    Tick,
    Resize,
}

/// Initialization data passed to DeskApp::new.
pub struct Flags {
    pub greeting: String,
    pub limits: UploadLimits,
    pub notice_ttl: Duration,
    /// Directory relative upload paths are resolved against.
    pub cwd: PathBuf,
    pub chat_host: String,
    pub upload_host: String,
}

/// The top-level TUI application state.
pub struct DeskApp {
    pub chat: ChatSession,
    pub uploads: UploadSession,
    pub notices: NoticeBoard,
    pub focus: Focus,
    pub chat_input: InputBuffer,
    pub upload_input: InputBuffer,
    /// Lines scrolled up from the bottom of the chat log (0 = newest visible).
    pub chat_scroll: u16,
    /// Index of the highlighted upload record.
    pub selected_upload: usize,
    pub cwd: PathBuf,
    pub chat_host: String,
    pub upload_host: String,
    pub session_start: Instant,
    /// Timestamp of the last Ctrl+C press for double-tap quit detection.
    last_ctrl_c: Option<Instant>,
}

impl DeskApp {
    pub fn new(flags: Flags) -> Self {
        Self {
            chat: ChatSession::new(&flags.greeting),
            uploads: UploadSession::new(flags.limits),
            notices: NoticeBoard::new(flags.notice_ttl),
            focus: Focus::Chat,
            chat_input: InputBuffer::new(),
            upload_input: InputBuffer::new(),
            chat_scroll: 0,
            selected_upload: 0,
            cwd: flags.cwd,
            chat_host: flags.chat_host,
            upload_host: flags.upload_host,
            session_start: Instant::now(),
            last_ctrl_c: None,
        }
    }

    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::App(event) => {
                self.apply_event(event);
                Command::None
            }
            Msg::Key(key) => self.handle_key(key),
            Msg::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        self.chat_scroll = self.chat_scroll.saturating_add(MOUSE_SCROLL_STEP);
                    }
                    MouseEventKind::ScrollDown => {
                        self.chat_scroll = self.chat_scroll.saturating_sub(MOUSE_SCROLL_STEP);
                    }
                    _ => {}
                }
                Command::None
            }
            Msg::Paste(text) => match self.focus {
                Focus::Chat => {
                    self.chat_input.insert_str(&text);
                    Command::None
                }
                // Dropping files on a terminal pastes their paths.
                Focus::Upload => self.submit_selection(&text),
            },
            Msg::Tick => {
                self.notices.prune(Instant::now());
                Command::None
            }
            Msg::Resize => Command::None,
        }
    }

    pub fn view(&mut self, frame: &mut Frame) {
        ui::render(frame, self);
    }

    /// Submit files picked through some other front end (e.g. CLI arguments).
    pub fn submit_files(&mut self, selection: Vec<SelectedFile>) -> Command {
        let submission = self.uploads.submit_files(selection);
        for notice in submission.notices {
            self.notices.push(notice);
        }
        if submission.jobs.is_empty() {
            Command::None
        } else {
            Command::StartUploads(submission.jobs)
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatSettled(result) => {
                if let Some(notice) = self.chat.settle(result) {
                    self.notices.push(notice);
                }
                self.chat_scroll = 0;
            }
            AppEvent::UploadProgress(id) => {
                self.uploads.tick(id);
            }
            AppEvent::UploadSettled { id, result } => {
                if let Some(notice) = self.uploads.settle(id, result) {
                    self.notices.push(notice);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl+Q always quits immediately.
        if ctrl && key.code == KeyCode::Char('q') {
            return Command::Quit;
        }

        // Double Ctrl+C within 500ms quits; a single press clears the focused input.
        if ctrl && key.code == KeyCode::Char('c') {
            let now = Instant::now();
            if let Some(prev) = self.last_ctrl_c
                && now.duration_since(prev) < Duration::from_millis(500)
            {
                return Command::Quit;
            }
            self.last_ctrl_c = Some(now);
            self.focused_input().clear();
            return Command::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggle();
                return Command::None;
            }
            KeyCode::PageUp => {
                self.chat_scroll = self.chat_scroll.saturating_add(PAGE_SCROLL_STEP);
                return Command::None;
            }
            KeyCode::PageDown => {
                self.chat_scroll = self.chat_scroll.saturating_sub(PAGE_SCROLL_STEP);
                return Command::None;
            }
            KeyCode::Esc => {
                return if self.chat.awaiting_response() {
                    Command::None
                } else {
                    Command::Quit
                };
            }
            _ => {}
        }

        match self.focus {
            Focus::Chat => self.handle_chat_key(key),
            Focus::Upload => self.handle_upload_key(key),
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.chat_input.insert_char('\n');
                Command::None
            }
            KeyCode::Enter => self.send_chat(),
            KeyCode::Up => {
                self.chat_scroll = self.chat_scroll.saturating_add(1);
                Command::None
            }
            KeyCode::Down => {
                self.chat_scroll = self.chat_scroll.saturating_sub(1);
                Command::None
            }
            _ => {
                self.chat_input.handle_key(key);
                Command::None
            }
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) -> Command {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => {
                let text = self.upload_input.take();
                self.submit_selection(&text)
            }
            KeyCode::Up => {
                self.selected_upload = self.selected_upload.saturating_sub(1);
                Command::None
            }
            KeyCode::Down => {
                let last = self.uploads.records().len().saturating_sub(1);
                self.selected_upload = (self.selected_upload + 1).min(last);
                Command::None
            }
            KeyCode::Char('x') if ctrl => {
                if let Some(id) = self.selected_upload_id() {
                    self.uploads.remove(id);
                    self.clamp_selection();
                }
                Command::None
            }
            KeyCode::Char('r') if ctrl => {
                let Some(id) = self.selected_upload_id() else {
                    return Command::None;
                };
                match self.uploads.retry(id) {
                    Ok(job) => Command::StartUploads(vec![job]),
                    Err(notice) => {
                        self.notices.push(notice);
                        Command::None
                    }
                }
            }
            _ => {
                self.upload_input.handle_key(key);
                Command::None
            }
        }
    }

    /// Send the chat input. Blank input and sends while a reply is pending are no-ops
    /// and leave the input untouched.
    fn send_chat(&mut self) -> Command {
        match self.chat.begin_send(self.chat_input.value()) {
            Some(request) => {
                self.chat_input.clear();
                self.chat_scroll = 0;
                Command::SendChat(request)
            }
            None => Command::None,
        }
    }

    fn submit_selection(&mut self, text: &str) -> Command {
        if text.trim().is_empty() {
            return Command::None;
        }
        let (files, notices) = resolve_selection(text, &self.cwd);
        for notice in notices {
            self.notices.push(notice);
        }
        self.submit_files(files)
    }

    fn selected_upload_id(&self) -> Option<crate::upload::UploadId> {
        self.uploads.records().get(self.selected_upload).map(|r| r.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.uploads.records().len();
        self.selected_upload = self.selected_upload.min(len.saturating_sub(1));
    }

    fn focused_input(&mut self) -> &mut InputBuffer {
        match self.focus {
            Focus::Chat => &mut self.chat_input,
            Focus::Upload => &mut self.upload_input,
        }
    }

    /// Push a notice raised outside the session managers.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::{APOLOGY_REPLY, Sender};
    use crate::error::WebhookError;
    use crate::upload::UploadStatus;
    use crate::webhook::ChatReply;

    fn test_flags(cwd: PathBuf) -> Flags {
        Flags {
            greeting: "Hello! I'm your AI assistant. How can I help you today?".to_string(),
            limits: UploadLimits::default(),
            notice_ttl: Duration::from_secs(60),
            cwd,
            chat_host: "chat.example.com".to_string(),
            upload_host: "files.example.com".to_string(),
        }
    }

    fn app() -> DeskApp {
        DeskApp::new(test_flags(PathBuf::from("/nonexistent")))
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Msg {
        Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut DeskApp, text: &str) {
        for c in text.chars() {
            app.update(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn init_creates_valid_state() {
        let app = app();
        assert_eq!(app.focus, Focus::Chat);
        assert_eq!(app.chat.messages().len(), 1);
        assert_eq!(app.chat.messages()[0].sender, Sender::Bot);
        assert!(app.uploads.records().is_empty());
        assert!(app.notices.is_empty());
    }

    #[test]
    fn enter_sends_and_clears_input() {
        let mut app = app();
        type_text(&mut app, "Hello");

        let cmd = app.update(key(KeyCode::Enter));

        match cmd {
            Command::SendChat(request) => assert_eq!(request.message, "Hello"),
            other => panic!("expected SendChat, got {:?}", other),
        }
        assert!(app.chat_input.is_empty());
        assert!(app.chat.awaiting_response());
        assert_eq!(app.chat.messages().last().unwrap().content, "Hello");
    }

    #[test]
    fn enter_with_blank_input_does_nothing() {
        let mut app = app();
        type_text(&mut app, "   ");
        let cmd = app.update(key(KeyCode::Enter));
        assert!(cmd.is_none());
        assert_eq!(app.chat.messages().len(), 1);
    }

    #[test]
    fn enter_while_pending_keeps_input() {
        let mut app = app();
        type_text(&mut app, "first");
        app.update(key(KeyCode::Enter));
        type_text(&mut app, "second");

        let cmd = app.update(key(KeyCode::Enter));

        assert!(cmd.is_none());
        assert_eq!(app.chat_input.value(), "second");
        assert_eq!(app.chat.messages().len(), 2);
    }

    #[test]
    fn chat_settled_appends_reply_and_scrolls_to_bottom() {
        let mut app = app();
        type_text(&mut app, "Hello");
        app.update(key(KeyCode::Enter));
        app.chat_scroll = 7;

        app.update(Msg::App(AppEvent::ChatSettled(Ok(ChatReply {
            response: Some("Hi there".to_string()),
            message: None,
        }))));

        assert!(!app.chat.awaiting_response());
        assert_eq!(app.chat.messages().last().unwrap().content, "Hi there");
        assert_eq!(app.chat_scroll, 0);
        assert!(app.notices.is_empty());
    }

    #[test]
    fn chat_failure_raises_notice() {
        let mut app = app();
        type_text(&mut app, "Hello");
        app.update(key(KeyCode::Enter));

        app.update(Msg::App(AppEvent::ChatSettled(Err(WebhookError::Status {
            status: 500,
        }))));

        assert_eq!(app.chat.messages().last().unwrap().content, APOLOGY_REPLY);
        assert_eq!(app.notices.latest().unwrap().title, "Error");
    }

    #[test]
    fn tab_toggles_focus() {
        let mut app = app();
        app.update(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Upload);
        app.update(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Chat);
    }

    #[test]
    fn typing_goes_to_focused_pane() {
        let mut app = app();
        type_text(&mut app, "hi");
        app.update(key(KeyCode::Tab));
        type_text(&mut app, "*.pdf");
        assert_eq!(app.chat_input.value(), "hi");
        assert_eq!(app.upload_input.value(), "*.pdf");
    }

    #[test]
    fn paste_in_chat_inserts_text() {
        let mut app = app();
        let cmd = app.update(Msg::Paste("pasted".to_string()));
        assert!(cmd.is_none());
        assert_eq!(app.chat_input.value(), "pasted");
    }

    #[test]
    fn upload_enter_submits_typed_paths() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"hello").unwrap();
        let mut app = DeskApp::new(test_flags(tmp.path().to_path_buf()));
        app.update(key(KeyCode::Tab));
        type_text(&mut app, "a.txt");

        let cmd = app.update(key(KeyCode::Enter));

        match cmd {
            Command::StartUploads(jobs) => {
                assert_eq!(jobs.len(), 1);
                assert_eq!(jobs[0].name, "a.txt");
            }
            other => panic!("expected StartUploads, got {:?}", other),
        }
        assert!(app.upload_input.is_empty());
        assert_eq!(app.uploads.records().len(), 1);
    }

    #[test]
    fn paste_in_upload_pane_submits_dropped_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("my photo.png");
        std::fs::write(&path, b"png").unwrap();
        let mut app = DeskApp::new(test_flags(PathBuf::from("/")));
        app.update(key(KeyCode::Tab));

        let pasted = format!("'{}'", path.display());
        let cmd = app.update(Msg::Paste(pasted));

        assert!(matches!(cmd, Command::StartUploads(ref jobs) if jobs.len() == 1));
        assert_eq!(app.uploads.records()[0].name, "my photo.png");
        assert!(app.upload_input.is_empty());
    }

    #[test]
    fn missing_upload_path_raises_notice_only() {
        let mut app = app();
        app.update(key(KeyCode::Tab));
        type_text(&mut app, "nope.txt");
        let cmd = app.update(key(KeyCode::Enter));
        assert!(cmd.is_none());
        assert!(app.uploads.records().is_empty());
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn upload_events_update_records() {
        let mut app = app();
        let cmd = app.submit_files(vec![SelectedFile {
            path: PathBuf::from("/nonexistent/a.bin"),
            name: "a.bin".to_string(),
            size: 10,
        }]);
        let Command::StartUploads(jobs) = cmd else {
            panic!("expected StartUploads");
        };
        let id = jobs[0].id;

        app.update(Msg::App(AppEvent::UploadProgress(id)));
        assert_eq!(app.uploads.get(id).unwrap().progress, 10);

        app.update(Msg::App(AppEvent::UploadSettled { id, result: Ok(()) }));
        let record = app.uploads.get(id).unwrap();
        assert_eq!(record.status, UploadStatus::Success);
        assert_eq!(record.progress, 100);
        assert_eq!(app.notices.latest().unwrap().title, "Success");
    }

    #[test]
    fn ctrl_x_removes_selected_record() {
        let mut app = app();
        app.submit_files(
            ["a", "b"]
                .iter()
                .map(|n| SelectedFile {
                    path: PathBuf::from("/nonexistent").join(n),
                    name: n.to_string(),
                    size: 1,
                })
                .collect(),
        );
        app.update(key(KeyCode::Tab));
        app.update(key(KeyCode::Down));
        assert_eq!(app.selected_upload, 1);

        app.update(ctrl('x'));

        assert_eq!(app.uploads.records().len(), 1);
        assert_eq!(app.uploads.records()[0].name, "a");
        assert_eq!(app.selected_upload, 0);
    }

    #[test]
    fn ctrl_r_on_uploading_record_raises_notice() {
        let mut app = app();
        app.submit_files(vec![SelectedFile {
            path: PathBuf::from("/nonexistent/a"),
            name: "a".to_string(),
            size: 1,
        }]);
        app.update(key(KeyCode::Tab));
        let cmd = app.update(ctrl('r'));
        assert!(cmd.is_none());
        assert_eq!(app.notices.latest().unwrap().title, "Retry");
    }

    #[test]
    fn ctrl_r_retries_failed_record() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"abc").unwrap();
        let mut app = DeskApp::new(test_flags(tmp.path().to_path_buf()));
        app.update(key(KeyCode::Tab));
        type_text(&mut app, "a.txt");
        let Command::StartUploads(jobs) = app.update(key(KeyCode::Enter)) else {
            panic!("expected StartUploads");
        };
        let id = jobs[0].id;
        app.update(Msg::App(AppEvent::UploadSettled {
            id,
            result: Err(WebhookError::Status { status: 502 }),
        }));

        let cmd = app.update(ctrl('r'));

        assert!(matches!(cmd, Command::StartUploads(ref jobs) if jobs[0].id == id));
        assert_eq!(app.uploads.get(id).unwrap().status, UploadStatus::Uploading);
    }

    #[test]
    fn esc_quits_unless_reply_pending() {
        let mut app = app();
        assert!(matches!(app.update(key(KeyCode::Esc)), Command::Quit));

        type_text(&mut app, "hi");
        app.update(key(KeyCode::Enter));
        assert!(app.update(key(KeyCode::Esc)).is_none());
    }

    #[test]
    fn ctrl_q_quits() {
        let mut app = app();
        assert!(matches!(app.update(ctrl('q')), Command::Quit));
    }

    #[test]
    fn single_ctrl_c_clears_input_double_quits() {
        let mut app = app();
        type_text(&mut app, "draft");
        assert!(app.update(ctrl('c')).is_none());
        assert!(app.chat_input.is_empty());
        assert!(matches!(app.update(ctrl('c')), Command::Quit));
    }

    #[test]
    fn scroll_keys_and_mouse_move_chat() {
        let mut app = app();
        app.update(key(KeyCode::PageUp));
        assert_eq!(app.chat_scroll, 10);
        app.update(key(KeyCode::Down));
        assert_eq!(app.chat_scroll, 9);
        app.update(Msg::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(app.chat_scroll, 6);
        app.update(key(KeyCode::PageDown));
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn tick_expires_notices() {
        let mut flags = test_flags(PathBuf::from("/"));
        flags.notice_ttl = Duration::ZERO;
        let mut app = DeskApp::new(flags);
        app.notify(Notice::info("t", "d"));
        app.update(Msg::Tick);
        assert!(app.notices.is_empty());
    }
}
