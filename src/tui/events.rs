// ABOUTME: Merges terminal input, background task events, and a housekeeping tick into one stream.
// ABOUTME: The app loop consumes this stream and feeds each item to DeskApp::update.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::{IntervalStream, ReceiverStream};
use tracing::warn;

use crate::tui::model::Msg;
use crate::tui::state::AppEvent;

/// Translate a crossterm event into a model message. Key releases are dropped.
pub fn terminal_msg(event: Event) -> Option<Msg> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(Msg::Key(key)),
        Event::Mouse(mouse) => Some(Msg::Mouse(mouse)),
        Event::Paste(text) => Some(Msg::Paste(text)),
        Event::Resize(..) => Some(Msg::Resize),
        _ => None,
    }
}

/// Background task events plus a periodic `Msg::Tick`.
pub fn app_stream(rx: mpsc::Receiver<AppEvent>, tick_every: Duration) -> BoxStream<'static, Msg> {
    let app = ReceiverStream::new(rx).map(Msg::App);
    let ticks = IntervalStream::new(tokio::time::interval(tick_every)).map(|_| Msg::Tick);
    Box::pin(stream::select(app, ticks))
}

/// Everything the UI loop reacts to, including the terminal.
pub fn event_stream(rx: mpsc::Receiver<AppEvent>, tick_every: Duration) -> BoxStream<'static, Msg> {
    let terminal = EventStream::new().filter_map(|event| async move {
        match event {
            Ok(event) => terminal_msg(event),
            Err(e) => {
                warn!(error = %e, "terminal event error");
                None
            }
        }
    });
    Box::pin(stream::select(terminal, app_stream(rx, tick_every)))
}
