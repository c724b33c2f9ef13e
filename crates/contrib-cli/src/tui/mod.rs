//! Interactive view. The controller runs on a tokio task; this thread owns
//! the terminal, forwards keys as [`Signal`]s and repaints from the latest
//! [`ViewFrame`].

mod app;
mod ui;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use contrib_sync::{
    host_ready, run as run_controller, Signal, SyncController, ViewFrame, WatchObserver,
};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cmd_fetch::{collaborators, ApiOptions};
use crate::settings_file;
use app::{viewport_for, App};

/// `contrib-graph show`
pub fn run(config: &Path, api: &ApiOptions) -> anyhow::Result<()> {
    let settings = settings_file::load(config)?;
    let rt = tokio::runtime::Runtime::new()?;

    let (observer, frames) = WatchObserver::channel(settings.clone());
    let (cols, rows) = crossterm::terminal::size()?;
    let mut ctl = SyncController::new(
        collaborators(api, Arc::new(observer)),
        settings.clone(),
        viewport_for(cols, rows),
    );

    let (tx, mut rx) = mpsc::channel(32);
    let (ready_handle, ready) = host_ready();
    let cancel = CancellationToken::new();
    let task = rt.spawn({
        let cancel = cancel.clone();
        async move { run_controller(&mut ctl, ready, &mut rx, cancel).await }
    });

    let mut terminal = ratatui::init();
    ready_handle.resolve();
    let result = event_loop(&mut terminal, App::new(settings), frames, &tx);
    ratatui::restore();

    cancel.cancel();
    if let Err(e) = rt.block_on(task) {
        warn!(target: "contrib::cli", error = %e, "controller task failed");
    }
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App,
    mut frames: watch::Receiver<ViewFrame>,
    tx: &mpsc::Sender<Signal>,
) -> anyhow::Result<()> {
    loop {
        app.update(frames.borrow_and_update().clone());
        terminal.draw(|f| ui::render(f, &app))?;

        if event::poll(Duration::from_millis(250))? {
            let signal = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(cols, rows) => Some(Signal::Resize(viewport_for(cols, rows))),
                _ => None,
            };
            if let Some(signal) = signal {
                // The controller drains one signal at a time; a full queue
                // means it is mid-load and the key is dropped.
                if let Err(e) = tx.try_send(signal) {
                    warn!(target: "contrib::cli", error = %e, "signal dropped");
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
