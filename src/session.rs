//! Headless host for the search box.
//!
//! A session runs a [`Controller`] on tokio: keystrokes come in over a
//! channel, the debounce timer is a tokio sleep, searches run in a
//! [`JoinSet`], and every state change is published as a [`ViewModel`].
//! Dropping the handle (or calling [`SessionHandle::shutdown`]) tears the
//! widget down, clearing the pending timer and aborting in-flight searches.
//!
//! Both hosts share the same [`Controller`] transitions; the timing behaviour
//! (debounce windows, racing searches, teardown mid-flight) is exercised here
//! against tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

use crate::config::Config;
use crate::controller::Controller;
use crate::error::SearchError;
use crate::render::{self, AvatarColors, ViewModel};
use crate::search::{self, SearchClient, SearchRecord};

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub timeout: Option<Duration>,
    pub avatar_colors: AvatarColors,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            timeout: config.search.timeout(),
            avatar_colors: config.display.avatar_colors,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Handle to a running session
pub struct SessionHandle {
    input_tx: mpsc::UnboundedSender<String>,
    view_rx: watch::Receiver<ViewModel>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Send a text-input event (the full new value of the field)
    pub fn input(&self, text: impl Into<String>) {
        if self.input_tx.send(text.into()).is_err() {
            tracing::debug!("input sent to a finished session");
        }
    }

    /// Latest published view
    pub fn view(&self) -> ViewModel {
        self.view_rx.borrow().clone()
    }

    /// Subscribe to view updates
    pub fn watch(&self) -> watch::Receiver<ViewModel> {
        self.view_rx.clone()
    }

    /// Tear the session down and wait for it to stop
    pub async fn shutdown(self) {
        let Self { input_tx, task, .. } = self;
        drop(input_tx);
        if let Err(e) = task.await {
            tracing::warn!("Session task failed: {}", e);
        }
    }
}

/// Start a session on the current tokio runtime.
pub fn spawn(client: Arc<dyn SearchClient>, options: SessionOptions) -> SessionHandle {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(ViewModel::default());
    let task = tokio::spawn(run(client, options, input_rx, view_tx));
    SessionHandle {
        input_tx,
        view_rx,
        task,
    }
}

type Outcome = (u64, Result<Vec<SearchRecord>, SearchError>);

async fn run(
    client: Arc<dyn SearchClient>,
    options: SessionOptions,
    mut inputs: mpsc::UnboundedReceiver<String>,
    view_tx: watch::Sender<ViewModel>,
) {
    let mut controller = Controller::new();
    let mut searches: JoinSet<Outcome> = JoinSet::new();
    // (ticket, deadline) of the armed debounce timer
    let mut timer: Option<(u64, Instant)> = None;

    tracing::info!("Search session started (client={})", client.name());

    loop {
        let armed = timer;
        tokio::select! {
            input = inputs.recv() => match input {
                Some(text) => {
                    if let Some(ticket) = controller.input(text) {
                        timer = Some((ticket, Instant::now() + options.debounce));
                    }
                }
                None => break,
            },
            _ = sleep_until(armed), if armed.is_some() => {
                if let Some((ticket, _)) = timer.take() {
                    if let Some(request) = controller.debounce_elapsed(ticket) {
                        searches.spawn(search::dispatch(
                            Arc::clone(&client),
                            request.generation,
                            request.query,
                            options.timeout,
                        ));
                    }
                }
            },
            Some(joined) = searches.join_next(), if !searches.is_empty() => match joined {
                Ok((generation, outcome)) => {
                    controller.search_finished(generation, outcome);
                }
                Err(e) => {
                    tracing::warn!("Search task panicked: {}", e);
                }
            },
        }

        view_tx.send_replace(render::project(&controller, options.avatar_colors));
    }

    controller.teardown();
    searches.abort_all();
    tracing::info!("Search session stopped");
}

async fn sleep_until(timer: Option<(u64, Instant)>) {
    match timer {
        Some((_, deadline)) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
