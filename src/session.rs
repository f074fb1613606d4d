//! The session task that owns the [`Controller`] for the server's lifetime.
//!
//! Handlers never touch the state directly. They send refresh commands over
//! an mpsc channel and read snapshots from a watch channel. Fetches run as
//! spawned tasks and report back to the session task, which is the only
//! place state transitions happen.

use crate::api::{NewsProvider, fetch_news};
use crate::controller::{Controller, RefreshTicket, UiState};
use crate::error::FetchError;
use crate::models::FetchOutcome;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

#[derive(Debug)]
enum Command {
    Refresh,
}

type Settled = (RefreshTicket, Result<FetchOutcome, FetchError>);

/// Cheap, cloneable access to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<UiState>,
}

impl SessionHandle {
    /// Ask the session to start a new fetch.
    pub fn refresh(&self) {
        if self.commands.send(Command::Refresh).is_err() {
            debug!("Session task has stopped; ignoring refresh");
        }
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every published state.
    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.clone()
    }
}

/// Start a session and its initial fetch.
///
/// The first published state is already `Loading`.
pub fn spawn_session<P>(provider: Arc<P>) -> SessionHandle
where
    P: NewsProvider + Send + Sync + 'static,
{
    let mut controller = Controller::new();
    let first = controller.begin_refresh();
    let (state_tx, state_rx) = watch::channel(controller.state().clone());
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    tokio::spawn(run(controller, provider, first, command_rx, state_tx));

    SessionHandle {
        commands: command_tx,
        state: state_rx,
    }
}

#[instrument(level = "info", skip_all)]
async fn run<P>(
    mut controller: Controller,
    provider: Arc<P>,
    first: RefreshTicket,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<UiState>,
) where
    P: NewsProvider + Send + Sync + 'static,
{
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled>();
    spawn_fetch(Arc::clone(&provider), first, settled_tx.clone());

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Refresh) => {
                    let ticket = controller.begin_refresh();
                    state_tx.send_replace(controller.state().clone());
                    spawn_fetch(Arc::clone(&provider), ticket, settled_tx.clone());
                }
                None => break,
            },
            Some((ticket, result)) = settled_rx.recv() => {
                if controller.settle(ticket, result) {
                    state_tx.send_replace(controller.state().clone());
                }
            }
        }
    }

    info!("All session handles dropped; session finished");
}

fn spawn_fetch<P>(provider: Arc<P>, ticket: RefreshTicket, settled: mpsc::UnboundedSender<Settled>)
where
    P: NewsProvider + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = fetch_news(provider.as_ref()).await;
        debug!(ticket = ticket.generation(), ok = result.is_ok(), "Fetch settled");
        let _ = settled.send((ticket, result));
    });
}
