//! Session task: the one place view state is mutated.
//!
//! A `Session` owns the `ViewState` and runs as a single tokio task. Viewer
//! interactions and reload requests arrive as commands on a channel;
//! enrichment passes run on their own tasks and report back with their load
//! ticket. After every change the session publishes a fresh snapshot, so
//! readers always see a whole, sorted list.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::enrich::{CrossingEnricher, EnrichError, EnrichmentReport};
use crate::domain::LatLng;
use crate::feed::CrossingSource;
use crate::places::{GeoUnavailableError, Geolocator};

use super::interaction::{Interaction, MapDirective};
use super::state::{LoadTicket, ViewConfig, ViewSnapshot, ViewState};

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 64;

/// Returned when talking to a session that has stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session has shut down")]
pub struct SessionClosed;

/// Requests to the session task.
#[derive(Debug)]
enum Command {
    Interact(Interaction),
    /// Result of the session-start geolocation.
    InitialPosition(Result<LatLng, GeoUnavailableError>),
    Reload,
}

/// A finished enrichment pass.
struct Completion {
    ticket: LoadTicket,
    result: Result<EnrichmentReport, EnrichError>,
}

/// The coordinating task for one viewer session.
pub struct Session<S> {
    state: ViewState,
    enricher: Arc<CrossingEnricher<S>>,
    snapshots: watch::Sender<ViewSnapshot>,
    directives: mpsc::UnboundedSender<MapDirective>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<S: CrossingSource + 'static> Session<S> {
    /// Start a session.
    ///
    /// Immediately begins loading crossings and, in parallel, asks the
    /// geolocator where the viewer is. Must be called within a tokio runtime.
    pub fn spawn<G: Geolocator + 'static>(
        enricher: Arc<CrossingEnricher<S>>,
        geolocator: Arc<G>,
        config: &ViewConfig,
    ) -> SessionHandle {
        let state = ViewState::new(config);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let (directive_tx, directive_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let session = Session {
            state,
            enricher,
            snapshots: snapshot_tx,
            directives: directive_tx,
            completions: completion_tx,
        };

        let geo_tx = command_tx.clone();
        tokio::spawn(async move {
            let result = geolocator.locate().await;
            let _ = geo_tx.send(Command::InitialPosition(result)).await;
        });

        let task = tokio::spawn(session.run(command_rx, completion_rx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            directives: directive_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        self.start_load();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Interact(interaction)) => {
                        let directive = self.state.apply(interaction);
                        self.direct(directive);
                    }
                    Some(Command::InitialPosition(result)) => {
                        let directive = self.state.apply_initial_position(result);
                        self.direct(directive);
                    }
                    Some(Command::Reload) => self.start_load(),
                    None => break,
                },
                Some(done) = completions.recv() => {
                    self.state.complete_load(done.ticket, done.result);
                }
            }
            self.publish();
        }

        debug!("Session closed");
    }

    fn start_load(&mut self) {
        let ticket = self.state.begin_load();
        self.publish();

        let enricher = Arc::clone(&self.enricher);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = enricher.enrich().await;
            let _ = completions.send(Completion { ticket, result });
        });
    }

    fn direct(&self, directive: Option<MapDirective>) {
        if let Some(directive) = directive {
            let _ = self.directives.send(directive);
        }
    }

    fn publish(&self) {
        // send_replace never fails, even with no receivers left.
        self.snapshots.send_replace(self.state.snapshot());
    }
}

/// Handle for driving a running session.
///
/// Dropping the handle shuts the session down.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<ViewSnapshot>,
    directives: mpsc::UnboundedReceiver<MapDirective>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Forward a viewer interaction.
    pub async fn interact(&self, interaction: Interaction) -> Result<(), SessionClosed> {
        self.commands
            .send(Command::Interact(interaction))
            .await
            .map_err(|_| SessionClosed)
    }

    /// Discard the current list and load it again.
    pub async fn reload(&self) -> Result<(), SessionClosed> {
        info!("Reloading crossings");
        self.commands
            .send(Command::Reload)
            .await
            .map_err(|_| SessionClosed)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until a snapshot satisfies `predicate`, and return it.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&ViewSnapshot) -> bool,
    ) -> Result<ViewSnapshot, SessionClosed> {
        self.snapshots
            .wait_for(predicate)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| SessionClosed)
    }

    /// Wait until the current load has finished, successfully or not.
    pub async fn wait_until_settled(&mut self) -> Result<ViewSnapshot, SessionClosed> {
        self.wait_for(|s| s.phase.is_settled()).await
    }

    /// Next recenter directive for the map, if the session is still running.
    pub async fn next_directive(&mut self) -> Option<MapDirective> {
        self.directives.recv().await
    }

    /// A pending directive, without waiting.
    pub fn try_next_directive(&mut self) -> Option<MapDirective> {
        self.directives.try_recv().ok()
    }

    /// Stop the session and wait for its task to finish.
    pub async fn shutdown(self) {
        let SessionHandle { commands, task, .. } = self;
        drop(commands);
        let _ = task.await;
    }
}
