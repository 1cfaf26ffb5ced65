use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::debounce::Debouncer;
use super::encoder::{EncodingError, QrEncoder};
use super::generator::Generator;
use super::notify::Notification;
use super::settings::PanelSettings;
use super::state::{Edit, GenerationRequest, GenerationResult, PanelState, Resolution};

type Outcome = (u64, Result<GenerationResult, EncodingError>);

#[derive(Debug)]
pub(crate) enum PanelCommand {
    Edit(String),
}

/// Cheap, cloneable front door to a running [`PanelService`].
///
/// Dropping every handle stops the service.
#[derive(Clone)]
pub(crate) struct PanelHandle {
    commands: mpsc::UnboundedSender<PanelCommand>,
    snapshots: watch::Receiver<PanelState>,
}

impl PanelHandle {
    pub(crate) fn edit(&self, text: impl Into<String>) {
        if self.commands.send(PanelCommand::Edit(text.into())).is_err() {
            warn!("panel service has stopped; dropping edit");
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.snapshots.clone()
    }
}

/// Event loop that owns the panel state: debounces edits, runs encodes on
/// the blocking pool and applies only the outcome of the latest request.
pub(crate) struct PanelService<E> {
    state: PanelState,
    debouncer: Debouncer<GenerationRequest>,
    generator: Generator<E>,
    in_flight: JoinSet<Outcome>,
    commands: mpsc::UnboundedReceiver<PanelCommand>,
    snapshots: watch::Sender<PanelState>,
    notifications: mpsc::UnboundedSender<Notification>,
}

pub(crate) fn panel_service<E: QrEncoder>(
    encoder: Arc<E>,
    settings: &PanelSettings,
) -> (
    PanelService<E>,
    PanelHandle,
    mpsc::UnboundedReceiver<Notification>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(PanelState::default());
    let (notification_tx, notification_rx) = mpsc::unbounded_channel();

    let service = PanelService {
        state: PanelState::default(),
        debouncer: Debouncer::new(settings.debounce()),
        generator: Generator::new(encoder, settings.qr.clone()),
        in_flight: JoinSet::new(),
        commands: command_rx,
        snapshots: snapshot_tx,
        notifications: notification_tx,
    };
    let handle = PanelHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    };

    (service, handle, notification_rx)
}

impl<E: QrEncoder> PanelService<E> {
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(PanelCommand::Edit(text)) => self.on_edit(text),
                    None => break,
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok((seq, outcome)) => self.on_outcome(seq, outcome),
                        Err(err) => {
                            error!(?err, "QR encode task did not complete");
                            self.notify(Notification::generation_failed());
                        }
                    }
                }
                request = self.debouncer.fire() => self.start(request),
            }
        }

        debug!(in_flight = self.in_flight.len(), "panel service stopped");
    }

    fn on_edit(&mut self, text: String) {
        match self.state.edit(text) {
            Edit::Unchanged => return,
            Edit::Cleared => {
                if let Some(request) = self.debouncer.cancel() {
                    debug!(seq = request.seq, "blank input cancelled pending generation");
                }
            }
            Edit::Scheduled(request) => {
                debug!(
                    seq = request.seq,
                    restarted = self.debouncer.is_pending(),
                    "generation scheduled"
                );
                self.debouncer.schedule(request);
            }
        }
        self.publish();
    }

    fn start(&mut self, request: GenerationRequest) {
        debug!(seq = request.seq, "quiet period elapsed, encoding");
        let generator = self.generator.clone();
        self.in_flight
            .spawn_blocking(move || generator.generate_request(request));
    }

    fn on_outcome(&mut self, seq: u64, outcome: Result<GenerationResult, EncodingError>) {
        let failure = outcome.as_ref().err().map(ToString::to_string);

        match self.state.resolve(seq, outcome) {
            Resolution::Applied => {
                info!(seq, chars = self.state.text().chars().count(), "QR code generated");
            }
            Resolution::Failed => {
                error!(seq, error = failure.as_deref().unwrap_or_default(), "Error generating QR code");
                self.notify(Notification::generation_failed());
            }
            Resolution::Superseded => {
                debug!(seq, latest = self.state.latest_seq(), "discarding superseded result");
                return;
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("no notification listener attached");
        }
    }
}
