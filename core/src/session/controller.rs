use crate::config::SessionConfig;
use crate::history::HistoryBuffer;
use crate::params::{ParamField, ParameterStore};
use crate::prelude::{TransportError, ValidationResult};
use crate::render::{RenderSink, RenderUpdate};
use crate::session::command::SessionCommand;
use crate::session::state::SessionState;
use crate::stream::{Connector, StreamConnection, StreamEvent};
use crate::telemetry::SessionMetrics;
use crate::wire::{Frame, StreamUpdate};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Owns the session lifecycle: parameters, the single live subscription, the
/// stats history and the sink it feeds.
///
/// The connection handle never leaves this type. At most one is held, and it
/// is closed on every path out of `Connecting`/`Playing`, including drop.
pub struct SessionController<C: Connector, S: RenderSink> {
    store: ParameterStore,
    connector: C,
    sink: S,
    state: SessionState,
    connection: Option<StreamConnection>,
    history: HistoryBuffer,
    latest_frame: Option<Arc<Frame>>,
    metrics: Arc<SessionMetrics>,
}

impl<C: Connector, S: RenderSink> SessionController<C, S> {
    pub fn new(store: ParameterStore, history_capacity: usize, connector: C, sink: S) -> Self {
        Self {
            store,
            connector,
            sink,
            state: SessionState::Idle,
            connection: None,
            history: HistoryBuffer::with_capacity(history_capacity),
            latest_frame: None,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    pub fn from_config(config: &SessionConfig, connector: C, sink: S) -> ValidationResult<Self> {
        let store = ParameterStore::new(config.parameters)?;
        Ok(Self::new(store, config.history_capacity, connector, sink))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn params(&self) -> &ParameterStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn latest_frame(&self) -> Option<&Frame> {
        self.latest_frame.as_deref()
    }

    pub fn has_live_connection(&self) -> bool {
        self.connection.as_ref().is_some_and(StreamConnection::is_open)
    }

    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Edits take effect on the next `start`; a live stream keeps its parameters.
    pub fn set_param(&mut self, field: ParamField, value: f64) -> ValidationResult<()> {
        self.store.set(field, value)
    }

    pub fn set_param_text(&mut self, field: ParamField, input: &str) -> ValidationResult<()> {
        self.store.set_text(field, input)
    }

    pub fn start(&mut self) {
        if self.state.is_live() {
            self.stop();
        }
        self.history.clear();
        let params = self.store.get();
        let connection = self.connector.open(&params);
        self.metrics.record_connection();
        info!(
            "session connecting on stream {} (population {}, beta {}, gamma {})",
            connection.id(),
            params.population_size,
            params.transmission_rate,
            params.recovery_rate
        );
        self.connection = Some(connection);
        self.transition(SessionState::Connecting);
    }

    /// Closes the stream and keeps the last frame and history for inspection.
    pub fn stop(&mut self) {
        self.close_connection();
        self.transition(SessionState::Idle);
    }

    pub fn reset(&mut self) {
        self.close_connection();
        self.history.clear();
        self.latest_frame = None;
        self.sink.on_cleared();
        self.transition(SessionState::Idle);
    }

    /// Next event from the live subscription. Pends forever while there is none.
    pub async fn next_event(&mut self) -> StreamEvent {
        match self.connection.as_mut() {
            Some(connection) => connection
                .recv()
                .await
                .unwrap_or(StreamEvent::Failed(TransportError::Ended)),
            None => std::future::pending().await,
        }
    }

    pub fn handle_event(&mut self, event: StreamEvent) {
        if !self.state.is_live() {
            debug!("ignoring stream event while {}", self.state);
            return;
        }
        match event {
            StreamEvent::Opened => self.enter_playing(),
            StreamEvent::Update(update) => {
                self.enter_playing();
                self.ingest(update);
            }
            StreamEvent::Skipped(err) => {
                warn!("skipped stream event: {}", err);
                self.metrics.record_skipped();
            }
            StreamEvent::Failed(err) => self.fail(err),
        }
    }

    pub fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetParam { field, value } => {
                if let Err(err) = self.set_param_text(field, &value) {
                    warn!("rejected parameter edit: {}", err);
                    self.sink.on_param_rejected(&err);
                }
            }
            SessionCommand::Start => self.start(),
            SessionCommand::Stop | SessionCommand::Shutdown => self.stop(),
            SessionCommand::Reset => self.reset(),
        }
    }

    /// Drives the controller until `Shutdown` arrives or every handle is dropped.
    /// Commands win over pending stream events so a `stop` is never delayed by backlog.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) -> Self {
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::Shutdown) | None => break,
                        Some(command) => self.apply(command),
                    }
                }
                event = self.next_event() => self.handle_event(event),
            }
        }
        self.stop();
        info!("session actor stopped");
        self
    }

    fn enter_playing(&mut self) {
        if self.state == SessionState::Connecting {
            self.transition(SessionState::Playing);
        }
    }

    fn ingest(&mut self, update: StreamUpdate) {
        let frame = Arc::new(update.frame);
        self.latest_frame = Some(Arc::clone(&frame));
        self.history.append(update.stats);
        self.metrics.record_update();
        self.sink.on_update(RenderUpdate {
            frame,
            history: self.history.snapshot(),
        });
    }

    fn fail(&mut self, err: TransportError) {
        self.close_connection();
        self.metrics.record_transport_error();
        error!("session stream failed: {}", err);
        self.transition(SessionState::Error(err.to_string()));
    }

    fn close_connection(&mut self) -> bool {
        match self.connection.take() {
            Some(mut connection) => connection.close(),
            None => false,
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        info!("session {} -> {}", self.state, next);
        self.state = next;
        self.sink.on_state(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SimulationParameters;
    use crate::prelude::MessageParseError;
    use crate::render::{ChannelSink, RenderNotice};
    use crate::wire::{AgentState, AgentStatus, StatsSample};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct ScriptedConnector {
        opened: Arc<Mutex<Vec<(SimulationParameters, mpsc::Sender<StreamEvent>)>>>,
    }

    impl ScriptedConnector {
        fn sender(&self, index: usize) -> mpsc::Sender<StreamEvent> {
            self.opened.lock().unwrap()[index].1.clone()
        }

        fn params(&self, index: usize) -> SimulationParameters {
            self.opened.lock().unwrap()[index].0
        }

        fn count(&self) -> usize {
            self.opened.lock().unwrap().len()
        }
    }

    impl Connector for ScriptedConnector {
        fn open(&mut self, params: &SimulationParameters) -> StreamConnection {
            let (tx, rx) = mpsc::channel(256);
            let mut opened = self.opened.lock().unwrap();
            opened.push((*params, tx));
            StreamConnection::new(opened.len() as u64, rx, None)
        }
    }

    type Controller = SessionController<ScriptedConnector, ChannelSink>;

    fn controller(
        capacity: usize,
    ) -> (
        Controller,
        ScriptedConnector,
        mpsc::UnboundedReceiver<RenderNotice>,
    ) {
        let connector = ScriptedConnector::default();
        let (sink, notices) = ChannelSink::new();
        let controller = SessionController::new(
            ParameterStore::default(),
            capacity,
            connector.clone(),
            sink,
        );
        (controller, connector, notices)
    }

    fn update(step: u64) -> StreamUpdate {
        StreamUpdate {
            frame: Frame {
                step,
                agents: vec![AgentState {
                    x: step as f64,
                    y: 250.0,
                    status: AgentStatus::Infected,
                }],
            },
            stats: StatsSample::new(step, 197, 3, step),
        }
    }

    fn drain(notices: &mut mpsc::UnboundedReceiver<RenderNotice>) -> Vec<RenderNotice> {
        let mut out = Vec::new();
        while let Ok(notice) = notices.try_recv() {
            out.push(notice);
        }
        out
    }

    async fn pump(controller: &mut Controller, events: usize) {
        for _ in 0..events {
            let event = controller.next_event().await;
            controller.handle_event(event);
        }
    }

    #[tokio::test]
    async fn three_events_fill_history_in_order() {
        let (mut controller, connector, mut notices) = controller(100);
        controller.set_param(ParamField::PopulationSize, 200.0).unwrap();
        controller.set_param(ParamField::TransmissionRate, 0.2).unwrap();
        controller.set_param(ParamField::RecoveryRate, 0.05).unwrap();
        controller.set_param(ParamField::MovementSpeed, 3.0).unwrap();
        controller.start();
        assert_eq!(controller.state(), &SessionState::Connecting);
        assert_eq!(connector.params(0).population_size, 200);

        let tx = connector.sender(0);
        for step in 1..=3 {
            tx.send(StreamEvent::Update(update(step))).await.unwrap();
        }
        pump(&mut controller, 3).await;

        assert_eq!(controller.state(), &SessionState::Playing);
        assert_eq!(
            controller.history().snapshot(),
            vec![update(1).stats, update(2).stats, update(3).stats]
        );
        assert_eq!(controller.latest_frame().map(|f| f.step), Some(3));

        let notices = drain(&mut notices);
        assert_eq!(notices[0], RenderNotice::State(SessionState::Connecting));
        assert_eq!(notices[1], RenderNotice::State(SessionState::Playing));
        let steps: Vec<u64> = notices
            .iter()
            .filter_map(|notice| match notice {
                RenderNotice::Update(update) => Some(update.frame.step),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn overflow_drops_oldest_samples() {
        let (mut controller, connector, _notices) = controller(100);
        controller.start();
        let tx = connector.sender(0);
        tx.send(StreamEvent::Opened).await.unwrap();
        pump(&mut controller, 1).await;
        for step in 1..=150 {
            tx.send(StreamEvent::Update(update(step))).await.unwrap();
            pump(&mut controller, 1).await;
        }
        let snapshot = controller.history().snapshot();
        assert_eq!(snapshot.len(), 100);
        assert_eq!(snapshot[0].step, 51);
        assert_eq!(controller.latest_frame().map(|f| f.step), Some(150));
    }

    #[tokio::test]
    async fn restart_closes_previous_connection_first() {
        let (mut controller, connector, _notices) = controller(10);
        controller.start();
        let first = connector.sender(0);
        assert!(!first.is_closed());

        controller.start();
        assert_eq!(connector.count(), 2);
        assert!(first.is_closed());
        assert!(!connector.sender(1).is_closed());
        assert!(controller.has_live_connection());
        assert_eq!(controller.metrics().snapshot().connections_opened, 2);
    }

    #[tokio::test]
    async fn reset_from_any_state_returns_to_clean_idle() {
        for target in ["idle", "connecting", "playing", "error"] {
            let (mut controller, connector, _notices) = controller(10);
            if target != "idle" {
                controller.start();
                let tx = connector.sender(0);
                match target {
                    "playing" => tx.send(StreamEvent::Update(update(1))).await.unwrap(),
                    "error" => tx
                        .send(StreamEvent::Failed(TransportError::Status(500)))
                        .await
                        .unwrap(),
                    _ => {}
                }
                if target != "connecting" {
                    pump(&mut controller, 1).await;
                }
            }

            controller.reset();
            assert_eq!(controller.state(), &SessionState::Idle, "from {target}");
            assert!(controller.history().is_empty());
            assert!(controller.latest_frame().is_none());
            assert!(!controller.has_live_connection());
            if connector.count() > 0 {
                assert!(connector.sender(0).is_closed());
            }
        }
    }

    #[tokio::test]
    async fn malformed_event_is_skipped_without_state_change() {
        let (mut controller, connector, _notices) = controller(10);
        controller.start();
        let tx = connector.sender(0);
        tx.send(StreamEvent::Update(update(1))).await.unwrap();
        tx.send(StreamEvent::Skipped(MessageParseError::InvalidJson(
            "EOF while parsing".into(),
        )))
        .await
        .unwrap();
        tx.send(StreamEvent::Update(update(2))).await.unwrap();

        pump(&mut controller, 2).await;
        assert_eq!(controller.state(), &SessionState::Playing);
        pump(&mut controller, 1).await;
        assert_eq!(controller.state(), &SessionState::Playing);
        assert_eq!(controller.history().len(), 2);
        assert_eq!(controller.metrics().snapshot().messages_skipped, 1);
    }

    #[tokio::test]
    async fn stop_before_first_message_never_renders() {
        let (mut controller, connector, mut notices) = controller(10);
        controller.start();
        controller.stop();
        assert_eq!(controller.state(), &SessionState::Idle);
        assert!(connector.sender(0).is_closed());
        assert!(!controller.has_live_connection());
        assert!(drain(&mut notices)
            .iter()
            .all(|notice| !matches!(notice, RenderNotice::Update(_))));
    }

    #[tokio::test]
    async fn stop_preserves_last_frame_and_reset_clears_it() {
        let (mut controller, connector, mut notices) = controller(10);
        controller.start();
        connector
            .sender(0)
            .send(StreamEvent::Update(update(4)))
            .await
            .unwrap();
        pump(&mut controller, 1).await;

        controller.stop();
        assert_eq!(controller.latest_frame().map(|f| f.step), Some(4));
        assert_eq!(controller.history().len(), 1);

        controller.reset();
        assert!(controller.latest_frame().is_none());
        assert!(drain(&mut notices).contains(&RenderNotice::Cleared));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_once_and_allows_restart() {
        let (mut controller, connector, mut notices) = controller(10);
        controller.start();
        let tx = connector.sender(0);
        tx.send(StreamEvent::Failed(TransportError::Dropped("reset by peer".into())))
            .await
            .unwrap();
        pump(&mut controller, 1).await;

        assert_eq!(
            controller.state(),
            &SessionState::Error("stream dropped: reset by peer".into())
        );
        assert!(tx.is_closed());
        controller.handle_event(StreamEvent::Update(update(9)));
        assert!(controller.latest_frame().is_none());

        let errors = drain(&mut notices)
            .into_iter()
            .filter(|notice| matches!(notice, RenderNotice::State(SessionState::Error(_))))
            .count();
        assert_eq!(errors, 1);
        assert_eq!(controller.metrics().snapshot().transport_errors, 1);

        controller.start();
        assert_eq!(controller.state(), &SessionState::Connecting);
        assert_eq!(connector.count(), 2);
    }

    #[tokio::test]
    async fn producer_vanishing_counts_as_ended_stream() {
        let (mut controller, connector, _notices) = controller(10);
        controller.start();
        drop(connector.opened.lock().unwrap().pop());
        pump(&mut controller, 1).await;
        assert_eq!(
            controller.state(),
            &SessionState::Error(TransportError::Ended.to_string())
        );
    }

    #[tokio::test]
    async fn edits_apply_to_the_next_start_only() {
        let (mut controller, connector, mut notices) = controller(10);
        controller.start();
        controller.apply(SessionCommand::SetParam {
            field: ParamField::RecoveryRate,
            value: "0.3".into(),
        });
        controller.apply(SessionCommand::SetParam {
            field: ParamField::RecoveryRate,
            value: "1.5".into(),
        });
        assert_eq!(connector.params(0).recovery_rate, 0.05);
        assert_eq!(controller.params().get().recovery_rate, 0.3);
        assert!(drain(&mut notices)
            .iter()
            .any(|notice| matches!(notice, RenderNotice::Rejected(_))));

        controller.start();
        assert_eq!(connector.params(1).recovery_rate, 0.3);
    }

    #[tokio::test]
    async fn actor_processes_commands_and_events_in_order() {
        let (controller, connector, mut notices) = controller(10);
        let (handle, commands) = crate::session::SessionHandle::channel();
        let actor = tokio::spawn(controller.run(commands));

        assert!(handle.start());
        assert_eq!(
            notices.recv().await,
            Some(RenderNotice::State(SessionState::Connecting))
        );
        let tx = connector.sender(0);
        tx.send(StreamEvent::Opened).await.unwrap();
        tx.send(StreamEvent::Update(update(1))).await.unwrap();
        tx.send(StreamEvent::Update(update(2))).await.unwrap();

        assert_eq!(
            notices.recv().await,
            Some(RenderNotice::State(SessionState::Playing))
        );
        for step in 1..=2 {
            match notices.recv().await {
                Some(RenderNotice::Update(update)) => assert_eq!(update.frame.step, step),
                other => panic!("unexpected notice {other:?}"),
            }
        }

        assert!(handle.stop());
        assert_eq!(
            notices.recv().await,
            Some(RenderNotice::State(SessionState::Idle))
        );
        assert!(handle.shutdown());
        let controller = actor.await.unwrap();
        assert_eq!(controller.state(), &SessionState::Idle);
        assert_eq!(controller.history().len(), 2);
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn actor_stop_discards_queued_backlog() {
        let (controller, connector, mut notices) = controller(100);
        let (handle, commands) = crate::session::SessionHandle::channel();
        let actor = tokio::spawn(controller.run(commands));

        assert!(handle.start());
        assert_eq!(
            notices.recv().await,
            Some(RenderNotice::State(SessionState::Connecting))
        );
        let tx = connector.sender(0);
        for step in 1..=20 {
            tx.send(StreamEvent::Update(update(step))).await.unwrap();
        }
        assert!(handle.stop());
        assert!(handle.shutdown());

        let controller = actor.await.unwrap();
        let seen = drain(&mut notices);
        assert_eq!(seen, vec![RenderNotice::State(SessionState::Idle)]);
        assert!(controller.history().is_empty());
        assert!(controller.latest_frame().is_none());
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn actor_closes_connection_when_handles_drop() {
        let (controller, connector, mut notices) = controller(10);
        let (handle, commands) = crate::session::SessionHandle::channel();
        let actor = tokio::spawn(controller.run(commands));

        assert!(handle.start());
        assert_eq!(
            notices.recv().await,
            Some(RenderNotice::State(SessionState::Connecting))
        );
        let tx = connector.sender(0);
        drop(handle);

        let controller = actor.await.unwrap();
        assert_eq!(controller.state(), &SessionState::Idle);
        assert!(!controller.has_live_connection());
        assert!(tx.is_closed());
    }
}
