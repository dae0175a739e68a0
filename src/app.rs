// App orchestrates source + view state for one mount of the dashboard
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::state::reduce;
use crate::engine::types::{Action, MarketRecord, ViewState};
use crate::market_data::adapters::{FetchResult, MarketSource};
use crate::telemetry::{self, FailureObserver};
use crate::view::Dashboard;

/// One mounted dashboard.
///
/// `mount` starts the only fetch this instance will ever make. The result is
/// handed back over a oneshot channel and applied by whoever drives the event
/// loop, so the state itself is never touched from another task.
pub struct App {
    state: ViewState,
    observer: Arc<dyn FailureObserver>,
    pending: Option<oneshot::Receiver<FetchResult<Vec<MarketRecord>>>>,
    fetch_task: JoinHandle<()>,
}

impl App {
    pub fn mount(source: Arc<dyn MarketSource>, observer: Arc<dyn FailureObserver>) -> Self {
        let (tx, rx) = oneshot::channel();
        let fetch_task = tokio::spawn(async move {
            let result = source.fetch_top_markets().await;
            if tx.send(result).is_err() {
                // receiver went away with the unmounted app
                debug!("Discarding fetch result for unmounted dashboard");
            }
        });
        info!("Dashboard mounted, fetch started");

        Self { state: ViewState::new(), observer, pending: Some(rx), fetch_task }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_state(&self.state)
    }

    pub fn fetch_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the mount-time fetch to finish. Resolves to `None` when no
    /// fetch is outstanding or the fetch task died without answering.
    pub async fn next_fetch_result(&mut self) -> Option<FetchResult<Vec<MarketRecord>>> {
        let rx = self.pending.as_mut()?;
        let result = rx.await;
        self.pending = None;
        match result {
            Ok(result) => Some(result),
            Err(_) => {
                warn!("Fetch task ended without a result");
                None
            }
        }
    }

    /// Commit a fetch result, reporting failures to the observer once.
    pub fn apply_fetch(&mut self, result: FetchResult<Vec<MarketRecord>>) {
        if !self.state.mounted {
            debug!("Ignoring fetch result after unmount");
            return;
        }
        match &result {
            Ok(records) => telemetry::record_fetch_success(records.len()),
            Err(err) => self.observer.fetch_failed(err),
        }
        self.dispatch(Action::FetchCompleted(result));
    }

    /// Await the mount-time fetch and apply it. Returns false if there was none.
    pub async fn settle(&mut self) -> bool {
        match self.next_fetch_result().await {
            Some(result) => {
                self.apply_fetch(result);
                true
            }
            None => false,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Tear down: an in-flight request is cancelled and later results are
    /// dropped, never applied.
    pub fn unmount(&mut self) {
        self.dispatch(Action::Unmount);
        self.pending = None;
        self.fetch_task.abort();
        info!("Dashboard unmounted");
    }
}
