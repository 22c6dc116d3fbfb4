//! Stale-while-revalidate orchestration of the rates pipeline.
//!
//! The orchestrator serves cached rates immediately, refreshes in the
//! background once they are past their TTL, and keeps at most one network
//! fetch in flight. Consumers only ever see a [`RatesSnapshot`]; failures
//! become an error string, cached data survives them, and cancelled
//! (superseded) requests are swallowed silently.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::cache::{RatesCache, now_ms};
use crate::core::online::OnlineMonitor;
use crate::core::rates::RateTable;
use crate::providers::RatesProvider;
use crate::providers::http::FetchError;

pub const NO_DATA_OFFLINE_ERROR: &str = "No network and no cached rates.";
pub const OFFLINE_RELOAD_ERROR: &str = "Offline: cannot refresh";

/// Consumer-facing state: the current table, when it was fetched, and
/// whether a user-visible fetch is running.
#[derive(Debug, Clone, Default)]
pub struct RatesSnapshot {
    pub data: Option<RateTable>,
    pub updated_at: Option<i64>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct FetchOptions {
    /// Surface a loading state to the consumer; background refreshes don't.
    force_loading: bool,
    /// Error to publish when offline instead of attempting the network.
    offline_message: Option<&'static str>,
}

pub struct RatesOrchestrator {
    provider: Arc<dyn RatesProvider>,
    cache: RatesCache,
    online: Arc<OnlineMonitor>,
    state: Mutex<RatesSnapshot>,
    in_flight: AtomicBool,
    current_cancel: Mutex<Option<CancellationToken>>,
}

impl RatesOrchestrator {
    pub fn new(
        provider: Arc<dyn RatesProvider>,
        cache: RatesCache,
        online: Arc<OnlineMonitor>,
    ) -> Self {
        Self {
            provider,
            cache,
            online,
            state: Mutex::new(RatesSnapshot::default()),
            in_flight: AtomicBool::new(false),
            current_cancel: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> RatesSnapshot {
        self.state.lock().unwrap().clone()
    }

    /// Initial mount: cache-first, then refresh only when stale and online.
    pub async fn start(&self) {
        if let Some(entry) = self.cache.read() {
            let stale = self.cache.is_stale(&entry);
            debug!(stale, source = ?entry.source, "Serving cached rates");
            self.publish_data(entry.payload, entry.timestamp);

            if self.online.is_online() && stale {
                self.run_fetch(FetchOptions::default()).await;
            }
            return;
        }

        if !self.online.is_online() {
            self.publish_error(NO_DATA_OFFLINE_ERROR.to_string());
            return;
        }

        self.run_fetch(FetchOptions {
            force_loading: true,
            ..Default::default()
        })
        .await;
    }

    /// Manual refresh: always fetches, regardless of TTL.
    pub async fn reload(&self) {
        self.run_fetch(FetchOptions {
            force_loading: true,
            offline_message: Some(OFFLINE_RELOAD_ERROR),
        })
        .await;
    }

    /// Re-run the mount logic whenever connectivity flips, so coming back
    /// online picks up stale caches and going offline surfaces the right
    /// error. The task ends when the monitor is dropped.
    pub fn spawn_online_watcher(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        let mut receiver = this.online.subscribe();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                debug!(
                    online = receiver.borrow().online,
                    "Connectivity changed, re-evaluating rates"
                );
                this.start().await;
            }
        })
    }

    /// Cancel any outstanding fetch. Called when the consumer goes away.
    pub fn shutdown(&self) {
        if let Some(token) = self.current_cancel.lock().unwrap().take() {
            token.cancel();
        }
    }

    async fn run_fetch(&self, options: FetchOptions) {
        // At most one fetch in flight; a second request is a no-op.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Fetch already in flight, ignoring");
            return;
        }

        if !self.online.is_online() {
            if let Some(message) = options.offline_message {
                self.publish_error(message.to_string());
            }
            self.in_flight.store(false, Ordering::SeqCst);
            return;
        }

        let token = CancellationToken::new();
        if let Some(previous) = self
            .current_cancel
            .lock()
            .unwrap()
            .replace(token.clone())
        {
            // Superseded request; its cancellation is swallowed below.
            previous.cancel();
        }

        if options.force_loading {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
            state.error = None;
        } else {
            self.state.lock().unwrap().error = None;
        }

        let result = self.provider.fetch_rates(Some(token)).await;

        match result {
            Ok(payload) => {
                self.cache.write(&payload, Some(self.provider.source_tag()));
                self.publish_data(payload, now_ms());
            }
            Err(FetchError::Cancelled) => {
                debug!("Fetch superseded, dropping result");
            }
            Err(err) => self.publish_error(err.to_string()),
        }

        self.in_flight.store(false, Ordering::SeqCst);
        self.current_cancel.lock().unwrap().take();
    }

    fn publish_data(&self, payload: RateTable, timestamp: i64) {
        let mut state = self.state.lock().unwrap();
        state.data = Some(payload);
        state.updated_at = Some(timestamp);
        state.loading = false;
        state.error = None;
    }

    /// Prior data, if any, stays visible alongside the error.
    fn publish_error(&self, message: String) {
        let mut state = self.state.lock().unwrap();
        state.loading = false;
        state.error = Some(message);
    }
}

impl Drop for RatesOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
