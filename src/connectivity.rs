//! Connectivity monitor
//!
//! Polls the liveness endpoint on a fixed interval and publishes a
//! [`ConnectivityState`] through a `tokio::sync::watch` channel. Non-2xx
//! answers, network errors and timeouts all collapse into
//! [`LinkStatus::Disconnected`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::SentimentApi;
use crate::presenter::Presenter;

pub const MSG_CHECKING: &str = "Checking connection...";
pub const MSG_CONNECTED: &str = "Connected to API";
pub const MSG_DISCONNECTED: &str = "API unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Unknown,
    Connected,
    Disconnected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "CHECKING"),
            Self::Connected => write!(f, "CONNECTED"),
            Self::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// Last probe outcome plus the status line shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityState {
    pub status: LinkStatus,
    pub message: String,
}

impl ConnectivityState {
    pub fn unknown() -> Self {
        Self {
            status: LinkStatus::Unknown,
            message: MSG_CHECKING.to_string(),
        }
    }

    pub fn connected() -> Self {
        Self {
            status: LinkStatus::Connected,
            message: MSG_CONNECTED.to_string(),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            status: LinkStatus::Disconnected,
            message: MSG_DISCONNECTED.to_string(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == LinkStatus::Connected
    }

    pub fn is_disconnected(&self) -> bool {
        self.status == LinkStatus::Disconnected
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Periodic liveness prober
pub struct ConnectivityMonitor {
    api: Arc<dyn SentimentApi>,
    presenter: Arc<dyn Presenter>,
    tx: watch::Sender<ConnectivityState>,
    interval: Duration,
}

impl ConnectivityMonitor {
    pub fn new(
        api: Arc<dyn SentimentApi>,
        presenter: Arc<dyn Presenter>,
        interval: Duration,
    ) -> Self {
        let (tx, _rx) = watch::channel(ConnectivityState::unknown());
        Self {
            api,
            presenter,
            tx,
            interval,
        }
    }

    /// Receiver for the controller gate and any other reader
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> ConnectivityState {
        self.tx.borrow().clone()
    }

    /// Run one health check and publish the outcome
    pub async fn probe(&self) -> ConnectivityState {
        let next = match self.api.health().await {
            Ok(()) => ConnectivityState::connected(),
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                ConnectivityState::disconnected()
            }
        };

        let previous = self.tx.send_replace(next.clone());
        if previous.status != next.status {
            tracing::info!(from = %previous.status, to = %next.status, "Connectivity changed");
        }

        self.presenter.set_connectivity(&next);
        next
    }

    /// Probe now, then every interval, for the rest of the session
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                self.probe().await;
            }
        })
    }
}
