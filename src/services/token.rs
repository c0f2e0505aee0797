//! Proactive access-token refresh.
//!
//! Instead of polling, [`RefreshScheduler`] sleeps until the current token is
//! `threshold` seconds from expiry, refreshes once, and re-arms from whatever
//! token the auth context holds next. Logging out parks it; dropping or
//! cancelling the [`RefreshHandle`] stops it.

use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{AuthService, ServiceResult};
use crate::auth::jwt::{self, REFRESH_THRESHOLD_SECS};

/// Floor between two refresh attempts, so short-lived tokens can't spin.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TokenService {
    auth: AuthService,
    threshold_secs: i64,
}

impl TokenService {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            threshold_secs: REFRESH_THRESHOLD_SECS,
        }
    }

    pub fn with_threshold(mut self, threshold_secs: i64) -> Self {
        self.threshold_secs = threshold_secs;
        self
    }

    pub fn threshold_secs(&self) -> i64 {
        self.threshold_secs
    }

    /// True when the stored access token is unreadable or within the threshold.
    pub fn should_refresh_token(&self) -> bool {
        match self.auth.client().auth().access_token() {
            Some(token) => jwt::should_refresh_token_at(&token, jwt::now_unix(), self.threshold_secs),
            None => false,
        }
    }

    pub async fn refresh_if_needed(&self) -> ServiceResult<bool> {
        if !self.should_refresh_token() {
            return Ok(false);
        }
        self.auth.refresh().await
    }

    /// Time to wait before refreshing `token`. Unreadable tokens refresh now.
    pub fn delay_until_refresh(&self, token: &str, now: i64) -> Duration {
        match jwt::seconds_until_expiry(token, now) {
            Some(remaining) => {
                let wait = remaining - self.threshold_secs;
                Duration::from_secs(wait.max(0) as u64)
            }
            None => Duration::ZERO,
        }
    }
}

pub struct RefreshScheduler;

impl RefreshScheduler {
    pub fn start(tokens: TokenService) -> RefreshHandle {
        let access_rx = tokens.auth.client().auth().subscribe();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(tokens, access_rx, shutdown_rx));
        RefreshHandle { shutdown, task }
    }
}

pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn cancel(&self) {
        self.shutdown.send_replace(true);
    }

    pub async fn stop(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "token refresh task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(
    tokens: TokenService,
    mut access_rx: watch::Receiver<Option<String>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut last_attempt: Option<Instant> = None;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let current = access_rx.borrow_and_update().clone();
        let Some(token) = current else {
            debug!("no access token; refresh scheduler idle");
            tokio::select! {
                changed = access_rx.changed() => if changed.is_err() { break },
                _ = shutdown_rx.changed() => break,
            }
            continue;
        };

        let mut delay = tokens.delay_until_refresh(&token, jwt::now_unix());
        if let Some(at) = last_attempt {
            delay = delay.max(MIN_REFRESH_INTERVAL.saturating_sub(at.elapsed()));
        }
        debug!(delay_secs = delay.as_secs(), "token refresh scheduled");

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                last_attempt = Some(Instant::now());
                match tokens.auth.refresh().await {
                    Ok(true) => info!("access token refreshed"),
                    Ok(false) => {
                        debug!("refresh not applied; waiting for the next login");
                        tokio::select! {
                            changed = access_rx.changed() => if changed.is_err() { break },
                            _ = shutdown_rx.changed() => break,
                        }
                    }
                    Err(e) => warn!(error = %e, "background token refresh failed"),
                }
            }
            changed = access_rx.changed() => if changed.is_err() { break },
            _ = shutdown_rx.changed() => break,
        }
    }
    debug!("token refresh scheduler stopped");
}
