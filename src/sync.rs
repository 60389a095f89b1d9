//! Synchronous waiting for long-running server-side operations.
//!
//! A submit (distribute, delete) returns immediately while the server works
//! in the background. [`poll_until_complete`] turns that into a blocking
//! wait: it repeatedly invokes a [`StatusProbe`] at a fixed interval until
//! the operation reaches a terminal state or the deadline elapses.
//!
//! The loop is written once; the two operation kinds differ only in their
//! probe implementation (distribution status record vs. deletion detected
//! through a 404 on the status resource).

use std::time::Duration;

use async_trait::async_trait;

use crate::services::errors::DistributionError;

/// Default maximum wait for a sync operation, in minutes.
pub const DEFAULT_MAX_WAIT_MINUTES: u64 = 60;

/// Default interval between status polls, in seconds.
pub const DEFAULT_SYNC_SLEEP_INTERVAL: u64 = 10;

/// Poll loop configuration. Immutable for the duration of one poll session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum total wait before giving up, in minutes.
    pub max_wait_minutes: u64,
    /// Interval between polls, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_wait_minutes: DEFAULT_MAX_WAIT_MINUTES,
            poll_interval_secs: DEFAULT_SYNC_SLEEP_INTERVAL,
        }
    }
}

impl PollConfig {
    /// Returns a config with the given maximum wait, keeping the default
    /// interval. Values below one minute fall back to the default wait.
    #[must_use]
    pub fn with_max_wait_minutes(max_wait_minutes: u64) -> Self {
        Self {
            max_wait_minutes: if max_wait_minutes >= 1 {
                max_wait_minutes
            } else {
                DEFAULT_MAX_WAIT_MINUTES
            },
            ..Self::default()
        }
    }
}

/// What one status query observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The operation has not reached a terminal state; keep polling.
    Pending,
    /// Terminal success.
    Completed,
    /// Terminal failure, with the serialized status payload for
    /// diagnostics.
    Failed(String),
}

/// A status query bound to a specific operation kind.
///
/// `Pending` is the only non-terminal outcome; there is no transition out
/// of a terminal state, so the poll loop stops at the first non-pending
/// result. Errors from the query itself (network, unexpected status) abort
/// the wait immediately.
#[async_trait]
pub trait StatusProbe {
    /// Performs one status query.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the query itself failed; the poll
    /// loop propagates it without further polling.
    async fn probe(&self) -> Result<ProbeOutcome, DistributionError>;
}

/// Polls until the operation completes, fails, or the deadline elapses.
///
/// Elapsed time is tracked in fixed increments of the poll interval, so the
/// number of polls is `ceil(max_wait_minutes * 60 / poll_interval_secs)`.
/// A progress message is logged once per elapsed minute rather than on
/// every poll; the cadence is best-effort when the interval does not divide
/// 60.
///
/// # Errors
///
/// - [`DistributionError::OperationFailed`] when the server reported
///   terminal failure
/// - [`DistributionError::PollTimeout`] when the deadline elapsed first;
///   always distinguishable from a server-reported failure
/// - any error the probe itself returned
pub async fn poll_until_complete<P>(
    probe: &P,
    config: PollConfig,
    operation: &str,
    progress_message: &str,
) -> Result<(), DistributionError>
where
    P: StatusProbe + Sync + ?Sized,
{
    let deadline_secs = config.max_wait_minutes * 60;
    let interval_secs = config.poll_interval_secs.max(1);

    let mut elapsed_secs = 0;
    while elapsed_secs < deadline_secs {
        if elapsed_secs % 60 == 0 {
            tracing::info!("{progress_message}");
        }
        match probe.probe().await? {
            ProbeOutcome::Completed => return Ok(()),
            ProbeOutcome::Failed(payload) => {
                return Err(DistributionError::OperationFailed { payload })
            }
            ProbeOutcome::Pending => {}
        }
        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
        elapsed_secs += interval_secs;
    }
    Err(DistributionError::PollTimeout {
        operation: operation.to_string(),
    })
}
