//! The bounded poll-until-success executor.
//!
//! Pages race the scripts that drive them: an element addressed by a locator
//! may not exist yet when the script reaches for it. [`poll_until`] retries a
//! fallible attempt until it succeeds or an optional deadline elapses, pausing
//! a fixed [`PollPolicy::interval`] between attempts. The pause never grows;
//! timing-sensitive callers get a predictable cadence.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::{PollError, SessionError};

/// Default pause between attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(25);

/// Retry settings for one [`poll_until`] invocation.
///
/// Durations serialize as integer milliseconds (`deadline_ms`,
/// `interval_ms`) so policies can be loaded from script config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Maximum wall-clock time to keep retrying, measured from the first
    /// attempt. `None` retries forever: if the locator never resolves, the
    /// call never returns. That default matches interactive scripts that
    /// would rather hang visibly than silently skip a step, but unattended
    /// jobs should always set a deadline.
    #[serde(default, rename = "deadline_ms", with = "opt_duration_ms")]
    pub deadline: Option<Duration>,

    /// Pause between attempts. Fixed, no backoff growth.
    #[serde(
        default = "default_interval",
        rename = "interval_ms",
        with = "duration_ms"
    )]
    pub interval: Duration,
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl PollPolicy {
    /// Retry forever at the default interval. See the `deadline` field docs
    /// for why unattended callers should prefer [`PollPolicy::deadline`].
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Give up once `deadline` has elapsed. At least one attempt always runs,
    /// so a zero deadline means exactly one attempt.
    pub fn deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Runs `attempt` until it succeeds or the policy's deadline elapses.
///
/// `what` is a human-readable description of the thing being waited on
/// (usually the locator query); it appears in diagnostics and in the
/// [`PollError::Timeout`] value.
///
/// On deadline exhaustion a `warn!` line is emitted and the error returned
/// carries the elapsed time, the attempt count, and the last underlying
/// failure as its source. The deadline is checked after each failed attempt,
/// never before the first, so the attempt always runs at least once.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    policy: &PollPolicy,
    mut attempt: F,
) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SessionError>>,
{
    debug!(
        target: "webpoll",
        what,
        deadline_ms = policy.deadline.map(|d| d.as_millis() as u64),
        "poll start"
    );

    let start = Instant::now();
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;
        match attempt().await {
            Ok(value) => {
                debug!(target: "webpoll", what, attempts, "poll succeeded");
                return Ok(value);
            }
            Err(err) => {
                trace!(target: "webpoll", what, attempts, %err, "attempt failed");
                if let Some(deadline) = policy.deadline {
                    let elapsed = start.elapsed();
                    if elapsed >= deadline {
                        warn!(
                            target: "webpoll",
                            what,
                            attempts,
                            elapsed_ms = elapsed.as_millis() as u64,
                            %err,
                            "deadline exhausted"
                        );
                        return Err(PollError::Timeout {
                            what: what.to_string(),
                            elapsed,
                            attempts,
                            last: err,
                        });
                    }
                }
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod opt_duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        d: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn not_found(locator: &str) -> SessionError {
        SessionError::NotFound {
            locator: locator.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_returns_immediately() {
        let attempts = Cell::new(0u64);
        let attempts = &attempts;
        let start = Instant::now();

        let value = poll_until("#btn", &PollPolicy::default(), || async move {
            attempts.set(attempts.get() + 1);
            Ok::<_, SessionError>(42)
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(attempts.get(), 1);
        // No sleep happened, so virtual time did not advance.
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let attempts = Cell::new(0u64);
        let attempts = &attempts;
        let policy = PollPolicy::deadline(Duration::from_secs(5));

        let value = poll_until("#btn", &policy, || async move {
            attempts.set(attempts.get() + 1);
            if attempts.get() <= 3 {
                Err(not_found("#btn"))
            } else {
                Ok(attempts.get())
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_exhaustion_yields_timeout() {
        let attempts = Cell::new(0u64);
        let attempts = &attempts;
        let policy =
            PollPolicy::deadline(Duration::from_millis(200)).with_interval(Duration::from_millis(25));

        let err = poll_until::<(), _, _>("#gone", &policy, || async move {
            attempts.set(attempts.get() + 1);
            Err(not_found("#gone"))
        })
        .await
        .unwrap_err();

        match err {
            PollError::Timeout {
                what,
                elapsed,
                attempts: reported,
                last,
            } => {
                assert_eq!(what, "#gone");
                assert!(elapsed >= Duration::from_millis(200));
                // Stops within the deadline plus one attempt of overhead.
                assert!(elapsed < Duration::from_millis(250));
                assert_eq!(reported, attempts.get());
                assert!(matches!(last, SessionError::NotFound { .. }));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_makes_exactly_one_attempt() {
        let attempts = Cell::new(0u64);
        let attempts = &attempts;
        let policy = PollPolicy::deadline(Duration::ZERO);

        let err = poll_until::<(), _, _>("#gone", &policy, || async move {
            attempts.set(attempts.get() + 1);
            Err(not_found("#gone"))
        })
        .await
        .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_policy_keeps_polling() {
        let attempts = Cell::new(0u64);
        let attempts = &attempts;

        let policy = PollPolicy::unbounded();
        let pending = poll_until::<(), _, _>("#gone", &policy, || async move {
            attempts.set(attempts.get() + 1);
            Err(not_found("#gone"))
        });

        // Still running after a minute of virtual time.
        let outcome = tokio::time::timeout(Duration::from_secs(60), pending).await;
        assert!(outcome.is_err());
        assert!(attempts.get() > 1_000);
    }

    #[test]
    fn policy_round_trips_as_milliseconds() {
        let policy = PollPolicy::deadline(Duration::from_secs(5)).with_interval(
            Duration::from_millis(50),
        );

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["deadline_ms"], 5000);
        assert_eq!(json["interval_ms"], 50);

        let parsed: PollPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn policy_defaults_apply_when_fields_missing() {
        let parsed: PollPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PollPolicy::unbounded());

        let parsed: PollPolicy = serde_json::from_str(r#"{"deadline_ms": 1500}"#).unwrap();
        assert_eq!(parsed.deadline, Some(Duration::from_millis(1500)));
        assert_eq!(parsed.interval, DEFAULT_INTERVAL);
    }
}
