//! Poll-backed element interaction helpers.
//!
//! Each helper is one lookup-and-act operation: resolve the locator against
//! the session, then perform the action on the element, retrying the whole
//! pair under the given [`PollPolicy`] until it succeeds or the deadline
//! elapses. A successful invocation performs its action exactly once; failed
//! attempts are pure lookups with no side effect.

use tracing::info;

use crate::error::Result;
use crate::locator::Locator;
use crate::poll::{PollPolicy, poll_until};
use crate::session::Session;

/// Waits for `locator` to resolve, then clicks the element.
pub async fn click<S: Session>(session: &S, locator: &Locator, policy: &PollPolicy) -> Result<()> {
    info!(target: "webpoll", %locator, "click element");
    poll_until(locator.as_str(), policy, || async move {
        let element = session.resolve(locator).await?;
        session.click(&element).await
    })
    .await
}

/// Waits for `locator` to resolve, then types `text` into the element.
pub async fn fill<S: Session>(
    session: &S,
    locator: &Locator,
    text: &str,
    policy: &PollPolicy,
) -> Result<()> {
    info!(target: "webpoll", %locator, "fill element");
    poll_until(locator.as_str(), policy, || async move {
        let element = session.resolve(locator).await?;
        session.fill(&element, text).await
    })
    .await
}

/// Waits for `locator` to resolve to an iframe, then switches the session
/// context into it. Subsequent locators resolve against the frame's document
/// until [`leave_frames`] is called.
pub async fn enter_frame<S: Session>(
    session: &S,
    locator: &Locator,
    policy: &PollPolicy,
) -> Result<()> {
    info!(target: "webpoll", %locator, "enter frame");
    poll_until(locator.as_str(), policy, || async move {
        let element = session.resolve(locator).await?;
        session.enter_frame(&element).await
    })
    .await
}

/// Returns the session context to the top-level document.
///
/// Single-shot: no polling, failures propagate directly.
pub async fn leave_frames<S: Session>(session: &S) -> Result<()> {
    session.leave_frames().await?;
    Ok(())
}

/// Waits for `locator` to resolve and hands the element back without acting
/// on it, for callers that need an interaction this crate does not wrap.
pub async fn resolve<S: Session>(
    session: &S,
    locator: &Locator,
    policy: &PollPolicy,
) -> Result<S::Element> {
    poll_until(locator.as_str(), policy, move || session.resolve(locator)).await
}
