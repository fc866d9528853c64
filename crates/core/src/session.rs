use async_trait::async_trait;

use crate::error::SessionError;
use crate::locator::Locator;

/// Live handle to an external interactive environment.
///
/// Mirrors the subset of WebDriver-style operations the interaction helpers
/// need: resolve a [`Locator`] to a live element, then act on the element.
/// The session is owned by the caller; this crate never opens or closes one.
///
/// Implement this for a real automation backend, or use
/// [`crate::testing::FakeSession`] to exercise polling logic without a
/// browser.
#[async_trait]
pub trait Session: Send + Sync {
    /// Live element handle produced by [`Session::resolve`].
    type Element: Send + Sync;

    /// Resolves `locator` to a live element.
    ///
    /// Must be a pure lookup: failure leaves the session untouched, so the
    /// executor may call this an unbounded number of times.
    async fn resolve(&self, locator: &Locator) -> Result<Self::Element, SessionError>;

    /// Clicks `element`.
    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Types `text` into `element`.
    async fn fill(&self, element: &Self::Element, text: &str) -> Result<(), SessionError>;

    /// Switches the session context into the iframe `element`. Locators
    /// resolve against the frame's document until [`Session::leave_frames`].
    async fn enter_frame(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Returns the session context to the top-level document.
    async fn leave_frames(&self) -> Result<(), SessionError>;
}
