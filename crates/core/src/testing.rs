//! Test doubles for exercising polling logic without a browser.
//!
//! [`FakeSession`] is a scripted [`Session`]: each locator is registered with
//! the number of resolution attempts that fail before it resolves, and every
//! action is recorded so tests can assert how often it ran.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::testing::FakeSession;
//!
//! let session = FakeSession::new()
//!     .with_element_after("//button[@id='save']", 3);
//! // click() will fail three times, then succeed.
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SessionError;
use crate::locator::Locator;
use crate::session::Session;

/// Element handle produced by [`FakeSession::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    locator: String,
}

impl FakeElement {
    /// The locator query this element was resolved from.
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

#[derive(Debug, Default)]
struct State {
    resolve_attempts: HashMap<String, u64>,
    remaining_click_failures: u64,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    frame: Option<String>,
    closed: bool,
}

/// Scripted [`Session`] double.
///
/// Locators not registered with a `with_element*` builder never resolve.
#[derive(Debug, Default)]
pub struct FakeSession {
    // locator -> number of failed resolution attempts before it resolves
    script: HashMap<String, u64>,
    state: Mutex<State>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a locator that resolves on the first attempt.
    pub fn with_element(self, locator: &str) -> Self {
        self.with_element_after(locator, 0)
    }

    /// Registers a locator that fails `failures` resolution attempts before
    /// resolving.
    pub fn with_element_after(mut self, locator: &str, failures: u64) -> Self {
        self.script.insert(locator.to_string(), failures);
        self
    }

    /// Makes the next `failures` clicks fail even on resolved elements.
    pub fn with_click_failures(self, failures: u64) -> Self {
        self.state.lock().remaining_click_failures = failures;
        self
    }

    /// Closes the session: every subsequent operation fails with
    /// [`SessionError::Closed`].
    pub fn close(&self) {
        self.state.lock().closed = true;
    }

    /// Number of resolution attempts made for `locator`.
    pub fn resolve_attempts(&self, locator: &str) -> u64 {
        self.state
            .lock()
            .resolve_attempts
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    /// Locators of elements clicked so far, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    /// `(locator, text)` pairs filled so far, in order.
    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    /// Locator of the frame the session is currently switched into, if any.
    pub fn current_frame(&self) -> Option<String> {
        self.state.lock().frame.clone()
    }

    fn check_open(state: &State) -> Result<(), SessionError> {
        if state.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Session for FakeSession {
    type Element = FakeElement;

    async fn resolve(&self, locator: &Locator) -> Result<FakeElement, SessionError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;

        let attempts = state
            .resolve_attempts
            .entry(locator.as_str().to_string())
            .or_insert(0);
        *attempts += 1;
        let attempts = *attempts;

        match self.script.get(locator.as_str()) {
            Some(&failures) if attempts > failures => Ok(FakeElement {
                locator: locator.as_str().to_string(),
            }),
            _ => Err(SessionError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn click(&self, element: &FakeElement) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;

        if state.remaining_click_failures > 0 {
            state.remaining_click_failures -= 1;
            return Err(SessionError::Action {
                locator: element.locator.clone(),
                message: "element not interactable".to_string(),
            });
        }
        state.clicks.push(element.locator.clone());
        Ok(())
    }

    async fn fill(&self, element: &FakeElement, text: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;
        state.fills.push((element.locator.clone(), text.to_string()));
        Ok(())
    }

    async fn enter_frame(&self, element: &FakeElement) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;
        state.frame = Some(element.locator.clone());
        Ok(())
    }

    async fn leave_frames(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;
        state.frame = None;
        Ok(())
    }
}
