//! webpoll: bounded polling helpers for browser automation sessions.
//!
//! Scripts that drive a live browser race the pages they drive: an element
//! addressed by a locator may not exist yet when the script reaches for it.
//! This crate provides a bounded poll-until-success executor ([`poll_until`])
//! and the interaction helpers built on it ([`actions::click`],
//! [`actions::fill`], [`actions::enter_frame`]): each repeatedly resolves a
//! [`Locator`] against a [`Session`] and performs its action, until it
//! succeeds or an optional deadline elapses.
//!
//! The session is an injected capability. Implement [`Session`] for your
//! automation backend; tests use [`testing::FakeSession`] instead of a
//! browser.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use webpoll::{Locator, PollPolicy, actions};
//!
//! async fn submit_login<S: webpoll::Session>(session: &S) -> webpoll::Result<()> {
//!     let policy = PollPolicy::deadline(Duration::from_secs(10));
//!
//!     actions::fill(session, &Locator::new("#username"), "student", &policy).await?;
//!     actions::fill(session, &Locator::new("#password"), "hunter2", &policy).await?;
//!     actions::click(session, &Locator::new("button[type=submit]"), &policy).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Deadlines
//!
//! [`PollPolicy::default`] retries forever: a locator that never resolves
//! hangs the calling task until the future is dropped. Unattended jobs should
//! always use [`PollPolicy::deadline`]; on exhaustion the helpers return
//! [`PollError::Timeout`] carrying the attempt count, elapsed time, and the
//! last underlying failure.

pub mod actions;
mod error;
mod locator;
pub mod poll;
mod session;
pub mod testing;

pub use error::{PollError, Result, SessionError};
pub use locator::Locator;
pub use poll::{DEFAULT_INTERVAL, PollPolicy, poll_until};
pub use session::Session;
