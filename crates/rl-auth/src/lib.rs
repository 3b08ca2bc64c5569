//! Browser-login forwarding for the Relaunch launcher
//!
//! Implements both halves of the loopback handshake that delivers an OAuth
//! authorization result from the user's browser back to the launcher:
//!
//! - the redirect-page engine that extracts the result from the provider's
//!   fragment, decides whether a local listener is addressable, and makes a
//!   single forward attempt (degrading to a copy/paste fallback),
//! - the short-lived loopback listener the launcher runs to receive exactly
//!   one callback, bounded by a timeout.
//!
//! The two halves share no state except the loopback socket; they are
//! correlated through a `state` value of the form `port:<port>` that the
//! identity provider round-trips unchanged.
//!
//! # Usage
//! ```no_run
//! use rl_auth::{LoginFlow, LoginOptions, LoginOutcome};
//! use rl_config::AuthConfig;
//!
//! # async fn example() -> rl_types::AppResult<()> {
//! let flow = LoginFlow::new(AuthConfig::default());
//! let pending = flow.begin(LoginOptions::default()).await?;
//! // Open pending.auth_url() in the user's browser, then:
//! match pending.finish().await? {
//!     LoginOutcome::Completed(result) => { /* resume login with result */ }
//!     LoginOutcome::TimedOut => { /* offer manual entry */ }
//! }
//! # Ok(())
//! # }
//! ```

pub mod flow;
pub mod listener;
pub mod page;
pub mod result;
pub mod target;

pub use flow::{LoginFlow, LoginOptions, LoginOutcome, PendingLogin};
pub use listener::{CallbackListener, CallbackOutcome};
pub use page::{PageOutcome, RedirectPage};
pub use result::{AuthResult, SuccessParams};
pub use target::{ForwardingTarget, STATE_PORT_PREFIX};
