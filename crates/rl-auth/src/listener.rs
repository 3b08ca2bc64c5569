//! Local callback listener
//!
//! A short-lived HTTP server on the loopback interface that receives the
//! forwarded authorization result from the redirect page. Exactly one
//! relevant GET request fulfils the pending login; the listener then shuts
//! down, so a late callback is refused at the connection level and the
//! browser side degrades to manual entry.

use crate::result::AuthResult;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use rl_types::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

/// Outcome of waiting for the browser callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// A callback arrived; the parsed result and the raw query it carried
    Received { result: AuthResult, query: String },

    /// No callback arrived within the configured window
    TimedOut,
}

/// Single-slot rendezvous for the one expected callback
type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// The launcher-side loopback listener for one login attempt
#[derive(Debug)]
pub struct CallbackListener {
    port: u16,
    callback_rx: oneshot::Receiver<String>,
    shutdown_tx: watch::Sender<bool>,
    server: tokio::task::JoinHandle<()>,
}

impl CallbackListener {
    /// Bind to an ephemeral loopback port and start serving
    ///
    /// Binding happens before the authorization URL is built, so the
    /// provider can never redirect the browser to a port nobody is
    /// listening on.
    pub async fn bind() -> AppResult<Self> {
        Self::bind_port(0).await
    }

    /// Bind to a specific loopback port (0 lets the OS pick)
    pub async fn bind_port(port: u16) -> AppResult<Self> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| {
                AppError::Listener(format!("Failed to bind loopback port {}: {}", port, e))
            })?;
        let port = listener
            .local_addr()
            .map_err(|e| AppError::Listener(format!("Failed to read local address: {}", e)))?
            .port();

        let (callback_tx, callback_rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(callback_tx)));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        // Any path is accepted; only the query string matters. Non-GET
        // methods get 405 from the method router.
        let app = Router::new()
            .route("/", get(handle_callback))
            .route("/{*path}", get(handle_callback))
            .with_state(slot);

        let server = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                // Resolves on an explicit shutdown or when the listener
                // handle is dropped (sender side of the watch goes away).
                let _ = shutdown_rx.changed().await;
            });
            if let Err(e) = serve.await {
                warn!("Callback listener error: {}", e);
            }
        });

        info!("Callback listener bound to 127.0.0.1:{}", port);

        Ok(Self {
            port,
            callback_rx,
            shutdown_tx,
            server,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Wait for the single callback, at most `timeout`
    ///
    /// The listener is shut down before returning in every case. Graceful
    /// shutdown drains the in-flight connection, so the response to the
    /// fulfilling request completes before the port closes.
    pub async fn wait(self, timeout: Duration) -> AppResult<CallbackOutcome> {
        let outcome = match tokio::time::timeout(timeout, self.callback_rx).await {
            Ok(Ok(query)) => {
                info!("Callback received on port {}", self.port);
                let result = AuthResult::parse(&query);
                Ok(CallbackOutcome::Received { result, query })
            }
            Ok(Err(_)) => Err(AppError::Listener(
                "Callback channel closed before a request arrived".to_string(),
            )),
            Err(_) => {
                warn!(
                    "No callback within {}s on port {}",
                    timeout.as_secs_f64(),
                    self.port
                );
                Ok(CallbackOutcome::TimedOut)
            }
        };

        let _ = self.shutdown_tx.send(true);
        let _ = self.server.await;

        outcome
    }
}

async fn handle_callback(State(slot): State<CallbackSlot>, RawQuery(query): RawQuery) -> Response {
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => {
            // Stray request with no result attached (favicon and friends);
            // the single slot stays armed.
            debug!("Ignoring query-less request to callback listener");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let sender = slot.lock().take();
    match sender {
        Some(tx) => {
            debug!("Fulfilling pending login from callback");
            let _ = tx.send(query);
            Html(page(
                "Login received",
                "You can close this window and return to the launcher.",
            ))
            .into_response()
        }
        None => {
            warn!("Callback received after the login was already fulfilled");
            Html(page(
                "Already signed in",
                "This login was already completed; you can close this window.",
            ))
            .into_response()
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body style="font-family: sans-serif; text-align: center; margin-top: 4rem;">
    <h1>{title}</h1>
    <p>{body}</p>
</body>
</html>"#
    )
}
