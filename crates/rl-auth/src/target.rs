//! Forwarding target derived from the `state` parameter
//!
//! The launcher repurposes OAuth's opaque `state` value to carry the loopback
//! port its callback listener is bound to. The provider echoes it back
//! unchanged, so the redirect page can recover the port without any other
//! channel between the two halves.

/// Prefix marking a state value as a loopback port designator
pub const STATE_PORT_PREFIX: &str = "port:";

/// A loopback port the authorization result can be forwarded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardingTarget {
    port: u16,
}

impl ForwardingTarget {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Parse a raw `state` value
    ///
    /// Only `port:<decimal>` with a port in 1..=65535 designates a target;
    /// anything else means no forwarding is attempted.
    pub fn from_state(state: &str) -> Option<Self> {
        let rest = state.strip_prefix(STATE_PORT_PREFIX)?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let port: u16 = rest.parse().ok()?;
        if port == 0 {
            return None;
        }
        Some(Self { port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `state` value the launcher embeds in its authorization request
    pub fn state_value(&self) -> String {
        format!("{}{}", STATE_PORT_PREFIX, self.port)
    }

    /// URL delivering `query` verbatim to the local listener
    ///
    /// The query string is reproduced as-is; the listener accepts any path,
    /// so the root is used.
    pub fn forward_url(&self, query: &str) -> String {
        format!("http://127.0.0.1:{}/?{}", self.port, query)
    }
}
