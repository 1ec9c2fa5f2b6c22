//! Generation counter that drops superseded catalog responses.

use tracing::debug;

use crate::metrics;

/// Proof that a request was issued, carrying the parameters it was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket<K> {
    token: u64,
    key: K,
}

impl<K> RequestTicket<K> {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Parameters the request was issued with.
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Hands out monotonically increasing tokens for one screen's results slot.
///
/// Responses can arrive in any order. A completion is applied only when its
/// token is the latest issued and its parameters still equal the screen's
/// current ones; everything else is counted and dropped.
#[derive(Debug)]
pub struct RequestTracker {
    screen: &'static str,
    latest: u64,
}

impl RequestTracker {
    pub fn new(screen: &'static str) -> Self {
        Self { screen, latest: 0 }
    }

    pub fn issue<K>(&mut self, key: K) -> RequestTicket<K> {
        self.latest += 1;
        RequestTicket {
            token: self.latest,
            key,
        }
    }

    /// Token of the most recent request, 0 before the first one.
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Whether a completion for `ticket` may be applied.
    pub fn accept<K: PartialEq>(&self, ticket: &RequestTicket<K>, current: &K) -> bool {
        if ticket.token == self.latest && ticket.key == *current {
            return true;
        }

        debug!(
            "Dropping stale {} result (token {}, latest {})",
            self.screen, ticket.token, self.latest
        );
        metrics::STALE_RESULTS_DROPPED
            .with_label_values(&[self.screen])
            .inc();
        false
    }
}
