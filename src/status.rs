use std::sync::{Mutex, PoisonError};

/// Status reported for exchanges that never got an HTTP response (timeouts, refused
/// connections...).
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Status code of the most recent exchange with the API, auth exchanges included.
#[derive(Debug, Default)]
pub struct LastStatusCode(Mutex<Option<u16>>);

impl LastStatusCode {
    pub fn record(&self, status: u16) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    /// `None` until the first exchange.
    pub fn get(&self) -> Option<u16> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
