//! Sequencing for overlapping generation requests.
//!
//! Each request takes a [`Ticket`] before it starts. When it finishes, the
//! session keeps its result only if no newer ticket has produced one yet, so
//! out-of-order completions never overwrite fresher output. Failures leave
//! the last good result in place.

use crate::{GenerationResult, GlyphtypeError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Sequence number handed to one generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The result is now the latest one.
    Accepted(Arc<GenerationResult>),
    /// A newer request already finished or was started.
    Stale,
    /// Generation failed; the previous result, if any, is still current.
    Failed(GlyphtypeError),
}

#[derive(Default)]
struct Latest {
    sequence: u64,
    result: Option<Arc<GenerationResult>>,
}

#[derive(Default)]
pub struct Session {
    issued: AtomicU64,
    latest: Mutex<Latest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest one issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    pub fn finish(&self, ticket: Ticket, result: crate::Result<GenerationResult>) -> Outcome {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 <= latest.sequence || !self.is_current(ticket) {
            log::debug!("dropping stale generation #{}", ticket.0);
            return Outcome::Stale;
        }
        match result {
            Ok(result) => {
                let result = Arc::new(result);
                latest.sequence = ticket.0;
                latest.result = Some(Arc::clone(&result));
                Outcome::Accepted(result)
            }
            Err(err) => {
                log::warn!("generation #{} failed: {err}", ticket.0);
                Outcome::Failed(err)
            }
        }
    }

    /// The authoritative result, if any generation has succeeded.
    pub fn latest(&self) -> Option<Arc<GenerationResult>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).result.clone()
    }
}
