//! Backend pool with round-robin rotation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::backend::{Backend, ConfigurationError};

/// Ordered, fixed-size set of backends plus the rotation cursor.
///
/// The target list is immutable after construction; the cursor is the only
/// shared mutable state on the dispatch path and always stays within
/// `[0, len)`.
#[derive(Debug)]
pub struct BackendPool {
    targets: Vec<Arc<Backend>>,
    cursor: AtomicUsize,
}

impl BackendPool {
    /// Build the pool from configured backend entries.
    ///
    /// Fails if the list is empty or any entry is malformed. Rotation starts
    /// at the first entry and follows configuration order.
    pub fn new(addrs: &[String]) -> Result<Self, ConfigurationError> {
        if addrs.is_empty() {
            return Err(ConfigurationError::NoBackends);
        }

        let targets = addrs
            .iter()
            .map(|raw| Backend::parse(raw).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            targets,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Return the next backend in round-robin order.
    ///
    /// The cursor advance is a compare-and-swap loop, so concurrent callers
    /// observe a linearizable rotation: every call consumes exactly one slot,
    /// none is lost or served twice.
    pub fn next(&self) -> Arc<Backend> {
        let len = self.targets.len();
        let idx = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                Some((cursor + 1) % len)
            })
            .unwrap_or_else(|cursor| cursor); // closure never returns None

        self.targets[idx].clone()
    }

    /// All configured targets, in rotation order.
    pub fn targets(&self) -> &[Arc<Backend>] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
