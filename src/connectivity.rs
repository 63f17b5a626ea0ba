//! Client connectivity state consulted during classification.
use std::sync::atomic::{AtomicBool, Ordering};

pub trait Connectivity {
    /// Whether the client currently believes it is online.
    fn is_online(&self) -> bool;
}

/// A connectivity flag flipped by whoever watches the network.
#[derive(Debug)]
pub struct ConnectivityFlag {
    online: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
