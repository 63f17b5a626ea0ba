//! Deferred forced navigation, used to send the session back to the login
//! entry point after an authentication failure.
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// A collaborator that performs a full navigation to `path`.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// A `Navigator` that forwards navigation requests over an unbounded channel.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            debug!("Navigation receiver dropped, discarding request for {}", path);
        }
    }
}

/// Identifies one scheduled navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NavigationTicket(Uuid);

impl fmt::Display for NavigationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The timer behind a pending navigation: a tokio task when a runtime is
/// available, otherwise a sleeping thread with a cancellation flag.
enum NavigationTimer {
    Task(JoinHandle<()>),
    Thread {
        handle: std::thread::JoinHandle<()>,
        cancelled: Arc<AtomicBool>,
    },
}

impl NavigationTimer {
    fn is_finished(&self) -> bool {
        match self {
            NavigationTimer::Task(task) => task.is_finished(),
            NavigationTimer::Thread { handle, cancelled } => {
                handle.is_finished() || cancelled.load(Ordering::SeqCst)
            }
        }
    }

    fn cancel(&self) {
        match self {
            NavigationTimer::Task(task) => task.abort(),
            NavigationTimer::Thread { cancelled, .. } => cancelled.store(true, Ordering::SeqCst),
        }
    }
}

struct PendingNavigation {
    ticket: NavigationTicket,
    timer: NavigationTimer,
}

/// Schedules one-shot navigations to a fixed path after a fixed delay.
///
/// At most one navigation is pending at a time: scheduling while one is
/// pending returns the pending ticket instead of starting a second timer.
pub struct NavigationScheduler {
    navigator: Arc<dyn Navigator + Send + Sync>,
    path: String,
    delay: Duration,
    pending: Arc<Mutex<Option<PendingNavigation>>>,
}

impl NavigationScheduler {
    pub fn new(
        navigator: Arc<dyn Navigator + Send + Sync>,
        path: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            navigator,
            path: path.into(),
            delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Schedules a navigation, or joins the one already pending.
    ///
    /// The delay runs on a tokio timer when called inside a runtime and on a
    /// dedicated thread otherwise.
    pub fn schedule(&self) -> NavigationTicket {
        let mut pending = lock(&self.pending);
        if let Some(existing) = pending.as_ref() {
            if !existing.timer.is_finished() {
                debug!("Navigation {} already pending, coalescing", existing.ticket);
                return existing.ticket;
            }
        }

        let ticket = NavigationTicket(Uuid::new_v4());
        let navigator = self.navigator.clone();
        let path = self.path.clone();
        let delay = self.delay;
        let slot = self.pending.clone();

        let timer = match tokio::runtime::Handle::try_current() {
            Ok(handle) => NavigationTimer::Task(handle.spawn(async move {
                tokio::time::sleep(delay).await;
                release(&slot, ticket);
                info!("Navigating to {}", path);
                navigator.navigate(&path);
            })),
            Err(_) => {
                debug!("No async runtime available, timing navigation {} on a thread", ticket);
                let cancelled = Arc::new(AtomicBool::new(false));
                let flag = cancelled.clone();
                let handle = std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    release(&slot, ticket);
                    if flag.load(Ordering::SeqCst) {
                        return;
                    }
                    info!("Navigating to {}", path);
                    navigator.navigate(&path);
                });
                NavigationTimer::Thread { handle, cancelled }
            }
        };

        info!("Scheduled navigation {} to {} in {:?}", ticket, self.path, self.delay);
        *pending = Some(PendingNavigation { ticket, timer });
        ticket
    }

    /// Cancels the pending navigation if it is `ticket`.
    ///
    /// # Returns
    ///
    /// `true` if a pending navigation was cancelled.
    pub fn cancel(&self, ticket: NavigationTicket) -> bool {
        let mut pending = lock(&self.pending);
        match pending.take() {
            Some(existing) if existing.ticket == ticket && !existing.timer.is_finished() => {
                existing.timer.cancel();
                info!("Cancelled navigation {}", ticket);
                true
            }
            other => {
                *pending = other;
                false
            }
        }
    }

    /// The ticket of the navigation still waiting to fire, if any.
    pub fn pending(&self) -> Option<NavigationTicket> {
        lock(&self.pending)
            .as_ref()
            .filter(|p| !p.timer.is_finished())
            .map(|p| p.ticket)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Clears the pending slot if it still holds `ticket`.
fn release(slot: &Mutex<Option<PendingNavigation>>, ticket: NavigationTicket) {
    let mut slot = lock(slot);
    if slot.as_ref().map(|p| p.ticket) == Some(ticket) {
        *slot = None;
    }
}

fn lock(slot: &Mutex<Option<PendingNavigation>>) -> MutexGuard<'_, Option<PendingNavigation>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
