//! Single-slot, auto-expiring user notices
//!
//! One message is visible at a time. Every `show` replaces the visible message
//! and restarts the hide timer, so the latest message always gets the full
//! display duration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a notice stays visible
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Where notices are displayed
pub trait NoticeSurface: Send + Sync {
    fn show(&self, message: &str);
    fn hide(&self);
}

/// Blocking fallback used when no surface is attached
pub type AlertFn = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Slot {
    message: Option<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Shared user-facing message surface
pub struct Notifier {
    surface: Option<Arc<dyn NoticeSurface>>,
    alert: AlertFn,
    duration: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Notifier {
    /// Create a notifier that displays on `surface`
    pub fn new(surface: Arc<dyn NoticeSurface>) -> Self {
        Self::build(Some(surface))
    }

    /// Create a notifier with no display surface; every notice goes to the alert
    pub fn detached() -> Self {
        Self::build(None)
    }

    fn build(surface: Option<Arc<dyn NoticeSurface>>) -> Self {
        Self {
            surface,
            alert: Arc::new(|message: &str| eprintln!("{}", message)),
            duration: DEFAULT_NOTICE_DURATION,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Set the display duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the blocking fallback
    pub fn with_alert(mut self, alert: AlertFn) -> Self {
        self.alert = alert;
        self
    }

    /// Show `message`, replacing any visible one
    pub async fn show(&self, message: impl Into<String>) {
        let message = message.into();

        let Some(surface) = self.surface.clone() else {
            warn!("Notice surface unavailable, alerting: {}", message);
            (self.alert)(&message);
            return;
        };

        let mut slot = self.slot.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        surface.show(&message);
        slot.message = Some(message);

        let shared = Arc::clone(&self.slot);
        let duration = self.duration;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut slot = shared.lock().await;
            // A newer notice owns the slot now
            if slot.generation != generation {
                return;
            }
            slot.message = None;
            slot.timer = None;
            surface.hide();
            debug!("Notice expired");
        }));
    }

    /// Hide the visible notice now
    pub async fn dismiss(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        if slot.message.take().is_some() {
            if let Some(surface) = &self.surface {
                surface.hide();
            }
        }
    }

    /// Currently visible message, if any
    pub async fn current(&self) -> Option<String> {
        self.slot.lock().await.message.clone()
    }
}
