//! Terminal adapters for the page seams

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tokio::sync::watch;

use scheda_core::navigation::{Confirm, Navigator, Route};
use scheda_core::notifier::NoticeSurface;

/// Prints notices to stderr as they arrive
pub struct TerminalSurface;

impl NoticeSurface for TerminalSurface {
    fn show(&self, message: &str) {
        eprintln!("» {}", message);
    }

    // Printed lines stay on screen
    fn hide(&self) {}
}

/// Asks on stdin; `assume_yes` skips the prompt
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("Auto-confirmed: {}", prompt);
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Remembers where the pages asked to go; the command decides what to do
/// with it once it finishes.
pub struct RouteRecorder {
    last: watch::Sender<Option<Route>>,
}

impl Default for RouteRecorder {
    fn default() -> Self {
        Self {
            last: watch::Sender::new(None),
        }
    }
}

impl RouteRecorder {
    pub fn last(&self) -> Option<Route> {
        *self.last.borrow()
    }

    /// Wait for a navigation request, giving up after `timeout`
    pub async fn wait(&self, timeout: Duration) -> Option<Route> {
        let mut rx = self.last.subscribe();
        let route = match tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await {
            Ok(Ok(route)) => *route,
            _ => None,
        };
        route
    }
}

impl Navigator for RouteRecorder {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigation requested: {}", route);
        self.last.send_replace(Some(route));
    }
}
