//! Progress spinner shown while waiting on the network.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK_STRINGS: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷", " "];
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// A restartable terminal spinner.
///
/// Every `start` draws a fresh indicatif spinner on stderr and every `stop`
/// clears it, so prompts and error messages never interleave with the
/// animation.
pub struct Spinner {
    visible: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            visible: true,
            bar: Mutex::new(None),
        }
    }

    /// A spinner that never draws anything
    pub fn hidden() -> Self {
        Self {
            visible: false,
            bar: Mutex::new(None),
        }
    }

    pub fn start(&self, message: &str) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = slot.as_ref() {
            bar.set_message(message.to_string());
            return;
        }

        let bar = if self.visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(TICK_STRINGS)
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);
        *slot = Some(bar);
    }

    pub fn stop(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.bar.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
