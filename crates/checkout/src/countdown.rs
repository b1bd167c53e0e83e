//! Reservation countdown banner.
//!
//! Tells the shopper their items are in high demand and counts down from 15
//! minutes. The count is purely cosmetic: nothing is released at zero.

use std::time::Duration;

use askama::Template;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Countdown start value when none is configured.
pub const DEFAULT_COUNTDOWN_SECONDS: u64 = 15 * 60;

/// Countdown banner copy and start value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownSettings {
    pub seconds: u64,
    pub title: String,
    /// `{time}` is replaced by the remaining `MM:SS`.
    pub subtitle: String,
    /// Shown instead of the countdown when cart attributes are read-only.
    pub unsupported_message: String,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_COUNTDOWN_SECONDS,
            title: "Your items are in high demand".to_string(),
            subtitle: "Your order is reserved for {time} minutes".to_string(),
            unsupported_message: "Attribute changes are not supported in this checkout."
                .to_string(),
        }
    }
}

/// `MM:SS`, zero padded. Minutes are not capped at 59.
///
/// ```
/// use naked_pineapple_checkout::countdown::format_remaining;
///
/// assert_eq!(format_remaining(900), "15:00");
/// assert_eq!(format_remaining(61), "01:01");
/// ```
#[must_use]
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Seconds left on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
}

impl Countdown {
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self { remaining: seconds }
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// One second passes. Saturates at zero.
    pub const fn tick(&mut self) -> u64 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }
}

/// Start the countdown on the current tokio runtime.
///
/// The receiver starts at `seconds` and gets one update per second. The task
/// ends after publishing zero, or as soon as every receiver is dropped.
#[must_use]
pub fn spawn_countdown(seconds: u64) -> (watch::Receiver<u64>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(seconds);
    let handle = tokio::spawn(drive(tx, Countdown::new(seconds)));
    (rx, handle)
}

async fn drive(tx: watch::Sender<u64>, mut countdown: Countdown) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    while !countdown.is_finished() {
        tokio::select! {
            _ = interval.tick() => {}
            () = tx.closed() => {
                debug!(remaining = countdown.remaining(), "Countdown receivers dropped");
                return;
            }
        }

        if tx.send(countdown.tick()).is_err() {
            return;
        }
    }

    debug!("Countdown finished");
}

/// What the banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CountdownView {
    /// The checkout does not allow attribute changes.
    Unsupported { message: String },
    Active {
        title: String,
        subtitle: String,
        remaining: String,
    },
}

impl CountdownView {
    /// View for `remaining` seconds.
    #[must_use]
    pub fn build(settings: &CountdownSettings, remaining: u64, can_update_attributes: bool) -> Self {
        if !can_update_attributes {
            return Self::Unsupported {
                message: settings.unsupported_message.clone(),
            };
        }

        let time = format_remaining(remaining);
        Self::Active {
            title: settings.title.clone(),
            subtitle: settings.subtitle.replace("{time}", &time),
            remaining: time,
        }
    }

    /// Render as an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_html(&self) -> Result<String, askama::Error> {
        CountdownTemplate { view: self }.render()
    }
}

#[derive(Template)]
#[template(path = "partials/countdown_banner.html")]
struct CountdownTemplate<'a> {
    view: &'a CountdownView,
}
