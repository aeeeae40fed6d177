// src/app/capability.rs
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::InputMode;

pub const OPEN_GRACE: Duration = Duration::from_millis(500);
pub const TAP_MAX: Duration = Duration::from_millis(300);
pub const CLOSE_GUARD: Duration = Duration::from_millis(300);
pub const TAP_SLOP_PX: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputCapability {
    Pointer,
    Touch,
}

impl InputCapability {
    pub fn detect(mode: InputMode) -> Self {
        let cap = match mode {
            InputMode::Pointer => Self::Pointer,
            InputMode::Touch => Self::Touch,
            InputMode::Auto => {
                if cfg!(any(target_os = "android", target_os = "ios")) {
                    Self::Touch
                } else {
                    Self::Pointer
                }
            }
        };
        info!("input capability: {cap:?} (mode {mode:?})");
        cap
    }

    /// Touch sessions batch-render child grids instead of observing them.
    pub const fn eager_children(self) -> bool {
        matches!(self, Self::Touch)
    }
}

#[derive(Clone, Copy, Debug)]
struct Press {
    at: Instant,
    y: f32,
    travel: f32,
}

/// Decides whether an input outside the overlay's cards should close it.
#[derive(Debug)]
pub struct DismissTracker {
    capability: InputCapability,
    opened_at: Option<Instant>,
    closing_since: Option<Instant>,
    press: Option<Press>,
}

impl DismissTracker {
    pub const fn new(capability: InputCapability) -> Self {
        Self {
            capability,
            opened_at: None,
            closing_since: None,
            press: None,
        }
    }

    pub fn on_open(&mut self, now: Instant) {
        self.opened_at = Some(now);
        self.closing_since = None;
        self.press = None;
    }

    pub fn in_grace(&self, now: Instant) -> bool {
        self.opened_at
            .is_some_and(|t| now.saturating_duration_since(t) < OPEN_GRACE)
    }

    pub fn is_closing(&self, now: Instant) -> bool {
        self.closing_since
            .is_some_and(|t| now.saturating_duration_since(t) < CLOSE_GUARD)
    }

    fn begin_close(&mut self, now: Instant) -> bool {
        self.closing_since = Some(now);
        self.opened_at = None;
        self.press = None;
        true
    }

    /// Primary click. Returns true when the overlay should close.
    pub fn pointer_click(&mut self, now: Instant, outside_cards: bool) -> bool {
        if self.capability != InputCapability::Pointer || self.is_closing(now) {
            return false;
        }
        outside_cards && self.begin_close(now)
    }

    pub fn touch_start(&mut self, now: Instant, y: f32) {
        self.press = Some(Press {
            at: now,
            y,
            travel: 0.0,
        });
    }

    pub fn touch_move(&mut self, y: f32) {
        if let Some(p) = self.press.as_mut() {
            p.travel = p.travel.max((y - p.y).abs());
        }
    }

    /// Touch release. Only a quick, still tap outside the cards closes;
    /// anything longer or further is a scroll.
    pub fn touch_end(&mut self, now: Instant, y: f32, outside_cards: bool) -> bool {
        self.touch_move(y);
        let Some(press) = self.press.take() else {
            return false;
        };
        if self.capability != InputCapability::Touch
            || self.in_grace(now)
            || self.is_closing(now)
        {
            return false;
        }
        let quick = now.saturating_duration_since(press.at) < TAP_MAX;
        let still = press.travel <= TAP_SLOP_PX;
        quick && still && outside_cards && self.begin_close(now)
    }
}
