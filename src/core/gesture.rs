use crate::core::registry::{MatchRegistry, SwipeOutcome};
use crate::models::SwipeCandidate;

/// Horizontal drag distance, in pixels, a card must travel to count as a swipe
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 100.0;

/// Result of resolving a drag release or key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Accept,
    Decline,
    /// Released below the threshold; the card snaps back
    Cancel,
}

/// Keyboard input the swipe deck listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

impl SwipeKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => SwipeKey::ArrowLeft,
            "ArrowRight" => SwipeKey::ArrowRight,
            _ => SwipeKey::Other,
        }
    }
}

/// Turns raw swipe input into decisions
#[derive(Debug, Clone, Copy)]
pub struct GestureResolver {
    threshold_px: f64,
}

impl GestureResolver {
    /// A non-finite or negative threshold falls back to the default
    pub fn new(threshold_px: f64) -> Self {
        let threshold_px = if threshold_px.is_finite() && threshold_px >= 0.0 {
            threshold_px
        } else {
            DEFAULT_SWIPE_THRESHOLD_PX
        };
        Self { threshold_px }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Resolve a drag release from its horizontal displacement
    #[inline]
    pub fn resolve_drag(&self, dx: f64) -> SwipeDecision {
        if dx > self.threshold_px {
            SwipeDecision::Accept
        } else if dx < -self.threshold_px {
            SwipeDecision::Decline
        } else {
            SwipeDecision::Cancel
        }
    }

    /// Resolve a key press; keys other than the arrows are ignored
    pub fn resolve_key(&self, key: SwipeKey) -> Option<SwipeDecision> {
        match key {
            SwipeKey::ArrowRight => Some(SwipeDecision::Accept),
            SwipeKey::ArrowLeft => Some(SwipeDecision::Decline),
            SwipeKey::Other => None,
        }
    }

    /// Apply a decision to the registry. `Cancel` leaves it untouched.
    pub fn apply(
        &self,
        registry: &mut MatchRegistry,
        candidate: SwipeCandidate,
        decision: SwipeDecision,
    ) -> Option<SwipeOutcome> {
        match decision {
            SwipeDecision::Accept => Some(registry.accept(candidate)),
            SwipeDecision::Decline => Some(registry.decline(candidate)),
            SwipeDecision::Cancel => None,
        }
    }
}

impl Default for GestureResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD_PX)
    }
}
