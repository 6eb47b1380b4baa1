//! Observable ad-break state shared with the view layer.
//!
//! `AdModel` is a cloneable handle over interior state: the session writes
//! playback state, position/duration, and skip fields; the view reads them
//! to render the ad surface. All mutable data sits behind one mutex.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Playback state of the ad-break media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
    Complete,
}

#[derive(Debug, Default)]
struct AdModelState {
    state: PlaybackState,
    position: f64,
    duration: f64,
    skip_offset: Option<f64>,
    skip_message: Option<String>,
    skip_text: Option<String>,
}

/// Shared ad-break model handed to the view via `HostView::setup_instream`.
#[derive(Debug, Clone, Default)]
pub struct AdModel {
    state: Arc<Mutex<AdModelState>>, // All mutable data in one mutex
}

impl AdModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AdModelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn set_state(&self, state: PlaybackState) {
        self.lock().state = state;
    }

    pub fn position(&self) -> f64 {
        self.lock().position
    }

    pub fn set_position(&self, position: f64) {
        self.lock().position = position;
    }

    pub fn duration(&self) -> f64 {
        self.lock().duration
    }

    pub fn set_duration(&self, duration: f64) {
        self.lock().duration = duration;
    }

    pub fn skip_offset(&self) -> Option<f64> {
        self.lock().skip_offset
    }

    pub fn skip_message(&self) -> Option<String> {
        self.lock().skip_message.clone()
    }

    pub fn skip_text(&self) -> Option<String> {
        self.lock().skip_text.clone()
    }

    /// Arm the skip fields for the current item.
    pub fn set_skip(&self, offset: f64, message: Option<String>, text: Option<String>) {
        let mut state = self.lock();
        state.skip_offset = Some(offset);
        state.skip_message = message;
        state.skip_text = text;
    }

    /// Disarm the skip fields (between pod items).
    pub fn clear_skip(&self) {
        let mut state = self.lock();
        state.skip_offset = None;
        state.skip_message = None;
        state.skip_text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let model = AdModel::new();
        let other = model.clone();
        model.set_state(PlaybackState::Playing);
        model.set_position(12.5);
        assert_eq!(other.state(), PlaybackState::Playing);
        assert_eq!(other.position(), 12.5);
    }

    #[test]
    fn test_skip_arm_and_clear() {
        let model = AdModel::new();
        model.set_skip(5.0, Some("Skip in xx".into()), Some("Skip".into()));
        assert_eq!(model.skip_offset(), Some(5.0));
        model.clear_skip();
        assert!(model.skip_offset().is_none());
        assert!(model.skip_message().is_none());
    }
}
