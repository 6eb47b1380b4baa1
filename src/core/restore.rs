//! Pre-ad snapshot capture and post-ad restoration.
//!
//! The snapshot is taken once at session start and consumed by value
//! exactly once at teardown; the derived `BreakPhase` decides whether
//! the host content is reloaded and resumed or simply stopped.

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Platform;
use crate::entities::{HostController, HostModel, HostProvider, PlaybackState, PlaylistItem};

/// Where the ad break sits relative to the host content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakPhase {
    Preroll,
    Midroll,
    Postroll,
    /// No content was active; treated like a postroll on restore
    Idle,
}

impl BreakPhase {
    /// Derive the phase from the host state at session start.
    ///
    /// Preroll if playback had not started, or the item sat at position 0
    /// without having completed; Postroll if the content already
    /// completed; Midroll otherwise.
    pub fn classify(
        before_play: bool,
        position: f64,
        content_complete: bool,
        host_state: PlaybackState,
    ) -> BreakPhase {
        if before_play || (position == 0.0 && !content_complete) {
            BreakPhase::Preroll
        } else if content_complete || host_state == PlaybackState::Complete {
            BreakPhase::Postroll
        } else {
            BreakPhase::Midroll
        }
    }
}

/// Host playback state captured at session start, read-only afterwards.
pub struct RestoreSnapshot {
    provider: Arc<dyn HostProvider>,
    position: f64,
    item: Option<PlaylistItem>,
    phase: BreakPhase,
}

impl RestoreSnapshot {
    /// Capture the host's pre-ad state and classify the break phase.
    pub fn capture(controller: &dyn HostController, model: &dyn HostModel) -> Self {
        let provider = model.video();
        let mut position = model.position();
        let item = model.current_item();

        let phase = BreakPhase::classify(
            controller.check_before_play(),
            position,
            model.check_complete(),
            model.playback_state(),
        );
        if phase == BreakPhase::Preroll {
            // Content restarts from the top after a preroll
            position = 0.0;
        }
        debug!("restore snapshot captured: phase {:?}, position {:.2}", phase, position);

        Self { provider, position, item, phase }
    }

    pub fn phase(&self) -> BreakPhase {
        self.phase
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Handle to the host's original provider.
    pub fn provider(&self) -> &Arc<dyn HostProvider> {
        &self.provider
    }

    /// Apply the phase-appropriate restoration. Consumes the snapshot -
    /// restoration runs at most once per session.
    pub fn restore(self, model: &dyn HostModel, platform: &Platform) {
        info!("restoring host player after ad break ({:?})", self.phase);
        match self.phase {
            BreakPhase::Preroll | BreakPhase::Midroll => {
                if let Some(mut item) = self.item {
                    item.start_time = self.position;
                    model.load_video(item);
                }
                // On mobile the media model can be stuck in Buffering while
                // the provider itself still reports Playing; the state-change
                // propagation that drives playback never fires then, so force
                // the provider back to Buffering first.
                if platform.mobile
                    && model.media_state() == PlaybackState::Buffering
                    && self.provider.state() == PlaybackState::Playing
                {
                    self.provider.set_state(PlaybackState::Buffering);
                }
                self.provider.play();
            }
            BreakPhase::Postroll | BreakPhase::Idle => {
                self.provider.stop();
            }
        }
    }
}

impl std::fmt::Debug for RestoreSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreSnapshot")
            .field("position", &self.position)
            .field("item", &self.item)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_zero_not_complete_is_preroll() {
        let phase = BreakPhase::classify(false, 0.0, false, PlaybackState::Idle);
        assert_eq!(phase, BreakPhase::Preroll);
    }

    #[test]
    fn test_before_play_is_preroll_regardless_of_position() {
        let phase = BreakPhase::classify(true, 42.0, false, PlaybackState::Playing);
        assert_eq!(phase, BreakPhase::Preroll);
    }

    #[test]
    fn test_content_complete_is_postroll() {
        let phase = BreakPhase::classify(false, 120.0, true, PlaybackState::Complete);
        assert_eq!(phase, BreakPhase::Postroll);
        // Host state Complete alone also counts
        let phase = BreakPhase::classify(false, 120.0, false, PlaybackState::Complete);
        assert_eq!(phase, BreakPhase::Postroll);
    }

    #[test]
    fn test_mid_content_is_midroll() {
        let phase = BreakPhase::classify(false, 42.0, false, PlaybackState::Playing);
        assert_eq!(phase, BreakPhase::Midroll);
    }
}
