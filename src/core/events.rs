//! Event types flowing through an ad-break session.
//!
//! `ProviderSignal`s come from the ad provider (the "all" subscription);
//! `InstreamEvent`s are the closed set of messages the session emits to
//! the host. Both are plain data - ordering and delivery are owned by
//! the session and `EventBus`.

use serde::{Deserialize, Serialize};

use crate::entities::{AdItem, PlaybackState};

/// Event emitted by the ad-playback provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProviderEvent {
    /// Playback state change
    State(PlaybackState),
    /// Playback progress; also updates the ad model's observable fields
    Time { position: f64, duration: f64 },
    /// Media metadata; dimensions trigger a view resize
    Meta {
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Current item finished. Internal bookkeeping: routed to the
    /// session's completion handler, never re-emitted verbatim.
    ItemComplete,
    /// Media-level failure of the current item
    MediaError { message: String },
    /// Generic provider failure
    Error { message: String },
}

impl ProviderEvent {
    /// Error-class events trigger pod-level recovery (advance to the
    /// next item when one remains).
    pub fn is_error(&self) -> bool {
        matches!(self, ProviderEvent::MediaError { .. } | ProviderEvent::Error { .. })
    }
}

/// A provider event plus the ad-server tag it arrived with, if any.
///
/// The relay stamps the session tag only when the signal lacks its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSignal {
    pub event: ProviderEvent,
    #[serde(default)]
    pub tag: Option<String>,
}

impl From<ProviderEvent> for ProviderSignal {
    fn from(event: ProviderEvent) -> Self {
        Self { event, tag: None }
    }
}

/// Closed set of ad-break events emitted to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InstreamEvent {
    /// A pod item is about to load (emitted after its capabilities
    /// resolved, only while the session is alive)
    PodItem { index: usize, item: AdItem },
    /// The whole pod completed naturally
    PodComplete,
    /// The current item completed
    ItemComplete { tag: Option<String> },
    /// User skipped the current item
    AdSkipped { tag: Option<String> },
    /// User clicked the ad surface
    AdClick { has_controls: bool },
    /// The ad break is over (any exit reason)
    AdBreakEnd,
    /// Session-level failure (e.g. unsupported platform)
    Error { message: String },
    /// Provider event relayed verbatim, tag stamped
    Provider {
        event: ProviderEvent,
        tag: Option<String>,
    },
}
