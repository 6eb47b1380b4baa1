//! Pod data: ad items, per-item options, and the host playlist-item snapshot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single playable ad unit.
///
/// Immutable once loaded into a pod; owned by the pod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdItem {
    /// Stable identity for logging and host bookkeeping
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Media source the ad provider loads
    pub source: String,
    /// Ad-server tag stamped onto relayed events (unless the event
    /// already carries one)
    #[serde(default)]
    pub tag: Option<String>,
    /// Seconds of playback before the skip button arms
    #[serde(default)]
    pub skip_offset: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
}

impl AdItem {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            tag: None,
            skip_offset: None,
            title: None,
        }
    }

    pub fn with_skip_offset(mut self, offset: f64) -> Self {
        self.skip_offset = Some(offset);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Per-item playback options, merged over session defaults.
///
/// `Default` is the empty option set: no skip offset, no tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdOptions {
    #[serde(default)]
    pub skip_offset: Option<f64>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Countdown message shown before the skip button arms
    #[serde(default)]
    pub skip_message: Option<String>,
    /// Skip button label
    #[serde(default)]
    pub skip_text: Option<String>,
}

impl AdOptions {
    /// Merge `over` on top of `self`: fields present in `over` win,
    /// absent fields keep the defaults.
    pub fn merged(self, over: Option<AdOptions>) -> AdOptions {
        let Some(over) = over else {
            return self;
        };
        AdOptions {
            skip_offset: over.skip_offset.or(self.skip_offset),
            tag: over.tag.or(self.tag),
            skip_message: over.skip_message.or(self.skip_message),
            skip_text: over.skip_text.or(self.skip_text),
        }
    }
}

/// Snapshot copy of a host playlist item.
///
/// Captured at session start; `start_time` is rewritten to the captured
/// playback position before the item is reloaded during restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub source: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Resume position in seconds
    #[serde(default)]
    pub start_time: f64,
}

impl PlaylistItem {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: None,
            start_time: 0.0,
        }
    }
}
