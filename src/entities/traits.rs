//! Host capability traits.
//!
//! These traits define everything the session controller needs from the
//! host player: media pipeline control, model state, the view surface,
//! and the provider manager that resolves media capabilities. The host
//! implements them; the core never sees concrete host types.

use std::collections::BTreeSet;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};

use super::ad_model::{AdModel, PlaybackState};
use super::item::{AdItem, PlaylistItem};

/// Host playback-pipeline control.
pub trait HostController: Send + Sync {
    /// Detach the host provider from the shared playback surface.
    ///
    /// Pseudo-lock: exactly one of {host provider, ad provider} may be
    /// attached at a time. The session detaches before the ad provider
    /// attaches and re-attaches only after full ad teardown.
    fn detach_media(&self);
    /// Re-attach the host provider to the shared playback surface.
    fn attach_media(&self);
    /// Resume host content playback.
    fn play(&self);
    fn set_fullscreen(&self);
    /// True when host playback has not actually started yet.
    fn check_before_play(&self) -> bool;
}

/// The host's original media provider (the engine playing content).
pub trait HostProvider: Send + Sync {
    fn set_playback_rate(&self, rate: f64);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn state(&self) -> PlaybackState;
    fn set_state(&self, state: PlaybackState);
}

/// Host model state consumed and mutated by the session.
pub trait HostModel: Send + Sync {
    /// Current content playback position in seconds.
    fn position(&self) -> f64;
    /// Host player state.
    fn playback_state(&self) -> PlaybackState;
    /// Media-model state (may lag the provider's own state on mobile).
    fn media_state(&self) -> PlaybackState;
    fn set_media_state(&self, state: PlaybackState);
    /// Copy of the currently playing playlist item.
    fn current_item(&self) -> Option<PlaylistItem>;
    /// True when the host content has already completed.
    fn check_complete(&self) -> bool;
    /// Reload a playlist item into the host (used by restore).
    fn load_video(&self, item: PlaylistItem);
    /// Handle to the host's original provider.
    fn video(&self) -> Arc<dyn HostProvider>;
    /// Provider manager resolving media capabilities for pods.
    fn providers(&self) -> Arc<dyn ProviderManager>;
    fn controls_enabled(&self) -> bool;
    fn set_skip_button(&self, enabled: bool);
    fn set_hide_ads_controls(&self, hide: bool);
    /// True when the host player itself was torn down mid-break;
    /// restore must be skipped in that case.
    fn player_destroyed(&self) -> bool;
}

/// Which click behavior the display overlay routes while an ad plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Swallow clicks (default api play/pause must not fire while the
    /// first item buffers)
    Suppress,
    /// Route single/double clicks to the ad session
    AdSession,
}

/// Display overlay click routing.
pub trait ClickRegion: Send + Sync {
    fn set_alternate_click_handlers(&self, mode: ClickMode);
    fn revert_alternate_click_handlers(&self);
}

/// View surface for the ad break.
pub trait HostView: Send + Sync {
    /// Show ad state instead of the normal player state.
    fn setup_instream(&self, ad_model: AdModel);
    /// Tear down the ad surface. Must be called after the ad provider
    /// is destroyed.
    fn destroy_instream(&self);
    /// Display overlay, when the view has one.
    fn click_region(&self) -> Option<Arc<dyn ClickRegion>>;
    fn set_alt_text(&self, text: &str);
    /// Re-fit the media element (driven by provider dimension metadata).
    fn resize_media(&self);
}

/// Set of media-capability names a pod requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    names: BTreeSet<String>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Pending capability load, resolved by the host's provider manager.
///
/// The session polls this from `update()`; a resolution arriving after
/// `destroy()` is discarded by the session's liveness guard.
#[derive(Debug)]
pub struct CapabilityLoad {
    rx: Receiver<()>,
}

impl CapabilityLoad {
    pub fn new(rx: Receiver<()>) -> Self {
        Self { rx }
    }

    /// Already-resolved load (capabilities were cached).
    pub fn resolved() -> Self {
        let (tx, rx) = bounded(1);
        let _ = tx.send(());
        Self { rx }
    }

    /// Channel-backed load: the manager keeps the sender and signals it
    /// when loading finishes.
    pub fn channel() -> (Sender<()>, Self) {
        let (tx, rx) = bounded(1);
        (tx, Self { rx })
    }

    /// Non-blocking resolution check. A dropped sender counts as
    /// resolved so an abandoned load cannot wedge the session.
    pub fn poll(&self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }
}

/// Host-side provider manager: maps pods to required capabilities and
/// loads them asynchronously.
pub trait ProviderManager: Send + Sync {
    fn required(&self, pod: &[AdItem]) -> CapabilitySet;
    fn load(&self, caps: CapabilitySet) -> CapabilityLoad;
}
