//! Ad-break session controller.
//!
//! **Architecture**: the session does NOT own the host player. It holds
//! capability handles (`HostController`, `HostModel`, `HostView`) and
//! exclusively owns the alternate ad provider for the lifetime of one
//! break. Releasing that provider handle is the destroy idempotence
//! guard: a second `destroy()` is a no-op.
//!
//! # Lifecycle
//!
//! `Idle -> Initializing -> Buffering -> Playing <-> Paused ->
//! ItemComplete -> {Buffering (next item) | Ending} -> Destroyed`
//!
//! `init()` captures the restore snapshot and detaches the host's media
//! pipeline (pseudo-lock over the shared playback surface), `load_pod()`
//! starts the asynchronous capability load, and `update()` - called from
//! the host loop - completes pending loads and pumps provider signals in
//! emission order. All exit paths (natural completion, skip, error
//! exhaustion) converge on one destroy/restore path.
//!
//! # Failure recovery
//!
//! A failing creative does not abort the break: error-class provider
//! signals advance the pod when items remain. Only the end-of-pod path
//! surfaces a break-level completion to the host, and only natural
//! completion additionally emits `PodComplete`.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use log::{debug, info, trace, warn};
use uuid::Uuid;

use super::engine::{InstreamMethod, InstreamProvider, ProviderFactory, choose_instream_method};
use super::event_bus::EventBus;
use super::events::{InstreamEvent, ProviderEvent, ProviderSignal};
use super::relay::{self, RelayAction};
use super::restore::{BreakPhase, RestoreSnapshot};
use super::sequence::AdSequence;
use crate::config::HostConfig;
use crate::entities::{
    AdItem, AdModel, AdOptions, CapabilityLoad, ClickMode, HostController, HostModel,
    HostProvider, HostView, PlaybackState,
};

/// Session-level errors. Per-item media failures are not errors at this
/// level - they are absorbed into pod advancement.
#[derive(Debug)]
pub enum InstreamError {
    /// The runtime cannot host a second media pipeline; no session state
    /// was changed and the provider was never touched.
    UnsupportedPlatform(String),
}

impl std::fmt::Display for InstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstreamError::UnsupportedPlatform(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for InstreamError {}

/// Why the pod ended. Only natural completion propagates a pod-level
/// completion to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    Completed,
    Skipped,
    Errored,
}

/// Capability load awaiting resolution in `update()`.
#[derive(Debug)]
struct PendingLoad {
    generation: u64,
    load: CapabilityLoad,
}

/// The live ad-break session. At most one per host player instance.
pub struct InstreamSession {
    id: Uuid,
    config: HostConfig,
    controller: Arc<dyn HostController>,
    model: Arc<dyn HostModel>,
    view: Arc<dyn HostView>,
    method: InstreamMethod,
    /// Exclusively owned ad provider; `None` once destroyed
    provider: Option<Arc<dyn InstreamProvider>>,
    signals: Option<Receiver<ProviderSignal>>,
    bus: EventBus,
    ad_model: AdModel,
    sequence: AdSequence,
    /// Current item options merged over session defaults
    options: AdOptions,
    snapshot: Option<RestoreSnapshot>,
    pending_load: Option<PendingLoad>,
    load_generation: u64,
}

impl InstreamSession {
    /// Create a session: selects the engine variant for the host
    /// configuration and has the factory instantiate it.
    pub fn new(
        controller: Arc<dyn HostController>,
        model: Arc<dyn HostModel>,
        view: Arc<dyn HostView>,
        factory: &dyn ProviderFactory,
        config: HostConfig,
    ) -> Self {
        let method = choose_instream_method(&config);
        let provider = factory.create(method);
        let id = Uuid::new_v4();
        info!("ad session {} created ({:?} engine)", id, method);

        Self {
            id,
            config,
            controller,
            model,
            view,
            method,
            provider: Some(provider),
            signals: None,
            bus: EventBus::new(),
            ad_model: AdModel::new(),
            sequence: AdSequence::new(),
            options: AdOptions::default(),
            snapshot: None,
            pending_load: None,
            load_generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> InstreamMethod {
        self.method
    }

    /// Host-facing event bus: subscribe for immediate callbacks, poll
    /// for batch processing.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Handle to the observable ad-break model the view renders.
    pub fn ad_model(&self) -> AdModel {
        self.ad_model.clone()
    }

    /// Cursor into the current pod.
    pub fn pod_index(&self) -> usize {
        self.sequence.index()
    }

    /// Break phase captured at `init()`.
    pub fn break_phase(&self) -> Option<BreakPhase> {
        self.snapshot.as_ref().map(|s| s.phase())
    }

    pub fn is_active(&self) -> bool {
        self.provider.is_some()
    }

    /// Hand the playback surface over from the host to the ad provider.
    ///
    /// `shared_surface` is true when the ad reuses the host's media
    /// element; the host provider is then left un-paused (pausing the
    /// shared element would stall the ad itself).
    pub fn init(&mut self, shared_surface: bool) {
        let Some(provider) = self.provider.clone() else {
            warn!("init on a destroyed session, ignoring");
            return;
        };

        // Keep track of the original player state
        let snapshot = RestoreSnapshot::capture(self.controller.as_ref(), self.model.as_ref());
        // Reset playback rate in case the ad reuses the content media element
        snapshot.provider().set_playback_rate(1.0);

        self.signals = Some(provider.signals());
        provider.init();

        // Pseudo-lock: the host provider must stop dispatching events
        // before the ad provider attaches to the shared surface
        self.controller.detach_media();
        self.model.set_media_state(PlaybackState::Buffering);

        let host_state = self.model.playback_state();
        if !shared_surface
            && matches!(host_state, PlaybackState::Playing | PlaybackState::Buffering)
        {
            snapshot.provider().pause();
        }

        // Show instream state instead of the normal player state
        self.view.setup_instream(self.ad_model.clone());
        self.ad_model.set_state(PlaybackState::Buffering);

        // Don't trigger api play/pause on display click while buffering
        if let Some(click) = self.view.click_region() {
            click.set_alternate_click_handlers(ClickMode::Suppress);
        }

        self.view.set_alt_text(&self.config.loading_ad_text);
        info!("ad session {} initialized ({:?})", self.id, snapshot.phase());
        self.snapshot = Some(snapshot);
    }

    /// Load a single-item pod.
    pub fn load_item(&mut self, item: AdItem, options: Option<AdOptions>) -> Result<(), InstreamError> {
        self.load_pod(vec![item], options.map(|o| vec![o]))
    }

    /// Load an ordered pod of ad items with per-item options.
    ///
    /// Begins an asynchronous capability load; the item itself is handed
    /// to the provider once `update()` observes the resolution.
    pub fn load_pod(
        &mut self,
        items: Vec<AdItem>,
        options: Option<Vec<AdOptions>>,
    ) -> Result<(), InstreamError> {
        if self.provider.is_none() {
            debug!("load requested on a destroyed session, ignoring");
            return Ok(());
        }
        if self.config.platform.blocks_instream() {
            let message = format!(
                "Error loading ad: cannot play instream on {}",
                self.config.platform.describe()
            );
            warn!("{message}");
            self.bus.emit(InstreamEvent::Error { message: message.clone() });
            return Err(InstreamError::UnsupportedPlatform(message));
        }
        if items.is_empty() {
            warn!("empty ad pod, nothing to load");
            return Ok(());
        }

        self.sequence.start(items, options);
        self.request_load();
        Ok(())
    }

    /// Cooperative pump, called from the host loop: completes a resolved
    /// capability load, then handles provider signals in emission order.
    pub fn update(&mut self) {
        self.poll_pending_load();
        self.pump_signals();
    }

    fn request_load(&mut self) {
        let providers = self.model.providers();
        let caps = providers.required(self.sequence.items());

        self.model.set_hide_ads_controls(false);
        self.ad_model.set_state(PlaybackState::Buffering);

        let load = providers.load(caps);
        self.load_generation += 1;
        trace!(
            "capability load {} requested for pod item {}",
            self.load_generation,
            self.sequence.index()
        );
        self.pending_load = Some(PendingLoad { generation: self.load_generation, load });
    }

    fn poll_pending_load(&mut self) {
        let resolved = match &self.pending_load {
            Some(pending) => pending.load.poll(),
            None => return,
        };
        if !resolved {
            return;
        }
        let Some(pending) = self.pending_load.take() else {
            return;
        };
        // Stale-callback guards: the session may have been destroyed or
        // restarted while the load was in flight
        if self.provider.is_none() {
            trace!("capability load resolved after destroy, discarding");
            return;
        }
        if pending.generation != self.load_generation {
            trace!(
                "stale capability load {} (current {}), discarding",
                pending.generation, self.load_generation
            );
            return;
        }
        self.finish_load();
    }

    fn finish_load(&mut self) {
        let Some(provider) = self.provider.clone() else {
            return;
        };
        let index = self.sequence.index();
        let (item, item_options) = match self.sequence.current() {
            Some((item, options)) => (item.clone(), options.cloned()),
            None => {
                warn!("capability load resolved with no current pod item");
                return;
            }
        };

        // Pod-item notification goes out only after capabilities resolved,
        // and only while the session is alive
        self.bus.emit(InstreamEvent::PodItem { index, item: item.clone() });

        self.options = AdOptions::default().merged(item_options);
        if self.options.tag.is_none() {
            self.options.tag = item.tag.clone();
        }
        provider.load(&item);
        self.add_click_handlers();

        let skip_offset = item.skip_offset.or(self.options.skip_offset);
        if let Some(offset) = skip_offset {
            self.setup_skip_button(offset);
        }
        debug!("ad item {} loading: {}", index, item.source);
    }

    fn pump_signals(&mut self) {
        let Some(rx) = self.signals.clone() else {
            return;
        };
        while let Ok(signal) = rx.try_recv() {
            if self.provider.is_none() {
                break;
            }
            self.handle_signal(signal);
        }
    }

    /// Handle one provider signal. Public so hosts driving the provider
    /// synchronously can inject signals without the channel.
    pub fn handle_signal(&mut self, signal: ProviderSignal) {
        if self.provider.is_none() {
            return;
        }
        match &signal.event {
            ProviderEvent::ItemComplete => {
                self.item_complete();
                return;
            }
            ProviderEvent::State(state) => self.ad_model.set_state(*state),
            ProviderEvent::Time { position, duration } => {
                self.ad_model.set_position(*position);
                self.ad_model.set_duration(*duration);
            }
            ProviderEvent::Meta { width, height } => {
                // Dimension metadata lets the view re-fit the media element
                if width.is_some() && height.is_some() {
                    self.view.resize_media();
                }
            }
            ProviderEvent::MediaError { .. } | ProviderEvent::Error { .. } => {}
        }

        if relay::forward(&self.bus, signal, self.options.tag.as_deref()) == RelayAction::AdvancePod
        {
            self.item_next(EndReason::Errored);
        }
    }

    fn item_complete(&mut self) {
        self.bus.emit(InstreamEvent::ItemComplete { tag: self.options.tag.clone() });
        self.item_next(EndReason::Completed);
    }

    /// Pod-advance-or-end: one code path for completion, skip, and error
    /// exhaustion, so pod sequencing is consistent regardless of exit
    /// reason.
    fn item_next(&mut self, reason: EndReason) {
        if self.sequence.has_next() {
            self.load_next_item();
            return;
        }
        info!("ad break over ({:?})", reason);
        self.bus.emit(InstreamEvent::AdBreakEnd);
        if reason == EndReason::Completed {
            // Pod-level completion is only signalled for natural
            // completion; skip and error exhaustion end the break
            // without it
            self.bus.emit(InstreamEvent::PodComplete);
        }
        self.destroy();
    }

    fn load_next_item(&mut self) {
        // Ensure a fresh play event for the next item
        self.ad_model.set_state(PlaybackState::Buffering);
        self.ad_model.clear_skip();
        self.model.set_skip_button(false);
        self.sequence.advance();
        self.request_load();
    }

    /// User skipped the current item. Shares the pod-advance-or-end path
    /// with natural completion, but notifies a skip instead.
    pub fn skip_ad(&mut self) {
        if self.provider.is_none() {
            return;
        }
        self.bus.emit(InstreamEvent::AdSkipped { tag: self.options.tag.clone() });
        self.item_next(EndReason::Skipped);
    }

    /// Single click on the ad surface: notify the host, then toggle ad
    /// playback (resume only when the host exposes controls).
    pub fn click(&self) {
        let has_controls = self.model.controls_enabled();
        self.bus.emit(InstreamEvent::AdClick { has_controls });

        let Some(provider) = &self.provider else {
            return;
        };
        if self.ad_model.state() == PlaybackState::Paused {
            if has_controls {
                provider.instream_play();
            }
        } else {
            provider.instream_pause();
        }
    }

    /// Double click while the ad is paused: the user wants their content
    /// back - request host fullscreen and host playback.
    pub fn double_click(&self) {
        if self.provider.is_none() {
            return;
        }
        if self.ad_model.state() == PlaybackState::Paused && self.model.controls_enabled() {
            self.controller.set_fullscreen();
            self.controller.play();
        }
    }

    pub fn play(&self) {
        if let Some(provider) = &self.provider {
            provider.instream_play();
        }
    }

    pub fn pause(&self) {
        if let Some(provider) = &self.provider {
            provider.instream_pause();
        }
    }

    /// Arm the skip button for the current item.
    pub fn setup_skip_button(&self, offset: f64) {
        self.model.set_skip_button(false);
        self.ad_model.set_skip(
            offset,
            self.options.skip_message.clone(),
            self.options.skip_text.clone(),
        );
        self.model.set_skip_button(true);
    }

    /// Relay an external provider (brought by an ad plugin) into the
    /// engine and re-install the ad click handlers.
    pub fn apply_provider_listeners(&self, provider: Arc<dyn HostProvider>) {
        if let Some(instream) = &self.provider {
            instream.apply_provider_listeners(provider);
            self.add_click_handlers();
        }
    }

    fn add_click_handlers(&self) {
        if let Some(click) = self.view.click_region() {
            click.set_alternate_click_handlers(ClickMode::AdSession);
        }
    }

    /// Alt-text on the ad surface (plugins show loading/countdown text).
    pub fn set_text(&self, text: &str) {
        self.view.set_alt_text(text);
    }

    /// Hide the host's ad controls (used by plugins rendering their own).
    pub fn hide(&self) {
        self.model.set_hide_ads_controls(true);
    }

    /// Current ad playback state, or `None` when no session is active -
    /// hosts use the sentinel to tell "not in ad mode" apart from any
    /// real state.
    pub fn get_state(&self) -> Option<PlaybackState> {
        self.provider.as_ref().map(|_| self.ad_model.state())
    }

    /// Tear the session down and restore the host. Idempotent: entry
    /// from any state, second call is a no-op.
    pub fn destroy(&mut self) {
        self.bus.clear_subscribers();
        self.model.set_skip_button(false);

        let Some(provider) = self.provider.take() else {
            return;
        };
        info!("destroying ad session {}", self.id);
        self.pending_load = None;
        self.signals = None;

        if let Some(click) = self.view.click_region() {
            click.revert_alternate_click_handlers();
        }
        provider.instream_destroy();
        // Must happen after the provider teardown
        self.view.destroy_instream();

        // Host player torn down mid-break: nothing left to restore
        if self.model.player_destroyed() {
            self.snapshot = None;
            return;
        }

        // Hand the playback surface back before restoring
        self.controller.attach_media();
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(self.model.as_ref(), &self.config.platform);
        }
    }
}

impl std::fmt::Debug for InstreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstreamSession")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("active", &self.provider.is_some())
            .field("pod_index", &self.sequence.index())
            .finish()
    }
}
