//! Scripted ad-break simulation for development and testing.
//!
//! Drives a full session lifecycle against in-process host stubs: init,
//! pod load, scripted provider playback, optional mid-pod failure or
//! user skip, teardown and restore. Useful for eyeballing the event
//! stream and log output without a real player.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use clap::Parser;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info};

use instream::entities::{
    CapabilityLoad, CapabilitySet, ClickMode, ClickRegion, HostController, HostModel,
    HostProvider, HostView, ProviderManager,
};
use instream::{
    AdItem, AdModel, HostConfig, InstreamMethod, InstreamProvider, InstreamSession, Platform,
    PlaybackState, PlaylistItem, ProviderEvent, ProviderFactory, ProviderSignal,
};

/// Ad-break session simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ad items in the pod
    #[arg(short = 'n', long = "items", value_name = "N", default_value = "2")]
    items: usize,

    /// Load the pod from a JSON file (array of ad items) instead
    #[arg(long = "pod", value_name = "FILE")]
    pod: Option<PathBuf>,

    /// Fail this item (0-based) with a media error instead of completing
    #[arg(long = "fail", value_name = "N")]
    fail: Option<usize>,

    /// Skip the first item once its skip button arms
    #[arg(short = 's', long = "skip")]
    skip: bool,

    /// Seconds of ad playback before the skip button arms
    #[arg(long = "skip-offset", value_name = "SECS", default_value = "5")]
    skip_offset: f64,

    /// Content position at break start (0 simulates a preroll)
    #[arg(short = 'p', long = "position", value_name = "SECS", default_value = "42")]
    position: f64,

    /// Simulate the blocked Android 2.3 runtime
    #[arg(long = "blocked-platform")]
    blocked_platform: bool,

    /// Increase logging verbosity (default: info, -v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

// === Host stubs ===

struct SimController {
    before_play: bool,
}

impl HostController for SimController {
    fn detach_media(&self) {
        info!("host: media pipeline detached");
    }
    fn attach_media(&self) {
        info!("host: media pipeline re-attached");
    }
    fn play(&self) {
        info!("host: play requested");
    }
    fn set_fullscreen(&self) {
        info!("host: fullscreen requested");
    }
    fn check_before_play(&self) -> bool {
        self.before_play
    }
}

#[derive(Default)]
struct SimHostProvider {
    state: Mutex<PlaybackState>,
}

impl HostProvider for SimHostProvider {
    fn set_playback_rate(&self, rate: f64) {
        debug!("host provider: playback rate {rate}");
    }
    fn play(&self) {
        info!("host provider: play (content resumes)");
    }
    fn pause(&self) {
        info!("host provider: pause (content suspended)");
    }
    fn stop(&self) {
        info!("host provider: stop");
    }
    fn state(&self) -> PlaybackState {
        *self.state.lock().unwrap()
    }
    fn set_state(&self, state: PlaybackState) {
        *self.state.lock().unwrap() = state;
    }
}

struct SimManager;

impl ProviderManager for SimManager {
    fn required(&self, pod: &[AdItem]) -> CapabilitySet {
        pod.iter().map(|_| "mp4".to_string()).collect()
    }
    fn load(&self, caps: CapabilitySet) -> CapabilityLoad {
        info!("host: {} capability(ies) resolved from cache", caps.len());
        CapabilityLoad::resolved()
    }
}

struct SimModel {
    position: f64,
    state: PlaybackState,
    media_state: Mutex<PlaybackState>,
    provider: Arc<SimHostProvider>,
    manager: Arc<SimManager>,
}

impl HostModel for SimModel {
    fn position(&self) -> f64 {
        self.position
    }
    fn playback_state(&self) -> PlaybackState {
        self.state
    }
    fn media_state(&self) -> PlaybackState {
        *self.media_state.lock().unwrap()
    }
    fn set_media_state(&self, state: PlaybackState) {
        *self.media_state.lock().unwrap() = state;
    }
    fn current_item(&self) -> Option<PlaylistItem> {
        Some(PlaylistItem::new("content/feature.mp4"))
    }
    fn check_complete(&self) -> bool {
        false
    }
    fn load_video(&self, item: PlaylistItem) {
        info!("host: content reloaded at {:.1}s ({})", item.start_time, item.source);
    }
    fn video(&self) -> Arc<dyn HostProvider> {
        self.provider.clone()
    }
    fn providers(&self) -> Arc<dyn ProviderManager> {
        self.manager.clone()
    }
    fn controls_enabled(&self) -> bool {
        true
    }
    fn set_skip_button(&self, enabled: bool) {
        debug!("host: skip button {}", if enabled { "armed" } else { "disarmed" });
    }
    fn set_hide_ads_controls(&self, hide: bool) {
        debug!("host: ad controls hidden={hide}");
    }
    fn player_destroyed(&self) -> bool {
        false
    }
}

struct SimClickRegion;

impl ClickRegion for SimClickRegion {
    fn set_alternate_click_handlers(&self, mode: ClickMode) {
        debug!("view: click routing -> {mode:?}");
    }
    fn revert_alternate_click_handlers(&self) {
        debug!("view: click routing reverted");
    }
}

struct SimView {
    click: Arc<SimClickRegion>,
}

impl HostView for SimView {
    fn setup_instream(&self, _ad_model: AdModel) {
        info!("view: ad surface shown");
    }
    fn destroy_instream(&self) {
        info!("view: ad surface torn down");
    }
    fn click_region(&self) -> Option<Arc<dyn ClickRegion>> {
        Some(self.click.clone())
    }
    fn set_alt_text(&self, text: &str) {
        info!("view: alt text \"{text}\"");
    }
    fn resize_media(&self) {
        debug!("view: media resized");
    }
}

// === Scripted ad provider ===

/// Plays each loaded item as a fixed script of signals, released one per
/// `tick()` so the simulation loop interleaves playback with session
/// updates.
struct ScriptedProvider {
    tx: Sender<ProviderSignal>,
    rx: Receiver<ProviderSignal>,
    script: Mutex<VecDeque<ProviderSignal>>,
    loads: Mutex<usize>,
    fail_at: Option<usize>,
}

impl ScriptedProvider {
    fn new(fail_at: Option<usize>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            script: Mutex::new(VecDeque::new()),
            loads: Mutex::new(0),
            fail_at,
        }
    }

    /// Release the next scripted signal, if any.
    fn tick(&self) -> bool {
        let Some(signal) = self.script.lock().unwrap().pop_front() else {
            return false;
        };
        self.tx.send(signal).is_ok()
    }
}

impl InstreamProvider for ScriptedProvider {
    fn init(&self) {
        info!("ad provider: attached to playback surface");
    }

    fn load(&self, item: &AdItem) {
        let index = {
            let mut loads = self.loads.lock().unwrap();
            let index = *loads;
            *loads += 1;
            index
        };
        info!("ad provider: loading item {} ({})", index, item.source);

        let duration = 10.0;
        let mut script = self.script.lock().unwrap();
        script.clear();
        script.push_back(ProviderEvent::State(PlaybackState::Buffering).into());
        script.push_back(ProviderEvent::State(PlaybackState::Playing).into());
        script.push_back(ProviderEvent::Meta { width: Some(640), height: Some(360) }.into());
        for step in 1..=4 {
            let position = duration * f64::from(step) / 4.0;
            script.push_back(ProviderEvent::Time { position, duration }.into());
        }
        if self.fail_at == Some(index) {
            script.push_back(
                ProviderEvent::MediaError { message: format!("creative {index} failed to decode") }
                    .into(),
            );
        } else {
            script.push_back(ProviderEvent::ItemComplete.into());
        }
    }

    fn instream_play(&self) {
        info!("ad provider: play");
    }
    fn instream_pause(&self) {
        info!("ad provider: pause");
    }
    fn instream_destroy(&self) {
        info!("ad provider: destroyed");
    }
    fn apply_provider_listeners(&self, _provider: Arc<dyn HostProvider>) {}
    fn signals(&self) -> Receiver<ProviderSignal> {
        self.rx.clone()
    }
}

struct ScriptedFactory {
    provider: Arc<ScriptedProvider>,
}

impl ProviderFactory for ScriptedFactory {
    fn create(&self, method: InstreamMethod) -> Arc<dyn InstreamProvider> {
        info!("factory: creating {method:?} engine");
        self.provider.clone()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let platform = if args.blocked_platform { Platform::android(2, 3) } else { Platform::default() };
    let config = HostConfig { platform, ..HostConfig::default() };

    let controller = Arc::new(SimController { before_play: args.position == 0.0 });
    let host_provider = Arc::new(SimHostProvider::default());
    let model = Arc::new(SimModel {
        position: args.position,
        state: PlaybackState::Playing,
        media_state: Mutex::new(PlaybackState::Playing),
        provider: host_provider,
        manager: Arc::new(SimManager),
    });
    let view = Arc::new(SimView { click: Arc::new(SimClickRegion) });
    let provider = Arc::new(ScriptedProvider::new(args.fail));
    let factory = ScriptedFactory { provider: provider.clone() };

    let mut session = InstreamSession::new(controller, model, view, &factory, config);

    // Print everything the session tells the host
    session.bus().subscribe(|event| println!("  [event] {event:?}"));

    session.init(false);
    println!("break phase: {:?}", session.break_phase());

    let pod: Vec<AdItem> = match &args.pod {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => (0..args.items)
            .map(|i| AdItem::new(format!("ads/creative-{i}.mp4")).with_skip_offset(args.skip_offset))
            .collect(),
    };
    if pod.is_empty() {
        bail!("pod must contain at least one item");
    }
    session.load_pod(pod, None)?;

    let mut skipped = false;
    let ad_model = session.ad_model();
    for _ in 0..1000 {
        if !session.is_active() {
            break;
        }
        session.update();
        provider.tick();

        if args.skip
            && !skipped
            && session.pod_index() == 0
            && ad_model.position() >= args.skip_offset
        {
            info!("user: skip button pressed");
            skipped = true;
            session.skip_ad();
        }
    }
    // Everything was printed by the subscriber; the deferred queue still
    // holds the same events for hosts that poll instead
    let queued = session.bus().poll();
    println!("session over (pod index reached {}, {} events queued)", session.pod_index(), queued.len());
    Ok(())
}
