//! INSTREAM - Ad-break session controller for media players
//!
//! Suspends the host's primary playback pipeline, drives an alternate
//! ad-specific media provider through a pod of one or more ad items,
//! relays provider events back to the host, and restores the host
//! player to its pre-ad state when the break ends.
//!
//! The host is reached exclusively through capability traits
//! (`entities::traits`), so the crate has no opinion about rendering,
//! decoding, or input handling.

// Core engine (session controller, sequencing, relay, restore)
pub mod core;

// Host-facing configuration and data model
pub mod config;
pub mod entities;

// Re-export commonly used types from core
pub use core::engine::{InstreamMethod, InstreamProvider, ProviderFactory, choose_instream_method};
pub use core::event_bus::EventBus;
pub use core::events::{InstreamEvent, ProviderEvent, ProviderSignal};
pub use core::restore::{BreakPhase, RestoreSnapshot};
pub use core::sequence::AdSequence;
pub use core::session::{InstreamError, InstreamSession};

// Re-export entities
pub use config::{HostConfig, OsFamily, OsVersion, Platform, ProviderKind};
pub use entities::{AdItem, AdModel, AdOptions, PlaybackState, PlaylistItem};
