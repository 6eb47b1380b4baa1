//! Data model and host capability traits.
//!
//! `item` holds the immutable pod data (`AdItem`, `AdOptions`, the host
//! `PlaylistItem` snapshot), `ad_model` the observable ad-break state the
//! view renders, and `traits` the capability contracts the host implements.

pub mod ad_model;
pub mod item;
pub mod traits;

// Re-exports for convenience
pub use ad_model::{AdModel, PlaybackState};
pub use item::{AdItem, AdOptions, PlaylistItem};
pub use traits::{
    CapabilityLoad, CapabilitySet, ClickMode, ClickRegion, HostController, HostModel,
    HostProvider, HostView, ProviderManager,
};
