//! Core engine modules - session controller, sequencing, relay, restore
//!
//! These modules form the ad-break engine, independent of any view layer.

pub mod engine;
pub mod event_bus;
pub mod events;
pub mod relay;
pub mod restore;
pub mod sequence;
pub mod session;

// Re-exports for convenience
pub use engine::{InstreamMethod, InstreamProvider, ProviderFactory, choose_instream_method};
pub use event_bus::EventBus;
pub use events::{InstreamEvent, ProviderEvent, ProviderSignal};
pub use restore::{BreakPhase, RestoreSnapshot};
pub use sequence::AdSequence;
pub use session::{InstreamError, InstreamSession};
