//! Ad-playback engine variants and selection.
//!
//! Two engine families implement one shared playback contract
//! (`InstreamProvider`); `choose_instream_method` maps the host's
//! enumerated provider configuration onto one of them. Selection is a
//! pure decision with no error path - absent configuration means the
//! native engine.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use super::events::ProviderSignal;
use crate::config::{HostConfig, ProviderKind};
use crate::entities::{AdItem, HostProvider};

/// Ad-playback engine variant driving the break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstreamMethod {
    /// Native media pipeline
    Native,
    /// Legacy plugin-based pipeline
    LegacyPlugin,
}

/// Select the engine variant for a host configuration.
pub fn choose_instream_method(config: &HostConfig) -> InstreamMethod {
    match config.provider {
        Some(ProviderKind::LegacyPlugin) => InstreamMethod::LegacyPlugin,
        _ => InstreamMethod::Native,
    }
}

/// Capability contract both engine variants satisfy.
///
/// The session owns exactly one provider instance per break and is the
/// only caller of these methods.
pub trait InstreamProvider: Send + Sync {
    /// Prepare the engine (attach to the shared playback surface).
    fn init(&self);
    /// Load and start an ad item.
    fn load(&self, item: &AdItem);
    fn instream_play(&self);
    fn instream_pause(&self);
    /// Tear the engine down and release the playback surface.
    fn instream_destroy(&self);
    /// Relay an external provider's events into this engine (used by
    /// ad plugins that bring their own provider).
    fn apply_provider_listeners(&self, provider: Arc<dyn HostProvider>);
    /// Wildcard subscription: every event the engine emits, in order.
    fn signals(&self) -> Receiver<ProviderSignal>;
}

/// Instantiates the concrete engine for a selected variant.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, method: InstreamMethod) -> Arc<dyn InstreamProvider>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_plugin_selects_legacy() {
        let config = HostConfig {
            provider: Some(ProviderKind::LegacyPlugin),
            ..HostConfig::default()
        };
        assert_eq!(choose_instream_method(&config), InstreamMethod::LegacyPlugin);
    }

    #[test]
    fn test_native_selects_native() {
        let config = HostConfig {
            provider: Some(ProviderKind::Native),
            ..HostConfig::default()
        };
        assert_eq!(choose_instream_method(&config), InstreamMethod::Native);
    }

    #[test]
    fn test_absent_defaults_to_native() {
        assert_eq!(choose_instream_method(&HostConfig::default()), InstreamMethod::Native);
    }
}
