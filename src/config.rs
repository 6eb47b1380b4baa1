//! Host player configuration consumed by the session controller.
//!
//! The ad-playback engine is selected from an explicit enumerated
//! `ProviderKind` (see `core::engine::choose_instream_method`), and the
//! runtime platform is described by `Platform` so the unsupported-platform
//! gate and the mobile restore correction are testable without touching
//! real OS detection.

use serde::{Deserialize, Serialize};

/// Ad-playback engine family configured on the host player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProviderKind {
    /// Native media pipeline (default)
    #[default]
    Native,
    /// Legacy plugin-based pipeline
    LegacyPlugin,
}

/// Operating-system family of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OsFamily {
    Android,
    Ios,
    Windows,
    MacOs,
    Linux,
    #[default]
    Other,
}

/// Major.minor OS version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
}

impl OsVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// Runtime platform description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Platform {
    #[serde(default)]
    pub family: OsFamily,
    #[serde(default)]
    pub version: OsVersion,
    /// Mobile runtimes need a media-state correction during restore
    #[serde(default)]
    pub mobile: bool,
}

impl Platform {
    /// Android platform shorthand (always mobile).
    pub fn android(major: u32, minor: u32) -> Self {
        Self {
            family: OsFamily::Android,
            version: OsVersion::new(major, minor),
            mobile: true,
        }
    }

    /// Android 2.3 cannot run a second media pipeline; ad sessions must
    /// refuse to load there. Exact equality on family + major.minor.
    pub fn blocks_instream(&self) -> bool {
        self.family == OsFamily::Android && self.version.major == 2 && self.version.minor == 3
    }

    /// Human-readable platform name for error messages.
    pub fn describe(&self) -> String {
        format!("{:?} {}.{}", self.family, self.version.major, self.version.minor)
    }
}

/// Host configuration consumed by `InstreamSession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Configured ad-playback engine; absent selects the native engine
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default)]
    pub platform: Platform,
    /// Alt-text shown on the ad surface while the first item buffers
    #[serde(default = "default_loading_ad_text")]
    pub loading_ad_text: String,
}

fn default_loading_ad_text() -> String {
    "Loading ad".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            provider: None,
            platform: Platform::default(),
            loading_ad_text: default_loading_ad_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_2_3_blocked() {
        assert!(Platform::android(2, 3).blocks_instream());
    }

    #[test]
    fn test_other_androids_allowed() {
        assert!(!Platform::android(2, 2).blocks_instream());
        assert!(!Platform::android(2, 4).blocks_instream());
        assert!(!Platform::android(4, 3).blocks_instream());
    }

    #[test]
    fn test_non_android_allowed() {
        let ios = Platform {
            family: OsFamily::Ios,
            version: OsVersion::new(2, 3),
            mobile: true,
        };
        assert!(!ios.blocks_instream());
        assert!(!Platform::default().blocks_instream());
    }

    #[test]
    fn test_config_defaults() {
        let config = HostConfig::default();
        assert!(config.provider.is_none());
        assert_eq!(config.loading_ad_text, "Loading ad");
    }

    #[test]
    fn test_config_from_json() {
        let config: HostConfig =
            serde_json::from_str(r#"{"provider": "LegacyPlugin"}"#).unwrap();
        assert_eq!(config.provider, Some(ProviderKind::LegacyPlugin));
        assert_eq!(config.loading_ad_text, "Loading ad");
    }
}
