//! The `RemoteSystem` entity: identity, display name, and classifications.
//!
//! A remote system is a discoverable device belonging to the same user —
//! a desktop, a phone, a console — that can be asked to open a URI.  The
//! discovery transport assigns each system a stable, unique string id; the
//! id never changes for the lifetime of the system, while the display name
//! may be renamed by its owner at any time and is therefore the one mutable
//! field (changed in place by an `Updated` event keyed on the id).
//!
//! # Strict enum parsing
//!
//! `SystemKind` and [`DiscoveryType`] implement `FromStr` strictly: an
//! unrecognized string is a [`ParseEnumError`], never a silent fallback to
//! a catch-all variant.  Callers that accept textual filter input (config
//! files, CLI flags) surface the parse failure instead of discovering
//! everything by accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a textual kind or discovery-type name is not
/// recognized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The string does not name a [`SystemKind`].
    #[error("unknown system kind: {0:?}")]
    UnknownSystemKind(String),
    /// The string does not name a [`DiscoveryType`].
    #[error("unknown discovery type: {0:?}")]
    UnknownDiscoveryType(String),
}

// ── Identity ──────────────────────────────────────────────────────────────────

/// Stable, unique identity of a remote system, assigned by the discovery
/// transport.
///
/// Opaque to this crate: ids are compared, hashed, and printed, never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(String);

impl SystemId {
    /// Wraps a raw transport-assigned id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SystemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SystemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ── Classifications ───────────────────────────────────────────────────────────

/// Device category of a remote system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    /// The transport could not classify the device.
    Unknown,
    /// Desktop or laptop computer.
    Desktop,
    /// Head-mounted holographic device.
    Holographic,
    /// Phone or small-screen handheld.
    Phone,
    /// Xbox console.
    Xbox,
}

impl SystemKind {
    /// All kinds, in declaration order.  Used when a caller wants an
    /// explicit "every kind" filter set.
    pub const ALL: [SystemKind; 5] = [
        SystemKind::Unknown,
        SystemKind::Desktop,
        SystemKind::Holographic,
        SystemKind::Phone,
        SystemKind::Xbox,
    ];
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemKind::Unknown => "Unknown",
            SystemKind::Desktop => "Desktop",
            SystemKind::Holographic => "Holographic",
            SystemKind::Phone => "Phone",
            SystemKind::Xbox => "Xbox",
        };
        f.write_str(name)
    }
}

impl FromStr for SystemKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unknown" => Ok(SystemKind::Unknown),
            "Desktop" => Ok(SystemKind::Desktop),
            "Holographic" => Ok(SystemKind::Holographic),
            "Phone" => Ok(SystemKind::Phone),
            "Xbox" => Ok(SystemKind::Xbox),
            other => Err(ParseEnumError::UnknownSystemKind(other.to_string())),
        }
    }
}

/// Transport class a remote system was found through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiscoveryType {
    /// The system registered itself with the cloud registry.
    Cloud,
    /// The system answered a proximal (local radio / LAN) broadcast.
    Proximal,
}

impl fmt::Display for DiscoveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiscoveryType::Cloud => "Cloud",
            DiscoveryType::Proximal => "Proximal",
        };
        f.write_str(name)
    }
}

impl FromStr for DiscoveryType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cloud" => Ok(DiscoveryType::Cloud),
            "Proximal" => Ok(DiscoveryType::Proximal),
            other => Err(ParseEnumError::UnknownDiscoveryType(other.to_string())),
        }
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// A discoverable remote system.
///
/// Plain immutable value object passed by reference (or cheap clone) within
/// the process; there is no cross-activity serialization dance here.  Only
/// `display_name` is ever replaced after first observation, and only through
/// the registry's handling of an `Updated` event with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSystem {
    /// Stable transport-assigned identity.
    pub id: SystemId,
    /// Human-readable name shown to the user.  May change across updates.
    pub display_name: String,
    /// Device category.
    pub kind: SystemKind,
    /// How this system was discovered.
    pub discovery_type: DiscoveryType,
}

impl RemoteSystem {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<SystemId>,
        display_name: impl Into<String>,
        kind: SystemKind,
        discovery_type: DiscoveryType,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            discovery_type,
        }
    }
}

impl fmt::Display for RemoteSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, id={})",
            self.display_name, self.kind, self.discovery_type, self.id
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_kind_parses_all_known_names() {
        for kind in SystemKind::ALL {
            let parsed: SystemKind = kind.to_string().parse().expect("round trip");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_system_kind_rejects_unknown_name() {
        // Arrange: the original sample app silently mapped this to UNKNOWN.
        let result: Result<SystemKind, _> = "Toaster".parse();

        // Assert: strict parsing surfaces the bad input instead.
        assert_eq!(
            result,
            Err(ParseEnumError::UnknownSystemKind("Toaster".to_string()))
        );
    }

    #[test]
    fn test_system_kind_parsing_is_case_sensitive() {
        let result: Result<SystemKind, _> = "desktop".parse();
        assert!(result.is_err(), "lowercase must not match");
    }

    #[test]
    fn test_discovery_type_parses_known_names() {
        assert_eq!("Cloud".parse::<DiscoveryType>(), Ok(DiscoveryType::Cloud));
        assert_eq!(
            "Proximal".parse::<DiscoveryType>(),
            Ok(DiscoveryType::Proximal)
        );
    }

    #[test]
    fn test_discovery_type_rejects_all_keyword() {
        // "All" is a filter-level concept (absent set), not a discovery type.
        let result: Result<DiscoveryType, _> = "All".parse();
        assert_eq!(
            result,
            Err(ParseEnumError::UnknownDiscoveryType("All".to_string()))
        );
    }

    #[test]
    fn test_system_id_is_transparent_over_the_raw_string() {
        let id = SystemId::new("sys-42");
        assert_eq!(id.as_str(), "sys-42");
        assert_eq!(id.to_string(), "sys-42");
        assert_eq!(SystemId::from("sys-42"), id);
    }

    #[test]
    fn test_remote_system_display_includes_name_and_id() {
        let system = RemoteSystem::new("A", "Zeta", SystemKind::Desktop, DiscoveryType::Cloud);
        let rendered = system.to_string();
        assert!(rendered.contains("Zeta"));
        assert!(rendered.contains("id=A"));
    }

    #[test]
    fn test_remote_system_serde_round_trip() {
        let system = RemoteSystem::new("B", "Alpha", SystemKind::Phone, DiscoveryType::Proximal);
        let toml_str = toml::to_string(&system).expect("serialize");
        let restored: RemoteSystem = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(restored, system);
    }
}
