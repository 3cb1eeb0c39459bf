//! The `DiscoveryFilter` value object.
//!
//! A discovery session is started with a filter that decides which remote
//! systems become visible.  The filter is a conjunction of two optional
//! sets: a system is visible iff its discovery type is in
//! `discovery_types` AND its kind is in `system_kinds`.
//!
//! # Absent vs. empty (for beginners)
//!
//! The two degenerate set states mean opposite things:
//!
//! - **Absent** (`None`) – the clause is not constrained: *match any*.
//!   This is the explicit replacement for the original UI's "All" spinner
//!   entry.
//! - **Empty** (`Some({})`) – the clause excludes everything: *match none*.
//!   A session started with an empty set legitimately sees no systems.
//!
//! There is no implicit default-to-ALL fallback anywhere: a caller either
//! constructs `DiscoveryFilter::any()` on purpose or names the sets it
//! wants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::system::{DiscoveryType, RemoteSystem, SystemKind};

/// Conjunction filter over discovery type and system kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryFilter {
    /// Transport classes to match.  `None` matches any transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery_types: Option<BTreeSet<DiscoveryType>>,
    /// Device kinds to match.  `None` matches any kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_kinds: Option<BTreeSet<SystemKind>>,
}

impl DiscoveryFilter {
    /// A filter with both clauses unconstrained: every system matches.
    pub fn any() -> Self {
        Self::default()
    }

    /// Constrains the discovery-type clause to the given set.
    ///
    /// An empty iterator yields an empty set, which matches no system.
    pub fn with_discovery_types(mut self, types: impl IntoIterator<Item = DiscoveryType>) -> Self {
        self.discovery_types = Some(types.into_iter().collect());
        self
    }

    /// Constrains the system-kind clause to the given set.
    ///
    /// An empty iterator yields an empty set, which matches no system.
    pub fn with_system_kinds(mut self, kinds: impl IntoIterator<Item = SystemKind>) -> Self {
        self.system_kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Returns `true` iff `system` satisfies both clauses.
    pub fn matches(&self, system: &RemoteSystem) -> bool {
        let type_ok = self
            .discovery_types
            .as_ref()
            .map_or(true, |set| set.contains(&system.discovery_type));
        let kind_ok = self
            .system_kinds
            .as_ref()
            .map_or(true, |set| set.contains(&system.kind));
        type_ok && kind_ok
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> RemoteSystem {
        RemoteSystem::new("p1", "Pocket", SystemKind::Phone, DiscoveryType::Cloud)
    }

    #[test]
    fn test_any_filter_matches_everything() {
        let filter = DiscoveryFilter::any();
        assert!(filter.matches(&phone()));
        assert!(filter.matches(&RemoteSystem::new(
            "x1",
            "Lounge",
            SystemKind::Xbox,
            DiscoveryType::Proximal,
        )));
    }

    #[test]
    fn test_phone_visible_under_phone_and_desktop_kinds() {
        let filter =
            DiscoveryFilter::any().with_system_kinds([SystemKind::Phone, SystemKind::Desktop]);
        assert!(filter.matches(&phone()));
    }

    #[test]
    fn test_phone_invisible_under_xbox_kind() {
        let filter = DiscoveryFilter::any().with_system_kinds([SystemKind::Xbox]);
        assert!(!filter.matches(&phone()));
    }

    #[test]
    fn test_empty_kind_set_matches_none() {
        // Arrange: Some(empty) is "exclude all", not "all".
        let filter = DiscoveryFilter::any().with_system_kinds([]);

        // Assert
        assert!(!filter.matches(&phone()));
    }

    #[test]
    fn test_filter_is_a_conjunction_of_both_clauses() {
        // Kind matches but discovery type does not.
        let filter = DiscoveryFilter::any()
            .with_discovery_types([DiscoveryType::Proximal])
            .with_system_kinds([SystemKind::Phone]);
        assert!(!filter.matches(&phone()));

        // Both clauses match.
        let filter = DiscoveryFilter::any()
            .with_discovery_types([DiscoveryType::Cloud])
            .with_system_kinds([SystemKind::Phone]);
        assert!(filter.matches(&phone()));
    }

    #[test]
    fn test_filter_serde_omits_absent_clauses() {
        let toml_str = toml::to_string(&DiscoveryFilter::any()).expect("serialize");
        assert!(toml_str.is_empty(), "any() must serialize to nothing");

        let constrained = DiscoveryFilter::any().with_discovery_types([DiscoveryType::Cloud]);
        let toml_str = toml::to_string(&constrained).expect("serialize");
        let restored: DiscoveryFilter = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(restored, constrained);
    }
}
