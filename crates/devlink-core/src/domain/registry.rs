//! The `SystemRegistry`: the ordered view of currently visible systems.
//!
//! The registry is the authoritative collection a discovery session shows to
//! its subscribers.  Two invariants hold at every observation point:
//!
//! 1. Entries are sorted by `display_name` (case-sensitive lexical order).
//! 2. No two entries share a `SystemId`.
//!
//! Both invariants are restored *before* the caller gets the post-mutation
//! event back from [`SystemRegistry::apply`], so a subscriber notified after
//! `apply` never sees a transient inconsistent state.
//!
//! # Ordered insertion (for beginners)
//!
//! The original sample re-sorted the whole list after every add
//! (`Collections.sort` on each callback).  Keeping the list sorted and
//! inserting at the right position is cheaper and gives the same result:
//! `partition_point` performs a binary search (O(log n) comparisons) for the
//! insertion index, and `Vec::insert` shifts the tail (O(n) moves).  A
//! rename is handled as remove + reinsert, which preserves the sort without
//! a global re-sort.
//!
//! # Why a Vec and not a BTreeMap?
//!
//! The sort key (`display_name`) is not unique — two phones can both be
//! called "Pixel" — and the uniqueness key (`id`) is not the sort key.  A
//! `Vec` kept sorted by name with a linear id scan is the simplest structure
//! that satisfies both; visible sets are small (a user's own devices), so
//! the O(n) id scan is not worth an auxiliary index.

use tracing::trace;

use super::events::DiscoveryEvent;
use super::system::{RemoteSystem, SystemId};

/// Sorted, duplicate-free collection of visible remote systems.
#[derive(Debug, Default)]
pub struct SystemRegistry {
    /// Sorted by `display_name`; unique by `id`.
    systems: Vec<RemoteSystem>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one discovery event and returns the event to re-emit to
    /// subscribers, already reflecting any degradation:
    ///
    /// - `Added` for a known id degrades to `Updated`.
    /// - `Updated` for an unknown id degrades to `Added` (a subscription
    ///   can race an in-flight change and see the update first).
    /// - `Removed` for an unknown id is a no-op and returns `None`
    ///   (removal may race a stop/restart; it is never an error).
    pub fn apply(&mut self, event: DiscoveryEvent) -> Option<DiscoveryEvent> {
        match event {
            DiscoveryEvent::Added(system) | DiscoveryEvent::Updated(system) => {
                self.upsert(system)
            }
            DiscoveryEvent::Removed(id) => self.remove(&id).map(DiscoveryEvent::Removed),
        }
    }

    /// Inserts or replaces `system`, keeping the sort invariant, and
    /// returns the `Added` or `Updated` event that describes what happened.
    fn upsert(&mut self, system: RemoteSystem) -> Option<DiscoveryEvent> {
        match self.position(&system.id) {
            Some(index) => {
                if self.systems[index].display_name == system.display_name {
                    // Name unchanged: replace fields in place, order holds.
                    self.systems[index] = system.clone();
                } else {
                    // Rename: remove + reinsert to restore the sort.
                    self.systems.remove(index);
                    self.insert_sorted(system.clone());
                }
                trace!(id = %system.id, name = %system.display_name, "registry updated");
                Some(DiscoveryEvent::Updated(system))
            }
            None => {
                self.insert_sorted(system.clone());
                trace!(id = %system.id, name = %system.display_name, "registry added");
                Some(DiscoveryEvent::Added(system))
            }
        }
    }

    /// Removes the entry with `id`, returning its id if it was present.
    fn remove(&mut self, id: &SystemId) -> Option<SystemId> {
        let index = self.position(id)?;
        let removed = self.systems.remove(index);
        trace!(id = %removed.id, "registry removed");
        Some(removed.id)
    }

    /// Binary search for the insertion index, then shift-insert.
    fn insert_sorted(&mut self, system: RemoteSystem) {
        let index = self
            .systems
            .partition_point(|entry| entry.display_name < system.display_name);
        self.systems.insert(index, system);
    }

    /// Linear scan for an id.  See the module docs for why there is no
    /// auxiliary index.
    fn position(&self, id: &SystemId) -> Option<usize> {
        self.systems.iter().position(|entry| &entry.id == id)
    }

    /// Returns the entry with `id`, if visible.
    pub fn get(&self, id: &SystemId) -> Option<&RemoteSystem> {
        self.position(id).map(|index| &self.systems[index])
    }

    /// Read-only snapshot in display order.  Subscribers get copies, never a
    /// live reference into the registry.
    pub fn snapshot(&self) -> Vec<RemoteSystem> {
        self.systems.clone()
    }

    /// Drops every entry.  Used when a session restarts with a new filter.
    pub fn clear(&mut self) {
        self.systems.clear();
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::system::{DiscoveryType, SystemKind};

    fn desktop(id: &str, name: &str) -> RemoteSystem {
        RemoteSystem::new(id, name, SystemKind::Desktop, DiscoveryType::Cloud)
    }

    fn names(registry: &SystemRegistry) -> Vec<String> {
        registry
            .snapshot()
            .into_iter()
            .map(|s| s.display_name)
            .collect()
    }

    /// Asserts both registry invariants: sorted by name, unique by id.
    fn assert_invariants(registry: &SystemRegistry) {
        let snapshot = registry.snapshot();
        for pair in snapshot.windows(2) {
            assert!(
                pair[0].display_name <= pair[1].display_name,
                "not sorted: {:?} before {:?}",
                pair[0].display_name,
                pair[1].display_name
            );
        }
        let mut ids: Vec<_> = snapshot.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), snapshot.len(), "duplicate ids present");
    }

    #[test]
    fn test_adds_are_kept_in_display_name_order() {
        // Arrange / Act: arrival order inverts name order — Zeta first.
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));
        registry.apply(DiscoveryEvent::Added(desktop("B", "Alpha")));

        // Assert
        assert_eq!(names(&registry), vec!["Alpha", "Zeta"]);
        assert_invariants(&registry);
    }

    #[test]
    fn test_rename_reorders_the_collection() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));
        registry.apply(DiscoveryEvent::Added(desktop("B", "Alpha")));

        // Act: renaming A from "Zeta" to "Omega" must re-place it.
        let emitted = registry.apply(DiscoveryEvent::Updated(desktop("A", "Omega")));

        // Assert
        assert_eq!(names(&registry), vec!["Alpha", "Omega"]);
        assert_eq!(emitted, Some(DiscoveryEvent::Updated(desktop("A", "Omega"))));
        assert_invariants(&registry);
    }

    #[test]
    fn test_added_with_known_id_degrades_to_updated() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));

        // Act: a second Added for the same id must not duplicate the entry.
        let emitted = registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta Prime")));

        // Assert
        assert_eq!(registry.len(), 1);
        assert!(matches!(emitted, Some(DiscoveryEvent::Updated(_))));
        assert_eq!(names(&registry), vec!["Zeta Prime"]);
        assert_invariants(&registry);
    }

    #[test]
    fn test_updated_with_unknown_id_degrades_to_added() {
        let mut registry = SystemRegistry::new();

        let emitted = registry.apply(DiscoveryEvent::Updated(desktop("A", "Zeta")));

        assert!(matches!(emitted, Some(DiscoveryEvent::Added(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_without_rename_keeps_position() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Alpha")));
        registry.apply(DiscoveryEvent::Added(desktop("B", "Beta")));

        // Same name, different kind: in-place replacement.
        let changed = RemoteSystem::new("A", "Alpha", SystemKind::Phone, DiscoveryType::Cloud);
        registry.apply(DiscoveryEvent::Updated(changed.clone()));

        assert_eq!(registry.get(&SystemId::from("A")), Some(&changed));
        assert_eq!(names(&registry), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_removed_deletes_the_entry() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));

        let emitted = registry.apply(DiscoveryEvent::Removed(SystemId::from("A")));

        assert_eq!(emitted, Some(DiscoveryEvent::Removed(SystemId::from("A"))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_removed_for_absent_id_is_a_silent_no_op() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));

        // Act: removal may race a restart; nothing to emit, nothing lost.
        let emitted = registry.apply(DiscoveryEvent::Removed(SystemId::from("ghost")));

        // Assert
        assert_eq!(emitted, None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_display_names_with_distinct_ids_coexist() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Pixel")));
        registry.apply(DiscoveryEvent::Added(desktop("B", "Pixel")));

        assert_eq!(registry.len(), 2);
        assert_invariants(&registry);
    }

    #[test]
    fn test_sorting_is_case_sensitive_lexical() {
        // 'Z' (0x5A) sorts before 'a' (0x61) in case-sensitive order.
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "alpha")));
        registry.apply(DiscoveryEvent::Added(desktop("B", "Zeta")));

        assert_eq!(names(&registry), vec!["Zeta", "alpha"]);
    }

    #[test]
    fn test_invariants_hold_under_an_arbitrary_event_sequence() {
        let mut registry = SystemRegistry::new();
        let events = [
            DiscoveryEvent::Added(desktop("1", "Mira")),
            DiscoveryEvent::Added(desktop("2", "Atlas")),
            DiscoveryEvent::Updated(desktop("1", "Vega")),
            DiscoveryEvent::Added(desktop("3", "Atlas")),
            DiscoveryEvent::Removed(SystemId::from("2")),
            DiscoveryEvent::Updated(desktop("4", "Lyra")),
            DiscoveryEvent::Added(desktop("1", "Mira")),
            DiscoveryEvent::Removed(SystemId::from("nope")),
        ];

        // Invariants must hold at *every* observation point, not just at the end.
        for event in events {
            registry.apply(event);
            assert_invariants(&registry);
        }
        assert_eq!(names(&registry), vec!["Atlas", "Lyra", "Mira"]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get(&SystemId::from("A")).is_none());
    }

    #[test]
    fn test_snapshot_is_a_copy_not_a_live_view() {
        let mut registry = SystemRegistry::new();
        registry.apply(DiscoveryEvent::Added(desktop("A", "Zeta")));

        let snapshot = registry.snapshot();
        registry.apply(DiscoveryEvent::Removed(SystemId::from("A")));

        // The earlier snapshot is unaffected by later mutation.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }
}
