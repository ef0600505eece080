// ── Ordered reactive site store ──
//
// Owns every Site record exclusively; consumers read Arc snapshots and
// subscribe to change notifications via `watch` channels. Insertion order
// is display order, so the backing storage is a Vec, not a map.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Site, SiteId};

/// Immutable view of the store's contents at one point in time.
pub type SiteSnapshot = Arc<Vec<Arc<Site>>>;

/// Ordered collection of configured sites.
///
/// Enforces selection exclusivity store-wide: at most one record is the
/// browse target and at most one the upload target. Every mutation
/// rebuilds the snapshot before releasing the write lock and swaps it in
/// atomically, so no reader ever observes two records flagged for the
/// same role.
pub struct SiteStore {
    sites: RwLock<Vec<Site>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation. This is the UI refresh
    /// boundary: subscribers learn "data changed", nothing more.
    snapshot: watch::Sender<SiteSnapshot>,
}

impl SiteStore {
    pub fn new() -> Self {
        Self::from_sites(Vec::new())
    }

    /// Build a store from persisted records.
    ///
    /// Persisted data may predate store-wide invariant enforcement, so
    /// duplicate selection flags are sanitized here: the first record
    /// claiming a role keeps it, later claims are cleared.
    pub fn from_sites(mut sites: Vec<Site>) -> Self {
        sanitize_selection(&mut sites, SelectionRole::Browse);
        sanitize_selection(&mut sites, SelectionRole::Upload);

        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(build_snapshot(&sites));

        Self {
            sites: RwLock::new(sites),
            version,
            snapshot,
        }
    }

    // ── Read access ──────────────────────────────────────────────────

    /// Current snapshot (cheap `Arc` clone).
    pub fn sites(&self) -> SiteSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn get(&self, id: SiteId) -> Option<Arc<Site>> {
        self.sites().iter().find(|s| s.id() == id).cloned()
    }

    pub fn selected_for_upload(&self) -> Option<Arc<Site>> {
        self.sites().iter().find(|s| s.selected_for_upload()).cloned()
    }

    pub fn selected_for_browse(&self) -> Option<Arc<Site>> {
        self.sites().iter().find(|s| s.selected_for_browse()).cloned()
    }

    pub fn len(&self) -> usize {
        self.sites().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites().is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to snapshot changes. The receiver's `borrow()` is the
    /// reloadable-view hook: observe, re-render, done.
    pub fn subscribe(&self) -> watch::Receiver<SiteSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Append a site, preserving insertion order. Returns its id.
    ///
    /// If the incoming record claims a selection role already held by an
    /// existing record, the incoming claim is cleared.
    pub fn add(&self, site: Site) -> SiteId {
        let id = site.id();
        let mut sites = self.write();
        sites.push(site);
        sanitize_selection(&mut sites, SelectionRole::Browse);
        sanitize_selection(&mut sites, SelectionRole::Upload);
        self.publish(&sites);
        id
    }

    /// Remove a site. If it held a selection flag, no other record is
    /// auto-promoted — zero selected records is a valid state.
    pub fn remove(&self, id: SiteId) -> Option<Site> {
        let mut sites = self.write();
        let pos = sites.iter().position(|s| s.id() == id)?;
        let removed = sites.remove(pos);
        self.publish(&sites);
        debug!(site = %id, "removed site");
        Some(removed)
    }

    /// Make the identified site the upload target, clearing the flag on
    /// every other record in the same atomic snapshot swap.
    pub fn select_for_upload(&self, id: SiteId) -> Result<(), CoreError> {
        self.select(id, SelectionRole::Upload)
    }

    /// Make the identified site the browse target.
    pub fn select_for_browse(&self, id: SiteId) -> Result<(), CoreError> {
        self.select(id, SelectionRole::Browse)
    }

    /// Edit the identified site's fields through its explicit setters.
    ///
    /// Selection flags are not reachable from the closure — their setters
    /// are crate-internal, so exclusivity cannot be broken here.
    pub fn modify(&self, id: SiteId, f: impl FnOnce(&mut Site)) -> Result<(), CoreError> {
        let mut sites = self.write();
        let site = sites
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| CoreError::SiteNotFound {
                identifier: id.to_string(),
            })?;
        f(site);
        self.publish(&sites);
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn select(&self, id: SiteId, role: SelectionRole) -> Result<(), CoreError> {
        let mut sites = self.write();
        if !sites.iter().any(|s| s.id() == id) {
            return Err(CoreError::SiteNotFound {
                identifier: id.to_string(),
            });
        }
        for site in &mut *sites {
            let selected = site.id() == id;
            match role {
                SelectionRole::Browse => site.set_selected_for_browse(selected),
                SelectionRole::Upload => site.set_selected_for_upload(selected),
            }
        }
        self.publish(&sites);
        debug!(site = %id, ?role, "selection changed");
        Ok(())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Site>> {
        self.sites.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a fresh snapshot and bump the version. Called while the
    /// write lock is still held, so readers jump from one consistent
    /// state to the next.
    fn publish(&self, sites: &[Site]) {
        let snap = build_snapshot(sites);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|s| *s = snap);
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for SiteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum SelectionRole {
    Browse,
    Upload,
}

fn build_snapshot(sites: &[Site]) -> SiteSnapshot {
    Arc::new(sites.iter().cloned().map(Arc::new).collect())
}

/// First record claiming the role keeps it; later claims are cleared.
fn sanitize_selection(sites: &mut [Site], role: SelectionRole) {
    let mut seen = false;
    for site in &mut *sites {
        let flagged = match role {
            SelectionRole::Browse => site.selected_for_browse(),
            SelectionRole::Upload => site.selected_for_upload(),
        };
        if flagged {
            if seen {
                match role {
                    SelectionRole::Browse => site.set_selected_for_browse(false),
                    SelectionRole::Upload => site.set_selected_for_upload(false),
                }
            }
            seen = true;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    fn site(name: &str) -> Site {
        Site::new(
            format!("http://{name}.example.com"),
            "website",
            format!("/{name}/"),
            "admin",
            SecretString::from("b".to_owned()),
        )
    }

    fn upload_count(store: &SiteStore) -> usize {
        store
            .sites()
            .iter()
            .filter(|s| s.selected_for_upload())
            .count()
    }

    #[test]
    fn add_preserves_insertion_order() {
        let store = SiteStore::new();
        store.add(site("alpha"));
        store.add(site("beta"));
        store.add(site("gamma"));

        let names: Vec<String> = store
            .sites()
            .iter()
            .map(|s| s.site_url().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "http://alpha.example.com",
                "http://beta.example.com",
                "http://gamma.example.com"
            ]
        );
    }

    #[test]
    fn select_for_upload_is_exclusive() {
        let store = SiteStore::new();
        let a = store.add(site("a"));
        let b = store.add(site("b"));

        store.select_for_upload(a).unwrap();
        assert!(store.get(a).unwrap().selected_for_upload());

        store.select_for_upload(b).unwrap();
        assert!(!store.get(a).unwrap().selected_for_upload());
        assert!(store.get(b).unwrap().selected_for_upload());
        assert_eq!(upload_count(&store), 1);
    }

    #[test]
    fn repeated_selects_keep_exactly_one_flagged() {
        let store = SiteStore::new();
        let ids: Vec<SiteId> = (0..4).map(|i| store.add(site(&format!("s{i}")))).collect();

        for &id in &[ids[2], ids[0], ids[3], ids[0], ids[1]] {
            store.select_for_upload(id).unwrap();
            assert_eq!(upload_count(&store), 1);
        }
        assert!(store.get(ids[1]).unwrap().selected_for_upload());
    }

    #[test]
    fn browse_and_upload_roles_are_independent() {
        let store = SiteStore::new();
        let a = store.add(site("a"));
        let b = store.add(site("b"));

        store.select_for_browse(a).unwrap();
        store.select_for_upload(b).unwrap();

        assert!(store.get(a).unwrap().selected_for_browse());
        assert!(!store.get(a).unwrap().selected_for_upload());
        assert!(store.get(b).unwrap().selected_for_upload());
        assert!(!store.get(b).unwrap().selected_for_browse());
    }

    #[test]
    fn remove_selected_site_leaves_zero_selected() {
        let store = SiteStore::new();
        let a = store.add(site("a"));
        store.add(site("b"));
        store.select_for_upload(a).unwrap();

        let removed = store.remove(a).unwrap();
        assert!(removed.selected_for_upload());
        assert_eq!(upload_count(&store), 0);
        assert!(store.selected_for_upload().is_none());
    }

    #[test]
    fn select_unknown_site_fails() {
        let store = SiteStore::new();
        store.add(site("a"));
        let err = store.select_for_upload(SiteId::new()).unwrap_err();
        assert!(matches!(err, CoreError::SiteNotFound { .. }));
    }

    #[test]
    fn from_sites_sanitizes_duplicate_flags() {
        let sites = vec![
            site("a").with_selection(true, true),
            site("b").with_selection(true, true),
        ];
        let store = SiteStore::from_sites(sites);

        assert_eq!(upload_count(&store), 1);
        let snap = store.sites();
        assert!(snap[0].selected_for_browse());
        assert!(!snap[1].selected_for_browse());
    }

    #[test]
    fn modify_edits_fields_and_bumps_version() {
        let store = SiteStore::new();
        let a = store.add(site("a"));
        let before = store.version();

        store.modify(a, |s| s.set_username("editor")).unwrap();

        assert_eq!(store.get(a).unwrap().username(), "editor");
        assert!(store.version() > before);
    }

    #[test]
    fn subscribers_see_mutations() {
        let store = SiteStore::new();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.add(site("a"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn snapshot_readers_never_see_two_upload_targets() {
        let store = SiteStore::new();
        let a = store.add(site("a"));
        let b = store.add(site("b"));
        store.select_for_upload(a).unwrap();

        // Hold a pre-select snapshot, then re-select; both the old and
        // the new snapshot must each have at most one flagged record.
        let old = store.sites();
        store.select_for_upload(b).unwrap();
        let new = store.sites();

        for snap in [old, new] {
            let count = snap.iter().filter(|s| s.selected_for_upload()).count();
            assert_eq!(count, 1);
        }
    }
}
