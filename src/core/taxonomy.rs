use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Known group and subgroup names for the current run.
///
/// The output tree is the only persistent form of this data: groups are the
/// top-level directories, subgroups every second-level directory. Subgroups
/// share one flat namespace across all groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxonomyStore {
    groups: Vec<String>,
    subgroups: Vec<String>,
}

impl TaxonomyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from an existing output tree.
    ///
    /// A missing root yields an empty store. Entries are visited in name order
    /// so the resulting prompt is stable between runs.
    pub async fn initialize(output_root: &Path) -> Result<Self> {
        let mut store = Self::new();

        if !tokio::fs::try_exists(output_root).await.unwrap_or(false) {
            debug!(
                "Output root {} does not exist, starting with an empty taxonomy",
                output_root.display()
            );
            return Ok(store);
        }

        for group_dir in list_subdirectories(output_root).await? {
            if let Some(group) = dir_name(&group_dir) {
                store.insert_group(group);
            }

            for subgroup_dir in list_subdirectories(&group_dir).await? {
                if let Some(subgroup) = dir_name(&subgroup_dir) {
                    store.insert_subgroup(subgroup);
                }
            }
        }

        debug!(
            "Taxonomy seeded with {} groups and {} subgroups",
            store.groups.len(),
            store.subgroups.len()
        );

        Ok(store)
    }

    /// Record a group/subgroup pair. Idempotent.
    pub fn register(&mut self, group: &str, subgroup: &str) {
        self.insert_group(group.to_string());
        self.insert_subgroup(subgroup.to_string());
    }

    /// Current groups and subgroups in insertion order.
    pub fn snapshot(&self) -> (Vec<String>, Vec<String>) {
        (self.groups.clone(), self.subgroups.clone())
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn subgroups(&self) -> &[String] {
        &self.subgroups
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub fn contains_subgroup(&self, subgroup: &str) -> bool {
        self.subgroups.iter().any(|s| s == subgroup)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.subgroups.is_empty()
    }

    fn insert_group(&mut self, group: String) {
        if !self.contains_group(&group) {
            self.groups.push(group);
        }
    }

    fn insert_subgroup(&mut self, subgroup: String) {
        if !self.contains_subgroup(&subgroup) {
            self.subgroups.push(subgroup);
        }
    }
}

async fn list_subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Names that are not valid UTF-8 cannot be proposed back by the model, so they are skipped
fn dir_name(path: &Path) -> Option<String> {
    let name = path.file_name()?;
    match name.to_str() {
        Some(name) => Some(name.to_string()),
        None => {
            warn!("Ignoring non UTF-8 directory {}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_register_is_idempotent() {
        let mut store = TaxonomyStore::new();
        store.register("Finances", "Factures");
        let after_first = store.clone();

        store.register("Finances", "Factures");
        assert_eq!(store, after_first);
        assert_eq!(store.groups(), ["Finances"]);
        assert_eq!(store.subgroups(), ["Factures"]);
    }

    #[test]
    fn test_subgroups_are_flat() {
        let mut store = TaxonomyStore::new();
        store.register("Finances", "Divers");
        store.register("Santé", "Divers");

        let (groups, subgroups) = store.snapshot();
        assert_eq!(groups, vec!["Finances", "Santé"]);
        assert_eq!(subgroups, vec!["Divers"]);
    }

    #[test]
    fn test_register_keeps_near_duplicates_verbatim() {
        let mut store = TaxonomyStore::new();
        store.register("Finances", "Factures");
        store.register("finances ", "Factures");

        assert_eq!(store.groups().len(), 2);
        assert!(store.contains_group("finances "));
    }

    #[tokio::test]
    async fn test_initialize_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let store = TaxonomyStore::initialize(&dir.path().join("missing"))
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_reads_two_levels_and_ignores_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("Finances/Factures")).unwrap();
        std::fs::create_dir_all(root.join("Finances/Impots")).unwrap();
        std::fs::create_dir_all(root.join("Santé/Factures")).unwrap();
        std::fs::create_dir_all(root.join("Santé/Ordonnances/2023")).unwrap();
        std::fs::write(root.join("notes.txt"), "stray file").unwrap();
        std::fs::write(root.join("Finances/loose.pdf"), "stray file").unwrap();

        let store = TaxonomyStore::initialize(root).await.unwrap();

        assert_eq!(store.groups(), ["Finances", "Santé"]);
        assert_eq!(store.subgroups(), ["Factures", "Impots", "Ordonnances"]);
        assert!(!store.contains_subgroup("2023"));
        assert!(!store.contains_group("notes.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_initialize_skips_non_utf8_directories() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Finances/Factures")).unwrap();
        std::fs::create_dir(root.join(std::ffi::OsStr::from_bytes(b"Re\xe7us"))).unwrap();
        std::fs::create_dir(
            root.join("Finances")
                .join(std::ffi::OsStr::from_bytes(b"Imp\xf4ts")),
        )
        .unwrap();

        let store = TaxonomyStore::initialize(root).await.unwrap();

        assert_eq!(store.groups(), ["Finances"]);
        assert_eq!(store.subgroups(), ["Factures"]);
    }
}
