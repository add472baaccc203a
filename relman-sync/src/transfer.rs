//! Replay a stored snapshot onto a cluster: pipeline, conflict check and
//! bounded deploy.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use relman_core::config::{Config, DEFAULT_IMPORT_THREADS, MANAGER_STORAGE_PATH_VALUE};
use relman_core::{codec, InstallError, ManagerInfo, Release, ReleaseSource, Values};
use relman_store::{Backend, SnapshotStore, StateStore, STATE_KEY};

use crate::error::{join_err, SyncError};

/// Knobs for a replay run, resolved from configuration once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Keep only releases from this namespace. Wins over `exclude_namespaces`.
    pub namespace: Option<String>,
    pub exclude_namespaces: Vec<String>,
    /// Dotted value paths to overwrite in each release.
    pub values: BTreeMap<String, String>,
    pub target_namespace: Option<String>,
    pub new_storage_path: Option<String>,
    pub force: bool,
    pub threads: usize,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            exclude_namespaces: Vec::new(),
            values: BTreeMap::new(),
            target_namespace: None,
            new_storage_path: None,
            force: false,
            threads: DEFAULT_IMPORT_THREADS,
            dry_run: false,
            verbose: false,
        }
    }
}

impl TransferOptions {
    /// Full import: filters, overrides and remap from the `import` section.
    pub fn import(config: &Config) -> Self {
        let import = &config.import;
        Self {
            namespace: import.namespace().map(str::to_string),
            exclude_namespaces: import.exclude_namespaces.clone(),
            values: import.values.clone(),
            target_namespace: import.target_namespace().map(str::to_string),
            ..Self::transfer(config)
        }
    }

    /// Plain transfer: every stored release, untouched.
    pub fn transfer(config: &Config) -> Self {
        Self {
            new_storage_path: config.import.new_storage_path().map(str::to_string),
            force: config.import.force,
            threads: config.import.threads.max(1),
            dry_run: config.dry_run,
            verbose: config.verbose,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Namespace filter: include wins over exclude; with neither, pass through.
pub fn filter_releases(
    releases: Vec<Release>,
    namespace: Option<&str>,
    exclude: &[String],
) -> Vec<Release> {
    if let Some(ns) = namespace {
        return releases.into_iter().filter(|r| r.namespace == ns).collect();
    }
    if !exclude.is_empty() {
        return releases
            .into_iter()
            .filter(|r| !exclude.iter().any(|ns| *ns == r.namespace))
            .collect();
    }
    releases
}

/// Set a dotted path in a value tree to a string.
///
/// The leading segment must already exist; otherwise the tree is left as is
/// and `false` is returned. Missing maps below it are created. A scalar in
/// the middle of the path also leaves the tree unchanged.
pub fn set_value(values: &mut Values, path: &str, value: &str) -> bool {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();

    let Some(mut slot) = values.get_mut(head) else {
        tracing::warn!(
            path = %path,
            "value doesn't exist in the stored release, refusing to update it"
        );
        return false;
    };

    for segment in rest {
        let map = match slot {
            Value::Object(map) => map,
            _ => {
                tracing::warn!(
                    path = %path,
                    segment = %segment,
                    "value path crosses a non-map value, refusing to update it"
                );
                return false;
            }
        };
        slot = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    *slot = Value::String(value.to_string());
    true
}

/// Apply every configured override to one release.
pub fn apply_overrides(release: &mut Release, values: &BTreeMap<String, String>) {
    for (path, value) in values {
        if set_value(&mut release.config, path, value) {
            tracing::debug!(release = %release.name, path = %path, "value overridden");
        }
    }
}

/// Run filter, overrides and namespace remap in order.
pub fn process(releases: Vec<Release>, options: &TransferOptions) -> Vec<Release> {
    let mut releases = filter_releases(
        releases,
        options.namespace.as_deref(),
        &options.exclude_namespaces,
    );
    for release in &mut releases {
        apply_overrides(release, &options.values);
        if let Some(target) = options.target_namespace.as_deref() {
            release.namespace = target.to_string();
        }
    }
    releases
}

// ---------------------------------------------------------------------------
// Conflict check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// No descriptor, no override.
    Clear,
    /// Override given but nothing to relocate.
    PathOverrideWithoutState,
    /// Descriptor present and a new path given.
    Relocating,
    /// Descriptor present, no new path, forced through.
    Forced,
    /// Descriptor present, no new path, dry-run: warn and go on.
    DryRunWarning,
}

/// Decide whether a replay may go ahead.
///
/// `location` names the storage root for the error message.
pub fn check_conflict(
    descriptor_exists: bool,
    path_override: bool,
    force: bool,
    dry_run: bool,
    location: &str,
) -> Result<ConflictOutcome, SyncError> {
    match (descriptor_exists, path_override) {
        (false, false) => Ok(ConflictOutcome::Clear),
        (false, true) => {
            tracing::warn!("new storage path specified but no remote state found");
            Ok(ConflictOutcome::PathOverrideWithoutState)
        }
        (true, true) => Ok(ConflictOutcome::Relocating),
        (true, false) if force => {
            tracing::warn!(
                location = %location,
                "existing state found but no new storage path specified; --force given, proceeding"
            );
            Ok(ConflictOutcome::Forced)
        }
        (true, false) if dry_run => {
            tracing::warn!(
                location = %location,
                "existing state found but no new storage path specified; dry run, proceeding"
            );
            Ok(ConflictOutcome::DryRunWarning)
        }
        (true, false) => Err(SyncError::StateConflict {
            key: STATE_KEY.to_string(),
            location: location.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Deploy
// ---------------------------------------------------------------------------

/// Per-release outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployResult {
    Installed { name: String, namespace: String },
    /// The target already has a release with this name; skipped.
    AlreadyExists { name: String, namespace: String },
    Failed {
        name: String,
        namespace: String,
        error: String,
    },
    WouldInstall {
        name: String,
        namespace: String,
        rendered: String,
    },
}

impl DeployResult {
    pub fn name(&self) -> &str {
        match self {
            DeployResult::Installed { name, .. }
            | DeployResult::AlreadyExists { name, .. }
            | DeployResult::Failed { name, .. }
            | DeployResult::WouldInstall { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferReport {
    pub conflict: ConflictOutcome,
    /// In the order releases were dispatched.
    pub results: Vec<DeployResult>,
}

impl TransferReport {
    pub fn installed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, DeployResult::Installed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, DeployResult::Failed { .. }))
            .count()
    }
}

/// Replays the snapshot at one storage root onto a release source.
pub struct Replayer {
    source: Arc<dyn ReleaseSource>,
    store: SnapshotStore,
    state: StateStore,
    options: TransferOptions,
}

impl Replayer {
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        backend: Arc<dyn Backend>,
        options: TransferOptions,
    ) -> Self {
        Self {
            source,
            store: SnapshotStore::new(backend.clone()),
            state: StateStore::new(backend),
            options,
        }
    }

    /// Read, transform, check, deploy.
    ///
    /// A blocking conflict, or a relocation whose descriptor cannot be
    /// decoded, returns before any install call is made.
    pub async fn run(&self) -> Result<TransferReport, SyncError> {
        let stored = self.store.read_all().await?;
        let releases = process(stored, &self.options);

        let descriptor = {
            let state = self.state.clone();
            tokio::task::spawn_blocking(move || read_descriptor(&state))
                .await
                .map_err(join_err)??
        };
        let conflict = check_conflict(
            !matches!(descriptor, Descriptor::Missing),
            self.options.new_storage_path.is_some(),
            self.options.force,
            self.options.dry_run,
            &self.store.location(),
        )?;

        let info = match descriptor {
            Descriptor::Found(info) => Some(info),
            Descriptor::Unreadable(reason) if self.options.new_storage_path.is_some() => {
                return Err(SyncError::DescriptorUnreadable {
                    key: STATE_KEY.to_string(),
                    location: self.store.location(),
                    reason,
                });
            }
            Descriptor::Unreadable(_) | Descriptor::Missing => None,
        };
        let releases = self.relocate_manager(releases, info.as_ref());
        let results = if self.options.dry_run {
            releases
                .iter()
                .map(|r| DeployResult::WouldInstall {
                    name: r.name.clone(),
                    namespace: r.namespace.clone(),
                    rendered: codec::render(r, self.options.verbose),
                })
                .collect()
        } else {
            self.deploy(releases).await
        };

        Ok(TransferReport { conflict, results })
    }

    /// Point the manager's own release at the new storage path.
    fn relocate_manager(
        &self,
        mut releases: Vec<Release>,
        info: Option<&ManagerInfo>,
    ) -> Vec<Release> {
        let (Some(path), Some(info)) = (self.options.new_storage_path.as_deref(), info) else {
            return releases;
        };
        for release in releases
            .iter_mut()
            .filter(|r| r.name == info.release_name)
        {
            if set_value(&mut release.config, MANAGER_STORAGE_PATH_VALUE, path) {
                tracing::info!(release = %release.name, path = %path, "manager storage path updated");
            } else {
                tracing::error!(
                    release = %release.name,
                    "unable to update the storage path for the manager release"
                );
            }
        }
        releases
    }

    /// Bounded fan-out: dispatch blocks until a worker slot frees.
    async fn deploy(&self, releases: Vec<Release>) -> Vec<DeployResult> {
        let slots = Arc::new(Semaphore::new(self.options.threads.max(1)));
        let mut tasks = JoinSet::new();
        let total = releases.len();

        for (index, release) in releases.into_iter().enumerate() {
            tracing::info!(
                release = %release.name,
                namespace = %release.namespace,
                "deploying release"
            );
            let permit = match slots.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    tracing::error!(error = %err, "deploy slot pool closed");
                    break;
                }
            };
            let source = self.source.clone();
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, install_one(source.as_ref(), release))
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => tracing::error!(error = %err, "deploy task failed"),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

/// What the replay found at the descriptor key.
enum Descriptor {
    Missing,
    Found(ManagerInfo),
    /// Present but not decodable; still counts as existing.
    Unreadable(String),
}

fn read_descriptor(state: &StateStore) -> Result<Descriptor, SyncError> {
    if !state.exists()? {
        return Ok(Descriptor::Missing);
    }
    match state.read() {
        Ok(Some(info)) => Ok(Descriptor::Found(info)),
        Ok(None) => Ok(Descriptor::Missing),
        Err(err) => {
            tracing::warn!(error = %err, "unreadable manager state descriptor");
            Ok(Descriptor::Unreadable(err.to_string()))
        }
    }
}

fn install_one(source: &dyn ReleaseSource, release: Release) -> DeployResult {
    let name = release.name.clone();
    let namespace = release.namespace.clone();
    match source.install(&release) {
        Ok(()) => {
            tracing::info!(release = %name, "successfully deployed release");
            DeployResult::Installed { name, namespace }
        }
        Err(InstallError::NameInUse { .. }) => {
            tracing::info!(release = %name, "skipping release: already exists");
            DeployResult::AlreadyExists { name, namespace }
        }
        Err(err) => {
            tracing::error!(release = %name, error = %err, "error deploying release");
            DeployResult::Failed {
                name,
                namespace,
                error: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use relman_core::MemorySource;
    use relman_store::MemoryBackend;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn release_in(name: &str, namespace: &str) -> Release {
        Release::new(name, namespace, 1)
    }

    fn values(v: serde_json::Value) -> Values {
        v.as_object().cloned().unwrap()
    }

    // -- pipeline ----------------------------------------------------------

    #[test]
    fn include_wins_over_exclude() {
        let out = filter_releases(
            vec![release_in("a", "web"), release_in("b", "db")],
            Some("web"),
            &["web".to_string()],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "a");
    }

    #[test]
    fn exclude_drops_namespace_and_remap_untouched() {
        let options = TransferOptions {
            exclude_namespaces: vec!["kube-system".to_string()],
            ..TransferOptions::default()
        };
        let out = process(
            vec![
                release_in("dns", "kube-system"),
                release_in("proxy", "kube-system"),
                release_in("web", "default"),
                release_in("db", "data"),
            ],
            &options,
        );
        let seen: Vec<_> = out
            .iter()
            .map(|r| (r.name.as_str(), r.namespace.as_str()))
            .collect();
        assert_eq!(seen, vec![("web", "default"), ("db", "data")]);
    }

    #[test]
    fn target_namespace_overwrites_all() {
        let options = TransferOptions {
            target_namespace: Some("restore".to_string()),
            ..TransferOptions::default()
        };
        let out = process(vec![release_in("a", "x"), release_in("b", "y")], &options);
        assert!(out.iter().all(|r| r.namespace == "restore"));
    }

    #[test]
    fn override_absent_leading_segment_leaves_tree_unchanged() {
        let mut tree = values(json!({"image": {"tag": "1.0"}}));
        let before = tree.clone();
        assert!(!set_value(&mut tree, "replicas.count", "3"));
        assert_eq!(tree, before);
    }

    #[test]
    fn override_through_scalar_leaves_tree_unchanged() {
        let mut tree = values(json!({"image": "nginx"}));
        let before = tree.clone();
        assert!(!set_value(&mut tree, "image.tag", "2.0"));
        assert_eq!(tree, before);
    }

    #[test]
    fn override_replaces_nested_value() {
        let mut tree = values(json!({"backend": {"storagePath": "/old", "kind": "local"}}));
        assert!(set_value(&mut tree, "backend.storagePath", "/new"));
        assert_eq!(tree["backend"]["storagePath"], "/new");
        assert_eq!(tree["backend"]["kind"], "local");
    }

    #[test]
    fn override_creates_missing_maps_below_existing_root() {
        let mut tree = values(json!({"server": {}}));
        assert!(set_value(&mut tree, "server.limits.cpu", "2"));
        assert_eq!(tree["server"]["limits"]["cpu"], "2");
    }

    #[test]
    fn override_top_level_key() {
        let mut tree = values(json!({"replicas": 1}));
        assert!(set_value(&mut tree, "replicas", "3"));
        assert_eq!(tree["replicas"], "3");
    }

    // -- conflict matrix -----------------------------------------------------

    #[rstest]
    #[case::nothing(false, false, false, false, Some(ConflictOutcome::Clear))]
    #[case::override_only(false, true, false, false, Some(ConflictOutcome::PathOverrideWithoutState))]
    #[case::relocating(true, true, false, false, Some(ConflictOutcome::Relocating))]
    #[case::forced(true, false, true, false, Some(ConflictOutcome::Forced))]
    #[case::forced_dry_run(true, false, true, true, Some(ConflictOutcome::Forced))]
    #[case::dry_run(true, false, false, true, Some(ConflictOutcome::DryRunWarning))]
    #[case::blocked(true, false, false, false, None)]
    fn conflict_matrix(
        #[case] exists: bool,
        #[case] path_override: bool,
        #[case] force: bool,
        #[case] dry_run: bool,
        #[case] expected: Option<ConflictOutcome>,
    ) {
        let result = check_conflict(exists, path_override, force, dry_run, "/snapshots");
        match expected {
            Some(outcome) => assert_eq!(result.unwrap(), outcome),
            None => assert!(matches!(
                result.unwrap_err(),
                SyncError::StateConflict { ref location, .. } if location == "/snapshots"
            )),
        }
    }

    // -- replay ----------------------------------------------------------------

    fn seeded(releases: &[Release]) -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        let store = SnapshotStore::new(backend.clone());
        for r in releases {
            store.write_one(r).unwrap();
        }
        backend
    }

    fn manager_descriptor(backend: &Arc<MemoryBackend>) {
        StateStore::new(backend.clone())
            .write(&ManagerInfo {
                release_filename: "mgr-1.release".to_string(),
                release_name: "mgr".to_string(),
                release_version: 1,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn blocked_conflict_issues_no_installs() {
        let backend = seeded(&[release_in("a", "default")]);
        manager_descriptor(&backend);
        let source = Arc::new(MemorySource::new());

        let replayer = Replayer::new(source.clone(), backend, TransferOptions::default());
        assert!(matches!(
            replayer.run().await.unwrap_err(),
            SyncError::StateConflict { .. }
        ));
        assert!(source.installs().is_empty());
    }

    #[tokio::test]
    async fn forced_conflict_proceeds() {
        let backend = seeded(&[release_in("a", "default")]);
        manager_descriptor(&backend);
        let source = Arc::new(MemorySource::new());
        let options = TransferOptions {
            force: true,
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert_eq!(report.conflict, ConflictOutcome::Forced);
        assert_eq!(report.installed(), 1);
        assert_eq!(source.installs().len(), 1);
    }

    #[tokio::test]
    async fn install_failures_do_not_abort_batch() {
        let backend = seeded(&[
            release_in("a", "default"),
            release_in("b", "default"),
            release_in("c", "default"),
        ]);
        let source = Arc::new(MemorySource::with_releases(vec![release_in("c", "default")]));
        source.fail_installs_of("a");
        let options = TransferOptions {
            threads: 1,
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert!(matches!(report.results[0], DeployResult::Failed { ref name, .. } if name == "a"));
        assert!(matches!(report.results[1], DeployResult::Installed { ref name, .. } if name == "b"));
        assert!(
            matches!(report.results[2], DeployResult::AlreadyExists { ref name, .. } if name == "c")
        );
        assert_eq!(source.installs().len(), 3);
    }

    #[tokio::test]
    async fn relocation_rewrites_manager_storage_path() {
        let mut mgr = release_in("mgr", "ops");
        mgr.config = values(json!({"backend": {"storagePath": "/old"}}));
        let backend = seeded(&[mgr, release_in("web", "default")]);
        manager_descriptor(&backend);
        let source = Arc::new(MemorySource::new());
        let options = TransferOptions {
            new_storage_path: Some("/new".to_string()),
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert_eq!(report.conflict, ConflictOutcome::Relocating);

        let installs = source.installs();
        let mgr = installs.iter().find(|r| r.name == "mgr").unwrap();
        assert_eq!(mgr.config["backend"]["storagePath"], "/new");
        let web = installs.iter().find(|r| r.name == "web").unwrap();
        assert!(web.config.is_empty());
    }

    #[tokio::test]
    async fn relocation_over_unreadable_descriptor_installs_nothing() {
        let mut mgr = release_in("mgr", "ops");
        mgr.config = values(json!({"backend": {"storagePath": "/old"}}));
        let backend = seeded(&[mgr, release_in("web", "default")]);
        backend.write(STATE_KEY, b"{not json").unwrap();
        let source = Arc::new(MemorySource::new());
        let options = TransferOptions {
            new_storage_path: Some("/new".to_string()),
            ..TransferOptions::default()
        };

        let err = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap_err();
        assert!(
            matches!(err, SyncError::DescriptorUnreadable { ref key, .. } if key == STATE_KEY),
            "got: {err}"
        );
        assert!(source.installs().is_empty());
    }

    #[tokio::test]
    async fn forced_replay_over_unreadable_descriptor_without_new_path_proceeds() {
        let backend = seeded(&[release_in("a", "default")]);
        backend.write(STATE_KEY, b"{not json").unwrap();
        let source = Arc::new(MemorySource::new());
        let options = TransferOptions {
            force: true,
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert_eq!(report.conflict, ConflictOutcome::Forced);
        assert_eq!(report.installed(), 1);
    }

    /// Source whose installs take a while and record peak overlap.
    #[derive(Default)]
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        attempted: AtomicUsize,
    }

    impl ReleaseSource for SlowSource {
        fn list_installed(&self) -> Result<Vec<Release>, relman_core::SourceError> {
            Ok(Vec::new())
        }

        fn install(&self, _release: &Release) -> Result<(), InstallError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.attempted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn deploy_never_exceeds_thread_limit() {
        let releases: Vec<Release> = (0..12)
            .map(|i| release_in(&format!("svc{i}"), "default"))
            .collect();
        let backend = seeded(&releases);
        let source = Arc::new(SlowSource::default());
        let options = TransferOptions {
            threads: 3,
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert_eq!(report.installed(), 12);
        assert_eq!(source.attempted.load(Ordering::SeqCst), 12);
        let peak = source.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak in-flight installs: {peak}");
        assert!(peak >= 1);
    }

    #[tokio::test]
    async fn dry_run_renders_instead_of_installing() {
        let backend = seeded(&[release_in("a", "default")]);
        manager_descriptor(&backend);
        let source = Arc::new(MemorySource::new());
        let options = TransferOptions {
            dry_run: true,
            ..TransferOptions::default()
        };

        let report = Replayer::new(source.clone(), backend, options)
            .run()
            .await
            .unwrap();
        assert_eq!(report.conflict, ConflictOutcome::DryRunWarning);
        assert!(matches!(
            &report.results[0],
            DeployResult::WouldInstall { rendered, .. } if rendered.contains("Name: a")
        ));
        assert!(source.installs().is_empty());
    }

    #[test]
    fn import_options_come_from_config() {
        let mut config = Config::default();
        config.import.namespace = Some("web".to_string());
        config.import.target_namespace = Some("restore".to_string());
        config.import.threads = 4;
        config.dry_run = true;

        let import = TransferOptions::import(&config);
        assert_eq!(import.namespace.as_deref(), Some("web"));
        assert_eq!(import.threads, 4);
        assert!(import.dry_run);

        let transfer = TransferOptions::transfer(&config);
        assert!(transfer.namespace.is_none());
        assert!(transfer.target_namespace.is_none());
        assert_eq!(transfer.threads, 4);
    }
}
