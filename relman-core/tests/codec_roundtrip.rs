//! Roundtrip tests for the release codec and the directory source.
//!
//! Each `#[case]` is isolated and shares no state.

use assert_fs::prelude::*;
use chrono::DateTime;
use predicates::prelude::predicate;
use relman_core::{
    codec,
    types::{Chart, Release, ReleaseStatus},
    DirectorySource, ReleaseSource,
};
use rstest::rstest;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minimal_release() -> Release {
    Release::new("a", "default", 1)
}

fn deep_values_release() -> Release {
    let mut r = Release::new("monitoring", "observability", 14);
    r.status = ReleaseStatus::Failed;
    r.last_deployed = DateTime::from_timestamp(1_650_000_000, 0);
    r.chart = Chart {
        name: "prometheus".to_string(),
        version: "25.1.0".to_string(),
        values: json!({"server": {"retention": "15d"}})
            .as_object()
            .cloned()
            .expect("map"),
    };
    r.config = json!({
        "backend": {"storagePath": "/snapshots/prod"},
        "server": {"resources": {"limits": {"cpu": "2", "memory": "4Gi"}}},
        "alerts": [{"name": "high-load", "severity": 3}],
        "enabled": true
    })
    .as_object()
    .cloned()
    .expect("map");
    r
}

fn unicode_release() -> Release {
    let mut r = Release::new("アプリ-проект", "名前空間", 2);
    r.status = ReleaseStatus::PendingRollback;
    r.config = json!({"greeting": "héllo wörld"})
        .as_object()
        .cloned()
        .expect("map");
    r
}

// ---------------------------------------------------------------------------
// Roundtrip
// ---------------------------------------------------------------------------

#[rstest]
#[case::minimal(minimal_release())]
#[case::deep_values(deep_values_release())]
#[case::unicode(unicode_release())]
fn encode_decode_preserves_reconciled_fields(#[case] release: Release) {
    let decoded = codec::decode(&codec::encode(&release).expect("encode")).expect("decode");
    assert_eq!(decoded.name, release.name);
    assert_eq!(decoded.namespace, release.namespace);
    assert_eq!(decoded.version, release.version);
    assert_eq!(decoded.status, release.status);
    assert_eq!(decoded.config, release.config);
    assert_eq!(codec::filename(&decoded), codec::filename(&release));
}

#[test]
fn installed_release_lands_at_namespace_path() {
    let cluster = assert_fs::TempDir::new().expect("tempdir");
    let source = DirectorySource::new(cluster.path());
    source.install(&deep_values_release()).expect("install");

    cluster
        .child("observability")
        .child("monitoring.json")
        .assert(predicate::path::exists());
    cluster
        .child("observability")
        .child("monitoring.json.tmp")
        .assert(predicate::path::missing());

    let listed = source.list_installed().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].config, deep_values_release().config);
    assert_eq!(listed[0].status, ReleaseStatus::Deployed);
}
