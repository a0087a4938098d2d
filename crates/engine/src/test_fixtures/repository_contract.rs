//! Behaviour every registry backend must show.
//!
//! Each function drives a fresh (or freshly cleaned) repository through one
//! property and panics on violation. Backends call these from their own
//! test modules.

use polvo_domain::{PackageUpdate, VersionName, VersionUpdate};

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{ListVersionsOptions, RepoError, Repository};

use super::{package, package_name, version, version_name};

async fn seed_weighted(repo: &impl Repository, ctx: &RequestContext, pkg: &str, weights: &[(&str, u32)]) {
    let name = package_name(pkg);
    repo.create_package(ctx, &package(pkg)).await.unwrap();
    for (v, weight) in weights {
        repo.create_version(ctx, &name, &version(v, &format!("https://cdn/{pkg}/{v}.json")))
            .await
            .unwrap();
        if *weight > 0 {
            repo.update_version(ctx, &name, &version_name(v), &VersionUpdate::new().with_weight(*weight))
                .await
                .unwrap();
        }
    }
}

fn names(versions: &[polvo_domain::Version]) -> Vec<&str> {
    versions.iter().map(|v| v.name.as_str()).collect()
}

pub async fn create_package_succeeds_exactly_once(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let created = repo.create_package(&ctx, &package("left-pad")).await.unwrap();
    assert_eq!(created.name.as_str(), "left-pad");
    assert_eq!(created.maintainer, "team-registry");

    let err = repo
        .create_package(&ctx, &package("left-pad"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err:?}");
}

pub async fn existence_follows_create_and_delete(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("exists-pkg");
    assert!(!repo.package_exists(&ctx, &name).await.unwrap());

    seed_weighted(repo, &ctx, "exists-pkg", &[("1.0.0", 0), ("2.0.0", 0)]).await;
    assert!(repo.package_exists(&ctx, &name).await.unwrap());
    assert!(repo
        .version_exists(&ctx, &name, &version_name("1.0.0"))
        .await
        .unwrap());

    repo.delete_package(&ctx, &name).await.unwrap();
    assert!(!repo.package_exists(&ctx, &name).await.unwrap());
    for v in ["1.0.0", "2.0.0"] {
        assert!(!repo
            .version_exists(&ctx, &name, &version_name(v))
            .await
            .unwrap());
    }
}

pub async fn delete_package_cascades_to_versions(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("cascade");
    seed_weighted(repo, &ctx, "cascade", &[("v1", 0), ("v2", 0)]).await;

    repo.delete_package(&ctx, &name).await.unwrap();

    for v in ["v1", "v2"] {
        let err = repo
            .get_version(&ctx, &name, &version_name(v))
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err:?}");
    }
    assert!(repo.get_package(&ctx, &name).await.unwrap_err().is_not_found());

    // The name is free again and starts with no versions.
    repo.create_package(&ctx, &package("cascade")).await.unwrap();
    let versions = repo
        .list_versions(&ctx, &name, ListVersionsOptions::default())
        .await
        .unwrap();
    assert!(versions.is_empty());
}

pub async fn versions_are_ordered_by_weight(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("weighted");
    seed_weighted(repo, &ctx, "weighted", &[("a", 1), ("b", 5), ("c", 3)]).await;

    let listed = repo
        .list_versions(&ctx, &name, ListVersionsOptions::default())
        .await
        .unwrap();
    assert_eq!(names(&listed), vec!["b", "c", "a"]);
    assert_eq!(
        listed.iter().map(|v| v.weight).collect::<Vec<_>>(),
        vec![5, 3, 1]
    );

    let heaviest = repo.get_heaviest_version(&ctx, &name).await.unwrap();
    assert_eq!(heaviest.name.as_str(), "b");
    assert_eq!(heaviest.weight, 5);
}

pub async fn masked_update_leaves_other_fields_alone(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("masked");
    seed_weighted(repo, &ctx, "masked", &[("1.0.0", 2)]).await;

    let fields = VersionUpdate::new().with_manifest_url("https://cdn/masked/y.json");
    let updated = repo
        .update_version(&ctx, &name, &version_name("1.0.0"), &fields)
        .await
        .unwrap();
    assert_eq!(updated.manifest_url, "https://cdn/masked/y.json");

    let fetched = repo
        .get_version(&ctx, &name, &version_name("1.0.0"))
        .await
        .unwrap();
    assert_eq!(fetched.name.as_str(), "1.0.0");
    assert_eq!(fetched.manifest_url, "https://cdn/masked/y.json");
    assert_eq!(fetched.weight, 2);
}

pub async fn created_version_round_trips_at_weight_zero(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("round-trip");
    repo.create_package(&ctx, &package("round-trip")).await.unwrap();

    let mut requested = version("1.0.0", "u");
    requested.weight = 42;
    let created = repo.create_version(&ctx, &name, &requested).await.unwrap();
    assert_eq!(created.weight, 0);

    let fetched = repo
        .get_version(&ctx, &name, &version_name("1.0.0"))
        .await
        .unwrap();
    assert_eq!(fetched.name.as_str(), "1.0.0");
    assert_eq!(fetched.manifest_url, "u");
    assert_eq!(fetched.weight, 0);
    assert_eq!(fetched.created_at, requested.created_at);
}

pub async fn version_names_are_scoped_to_their_package(repo: &impl Repository) {
    let ctx = RequestContext::new();
    for pkg in ["scope-a", "scope-b"] {
        repo.create_package(&ctx, &package(pkg)).await.unwrap();
        repo.create_version(&ctx, &package_name(pkg), &version("1.0.0", pkg))
            .await
            .unwrap();
    }

    let a = repo
        .get_version(&ctx, &package_name("scope-a"), &version_name("1.0.0"))
        .await
        .unwrap();
    let b = repo
        .get_version(&ctx, &package_name("scope-b"), &version_name("1.0.0"))
        .await
        .unwrap();
    assert_eq!(a.manifest_url, "scope-a");
    assert_eq!(b.manifest_url, "scope-b");
}

pub async fn create_version_distinguishes_missing_package_from_duplicate(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let err = repo
        .create_version(&ctx, &package_name("ghost"), &version("1.0.0", "u"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RepoError::NotFound { entity_type: "Package", .. }),
        "unexpected error: {err:?}"
    );

    seed_weighted(repo, &ctx, "dup", &[("1.0.0", 0)]).await;
    let err = repo
        .create_version(&ctx, &package_name("dup"), &version("1.0.0", "other"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RepoError::AlreadyExists { entity_type: "Version", .. }),
        "unexpected error: {err:?}"
    );
}

pub async fn deletes_of_absent_targets_succeed(repo: &impl Repository) {
    let ctx = RequestContext::new();
    repo.delete_package(&ctx, &package_name("never-created"))
        .await
        .unwrap();

    repo.create_package(&ctx, &package("has-no-versions")).await.unwrap();
    repo.delete_version(&ctx, &package_name("has-no-versions"), &version_name("9.9.9"))
        .await
        .unwrap();
    assert!(repo
        .package_exists(&ctx, &package_name("has-no-versions"))
        .await
        .unwrap());
}

pub async fn updates_of_absent_targets_are_not_found(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let ghost = package_name("ghost");

    let rename = PackageUpdate::new().with_name(package_name("ghost-2"));
    let err = repo.update_package(&ctx, &ghost, &rename).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");

    let maintainer = PackageUpdate::new().with_maintainer("team-b");
    let err = repo.update_package(&ctx, &ghost, &maintainer).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");

    repo.create_package(&ctx, &package("present")).await.unwrap();
    let err = repo
        .update_version(
            &ctx,
            &package_name("present"),
            &version_name("9.9.9"),
            &VersionUpdate::new().with_weight(3),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
    assert!(!repo.package_exists(&ctx, &package_name("ghost-2")).await.unwrap());
}

pub async fn list_versions_respects_limit_and_unordered(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("limits");
    seed_weighted(repo, &ctx, "limits", &[("x", 1), ("y", 7), ("z", 4)]).await;

    let top = repo
        .list_versions(&ctx, &name, ListVersionsOptions::default().with_limit(2))
        .await
        .unwrap();
    assert_eq!(names(&top), vec!["y", "z"]);

    let mut all = repo
        .list_versions(&ctx, &name, ListVersionsOptions::default().unordered())
        .await
        .unwrap();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(names(&all), vec!["x", "y", "z"]);

    let err = repo
        .list_versions(&ctx, &package_name("missing"), ListVersionsOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = repo
        .get_heaviest_version(&ctx, &package_name("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

pub async fn version_rename_onto_sibling_conflicts(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let name = package_name("renames");
    seed_weighted(repo, &ctx, "renames", &[("1.0.0", 0), ("2.0.0", 0)]).await;

    let onto_sibling = VersionUpdate::new().with_name(version_name("2.0.0"));
    let err = repo
        .update_version(&ctx, &name, &version_name("1.0.0"), &onto_sibling)
        .await
        .unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err:?}");

    let fresh: VersionName = version_name("1.0.1");
    let renamed = repo
        .update_version(
            &ctx,
            &name,
            &version_name("1.0.0"),
            &VersionUpdate::new().with_name(fresh.clone()),
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, fresh);
    assert!(!repo
        .version_exists(&ctx, &name, &version_name("1.0.0"))
        .await
        .unwrap());
    assert!(repo.version_exists(&ctx, &name, &fresh).await.unwrap());
}

pub async fn cancelled_context_writes_nothing(repo: &impl Repository) {
    let cancelled = RequestContext::new();
    cancelled.cancel();
    let err = repo
        .create_package(&cancelled, &package("never-written"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Cancelled { .. }), "unexpected error: {err:?}");

    let ctx = RequestContext::new();
    assert!(!repo
        .package_exists(&ctx, &package_name("never-written"))
        .await
        .unwrap());
}

pub async fn concurrent_creates_have_one_winner(repo: &impl Repository) {
    let ctx = RequestContext::new();
    let contender = package("contended");
    let attempts = (0..8).map(|_| repo.create_package(&ctx, &contender));
    let results = futures_util::future::join_all(attempts).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "results: {results:?}");
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(err.is_already_exists(), "unexpected error: {err:?}");
    }
}
