use conver_core::{
    Bump, Commit, Dependency, FileChange, FileChangeKind, Package, StickyState, Workspace,
};
use conver_engine::{PlanOptions, plan, validate};
use conver_version as version;
use semver::Version;

fn v(text: &str) -> Version {
    Version::parse(text).expect("parse version")
}

fn commit(hash: &str, header: &str, files: &[&str]) -> Commit {
    let commit_type = header.split_once(':').map(|(t, _)| t.to_string());
    Commit {
        hash: hash.to_string(),
        commit_type,
        header: header.to_string(),
        diff: files
            .iter()
            .map(|f| FileChange::new(FileChangeKind::Modified, format!("/repo/{f}")))
            .collect(),
    }
}

fn updates(plan: &conver_engine::VersionPlan) -> Vec<(&str, String, Bump)> {
    plan.updates
        .iter()
        .map(|u| (u.name.as_str(), u.new_version.to_string(), u.bump))
        .collect()
}

#[test]
fn independent_packages_bump_from_their_own_commits() {
    let workspace = Workspace::new(
        "/repo",
        vec![
            Package::new("a", v("1.2.3"), "/repo/packages/a"),
            Package::new("b", v("1.2.3"), "/repo/packages/b"),
        ],
    )
    .expect("workspace");
    let commits = [
        commit("c2", "feat: add bar", &["packages/b/src/lib.rs"]),
        commit("c1", "patch: fix foo", &["packages/a/src/lib.rs"]),
    ];

    let plan = plan(
        &workspace,
        &commits,
        &PlanOptions::default(),
        &mut StickyState::default(),
    )
    .expect("plan");

    assert_eq!(
        updates(&plan),
        [
            ("a", "1.2.4".to_string(), Bump::Patch),
            ("b", "1.3.0".to_string(), Bump::Minor),
        ]
    );
}

#[test]
fn cyclic_dependencies_settle() {
    let workspace = Workspace::new(
        "/repo",
        vec![
            Package::new("a", v("1.2.3"), "/repo/packages/a")
                .with_dependency(Dependency::new("b", Some("1.2.3"))),
            Package::new("b", v("1.2.3"), "/repo/packages/b")
                .with_dependency(Dependency::new("a", Some("1.2.3"))),
        ],
    )
    .expect("workspace");
    let commits = [commit("c1", "feat: add bar", &["packages/b/src/lib.rs"])];

    let plan = plan(
        &workspace,
        &commits,
        &PlanOptions::default(),
        &mut StickyState::default(),
    )
    .expect("plan");

    assert_eq!(
        updates(&plan),
        [
            ("a", "1.2.4".to_string(), Bump::Patch),
            ("b", "1.3.0".to_string(), Bump::Minor),
        ]
    );
    assert!(plan.passes <= 3 * workspace.len() + 1);
}

#[test]
fn entering_prerelease_builds_initial_version() {
    let entered = version::with_prerelease(&v("1.2.3"), "rc", 0).expect("valid id");

    assert_eq!(entered, v("1.2.3-rc.0"));
}

#[test]
fn feature_during_prerelease_resets_sequence() {
    let workspace = Workspace::new(
        "/repo",
        vec![Package::new("my-package", v("1.2.3-rc.0"), "/repo")],
    )
    .expect("workspace");
    let mut state = StickyState::default();
    state.record_pre_release("my-package", v("1.2.3"));
    let commits = [commit("c1", "feat: something", &["src/lib.rs"])];

    let plan = plan(&workspace, &commits, &PlanOptions::default(), &mut state).expect("plan");

    assert_eq!(
        updates(&plan),
        [("my-package", "1.3.0-rc.0".to_string(), Bump::Minor)]
    );
    assert_eq!(state.pre_release_origin("my-package"), Some(&v("1.2.3")));
}

#[test]
fn second_feature_during_prerelease_counts_up() {
    let workspace = Workspace::new(
        "/repo",
        vec![Package::new("my-package", v("1.3.0-rc.0"), "/repo")],
    )
    .expect("workspace");
    let mut state = StickyState::default();
    state.record_pre_release("my-package", v("1.2.3"));
    let commits = [commit("c1", "feat: more", &["src/lib.rs"])];

    let plan = plan(&workspace, &commits, &PlanOptions::default(), &mut state).expect("plan");

    assert_eq!(
        updates(&plan),
        [("my-package", "1.3.0-rc.1".to_string(), Bump::Minor)]
    );
}

#[test]
fn exiting_prerelease_keeps_reached_triple() {
    let stripped = version::strip_prerelease(&v("1.3.0-rc.5"));

    assert_eq!(stripped, v("1.3.0"));
    assert_ne!(stripped, v("1.2.3"));
}

#[test]
fn nested_packages_both_bump_by_default() {
    let workspace = Workspace::new(
        "/repo",
        vec![
            Package::new("parent", v("1.2.3"), "/repo/parent"),
            Package::new("nested", v("1.2.3"), "/repo/parent/nested"),
        ],
    )
    .expect("workspace");
    let commits = [commit("c1", "fix: nested", &["parent/nested/src/lib.rs"])];

    let plan = plan(
        &workspace,
        &commits,
        &PlanOptions::default(),
        &mut StickyState::default(),
    )
    .expect("plan");

    assert_eq!(
        updates(&plan),
        [
            ("parent", "1.2.4".to_string(), Bump::Patch),
            ("nested", "1.2.4".to_string(), Bump::Patch),
        ]
    );
}

#[test]
fn prevented_major_fails_validation_only() {
    let workspace =
        Workspace::new("/repo", vec![Package::new("a", v("1.0.0"), "/repo/a")]).expect("workspace");
    let options = PlanOptions {
        prevent_major_bump: true,
        ..PlanOptions::default()
    };
    let commits = [commit("c1", "breaking: drop api", &["a/src/lib.rs"])];

    let plan = plan(&workspace, &commits, &options, &mut StickyState::default()).expect("plan");

    assert_eq!(plan.updates[0].new_version, v("2.0.0"));
    assert!(validate(&plan, &options).is_err());
}

#[test]
fn planned_versions_never_regress() {
    let workspace = Workspace::new(
        "/repo",
        vec![
            Package::new("a", v("1.3.0-rc.2"), "/repo/a"),
            Package::new("b", v("0.9.9"), "/repo/b"),
            Package::new("c", v("2.0.0"), "/repo/c")
                .with_dependency(Dependency::new("a", Some("1.3.0-rc.2")).peer()),
        ],
    )
    .expect("workspace");
    let mut state = StickyState::default();
    state.record_pre_release("a", v("1.2.0"));
    let commits = [
        commit("c1", "fix: x", &["a/x.rs"]),
        commit("c2", "breaking: y", &["b/y.rs"]),
        commit("c3", "chore: z", &["c/z.rs"]),
    ];

    let plan = plan(&workspace, &commits, &PlanOptions::default(), &mut state).expect("plan");

    assert_eq!(plan.updates.len(), 3);
    for update in &plan.updates {
        assert!(version::compare(&update.new_version, &update.old_version).is_gt());
    }
}
