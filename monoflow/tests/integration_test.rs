use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, Signature};
use monoflow_adapters::{default_sources, GitSource};
use monoflow_core::{
    ChangeDetector, CommitSource, DependencyGraph, LoadOptions, PackageRegistry, VersionManager,
};
use tempfile::TempDir;

fn create_test_package(dir: &Path, name: &str, version: &str, deps: &[&str]) {
    let pkg_dir = dir.join(name);
    fs::create_dir_all(&pkg_dir).unwrap();

    let deps_list = deps
        .iter()
        .map(|dep| format!("\"{}\"", dep))
        .collect::<Vec<_>>()
        .join(", ");
    let manifest = format!(
        "[project]\nname = \"{}\"\nversion = \"{}\"\ndependencies = [{}]\n",
        name, version, deps_list
    );
    fs::write(pkg_dir.join("pyproject.toml"), manifest).unwrap();
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap();
}

fn get_monoflow_binary() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.join("target").join("debug").join("monoflow")
}

#[test]
fn test_discover_to_affected_pipeline() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let packages_dir = root.join("packages");
    fs::create_dir_all(&packages_dir).unwrap();

    create_test_package(&packages_dir, "core-lib", "1.0.0", &[]);
    create_test_package(&packages_dir, "service-api", "0.3.0", &["core-lib"]);
    create_test_package(&packages_dir, "web-client", "2.1.0", &["service-api"]);

    let outcome =
        PackageRegistry::discover(&packages_dir, &default_sources(), LoadOptions::default())
            .unwrap();
    assert_eq!(outcome.registry.len(), 3);
    assert!(outcome.skipped.is_empty());

    let graph = DependencyGraph::build(&outcome.registry);
    let order = graph.build_order().unwrap();
    let position = |name: &str| order.iter().position(|pkg| pkg == name).unwrap();
    assert!(position("core-lib") < position("service-api"));
    assert!(position("service-api") < position("web-client"));

    let changed = vec![packages_dir.join("core-lib").join("src/client.py")];
    let affected = ChangeDetector::fully_affected(&changed, &outcome.registry, &graph).unwrap();
    let names: Vec<&str> = affected.iter().map(String::as_str).collect();
    assert_eq!(names, ["core-lib", "service-api", "web-client"]);
}

#[test]
fn test_release_plan_from_commit_history() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let repo = Repository::init(&root).unwrap();

    let packages_dir = root.join("packages");
    fs::create_dir_all(&packages_dir).unwrap();
    create_test_package(&packages_dir, "core-lib", "1.2.3", &[]);
    commit_all(&repo, "chore: initial layout");

    fs::write(
        packages_dir.join("core-lib").join("api.py"),
        "def get(): ...\n",
    )
    .unwrap();
    commit_all(&repo, "feat(core-lib): add api module");

    fs::write(
        packages_dir.join("core-lib").join("errors.py"),
        "def fixed(): ...\n",
    )
    .unwrap();
    commit_all(&repo, "fix: handle empty input");

    let outcome =
        PackageRegistry::discover(&packages_dir, &default_sources(), LoadOptions::default())
            .unwrap();
    let registry = outcome.registry;

    let source = GitSource::open(&root).unwrap();
    let core_root = registry.get("core-lib").unwrap().root.clone();
    let commits = source.commits_for_package(&core_root, None).unwrap();
    assert_eq!(commits.len(), 3);

    let manager = VersionManager::new(&registry);
    let plan = manager.plan_release("core-lib", &commits).unwrap();
    assert_eq!(plan.current.to_string(), "1.2.3");
    assert_eq!(plan.next.to_string(), "1.3.0");
    assert!(!plan.is_noop());

    // Write the bump back and confirm a fresh load sees it.
    let sources = default_sources();
    let manifest_source = sources
        .iter()
        .find(|candidate| candidate.detect(&core_root))
        .unwrap();
    manifest_source.set_version(&core_root, &plan.next).unwrap();

    let reloaded =
        PackageRegistry::discover(&packages_dir, &default_sources(), LoadOptions::default())
            .unwrap();
    assert_eq!(
        reloaded.registry.get("core-lib").unwrap().version.to_string(),
        "1.3.0"
    );
}

#[test]
#[ignore]
fn test_scan_command() {
    let temp_dir = TempDir::new().unwrap();
    let packages_dir = temp_dir.path().join("packages");
    fs::create_dir_all(&packages_dir).unwrap();

    create_test_package(&packages_dir, "core-lib", "1.0.0", &[]);
    create_test_package(&packages_dir, "service-api", "0.3.0", &["core-lib"]);

    let binary = get_monoflow_binary();
    let output = Command::new(&binary)
        .arg("--packages-dir")
        .arg(&packages_dir)
        .arg("scan")
        .output()
        .expect("Failed to execute monoflow scan");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("core-lib"));
    assert!(stdout.contains("service-api"));
}

#[test]
#[ignore]
fn test_order_command() {
    let temp_dir = TempDir::new().unwrap();
    let packages_dir = temp_dir.path().join("packages");
    fs::create_dir_all(&packages_dir).unwrap();

    create_test_package(&packages_dir, "core-lib", "1.0.0", &[]);
    create_test_package(&packages_dir, "service-api", "0.3.0", &["core-lib"]);

    let binary = get_monoflow_binary();
    let output = Command::new(&binary)
        .arg("--packages-dir")
        .arg(&packages_dir)
        .arg("order")
        .arg("--json")
        .output()
        .expect("Failed to execute monoflow order");

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let order: Vec<&str> = parsed["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|value| value.as_str().unwrap())
        .collect();
    assert_eq!(order, ["core-lib", "service-api"]);
}
