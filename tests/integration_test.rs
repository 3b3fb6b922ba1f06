// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{Repository, Signature};
use tempfile::TempDir;

fn git_semver(location: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-semver"))
        .arg("-C")
        .arg(location)
        .args(args)
        .env("GIT_SEMVER_LOG", "off")
        .output()
        .expect("Failed to execute git-semver")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A repository with one commit tagged `tag`, plus `extra` commits on top.
fn tagged_repo(tag: &str, extra: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();

    let mut parent = None;
    for i in 0..=extra {
        fs::write(dir.path().join("file.txt"), format!("{}\n", i)).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parents: Vec<git2::Commit<'_>> = parent
            .map(|oid| repo.find_commit(oid).unwrap())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "change", &tree, &parent_refs)
            .unwrap();

        if i == 0 {
            let object = repo.find_object(oid, None).unwrap();
            repo.tag(tag, &object, &sig, "release", false).unwrap();
        }
        parent = Some(oid);
    }
    dir
}

#[test]
fn test_git_semver_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-semver"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("git-semver"));
    assert!(text.contains("Tag every push with the next semantic version"));
    assert!(text.contains("sync"));
}

#[test]
fn test_next_versions_from_tagged_repo() {
    let dir = tagged_repo("1.2.3", 2);

    let minor = git_semver(dir.path(), &["next", "minor"]);
    assert!(minor.status.success());
    assert_eq!(stdout(&minor), "1.3.0");

    let build = git_semver(dir.path(), &["next", "build"]);
    assert_eq!(stdout(&build), "1.2.3-3");
}

#[test]
fn test_version_and_clean_version() {
    let dir = tagged_repo("0.9.1", 1);

    let full = git_semver(dir.path(), &["version"]);
    assert!(stdout(&full).starts_with("0.9.1-1-g"));

    let clean = git_semver(dir.path(), &["version", "--clean"]);
    assert_eq!(stdout(&clean), "0.9.1");
}

#[test]
fn test_adjusted_version_never_regresses_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        "{\n  \"name\": \"app\",\n  \"version\": \"2.0.0\"\n}\n",
    )
    .unwrap();

    let behind = git_semver(dir.path(), &["adjusted-version", "1.0.1"]);
    assert!(behind.status.success());
    assert_eq!(stdout(&behind), "2.0.1");

    let ahead = git_semver(dir.path(), &["adjusted-version", "2.3.0"]);
    assert_eq!(stdout(&ahead), "2.3.0");
}

#[test]
fn test_adjusted_version_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let output = git_semver(dir.path(), &["adjusted-version", "1.0.1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("package.json"));
}

#[test]
fn test_stamp_writes_cargo_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("Cargo.toml");
    fs::write(
        &manifest,
        "[package]\nname = \"app\" # the app\nversion = \"0.1.0\"\n",
    )
    .unwrap();

    let output = git_semver(
        dir.path(),
        &["stamp", "0.2.0", "--manifest", manifest.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Stamping 0.2.0 into"));
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "[package]\nname = \"app\" # the app\nversion = \"0.2.0\"\n"
    );
}

// ============================================================================
// End-to-end sync against a real git remote
// ============================================================================

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(unix)]
#[test]
fn test_sync_tags_and_pushes_to_remote() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }

    let root = TempDir::new().unwrap();
    let seed = root.path().join("seed");
    let remote = root.path().join("remote.git");
    let work = root.path().join("work");
    fs::create_dir(&seed).unwrap();

    git(&seed, &["init", "-q"]);
    git(&seed, &["config", "user.name", "Test User"]);
    git(&seed, &["config", "user.email", "test@example.com"]);
    fs::write(seed.join("app.txt"), "one\n").unwrap();
    git(&seed, &["add", "app.txt"]);
    git(&seed, &["commit", "-q", "-m", "initial"]);
    git(&seed, &["tag", "-a", "-m", "first release", "1.0.0"]);

    git(root.path(), &["clone", "-q", "--bare", "seed", "remote.git"]);
    git(root.path(), &["clone", "-q", "remote.git", "work"]);
    git(&work, &["config", "user.name", "Test User"]);
    git(&work, &["config", "user.email", "test@example.com"]);
    git(&work, &["config", "commit.gpgsign", "false"]);
    git(&work, &["config", "tag.gpgsign", "false"]);

    let published = root.path().join("published.txt");
    fs::write(
        work.join("gitsemver.toml"),
        format!(
            "[hooks]\npost_sync = [\"echo $GITSEMVER_VERSION > '{}'\"]\n",
            published.display()
        ),
    )
    .unwrap();

    // Nothing tracked has changed yet
    let idle = git_semver(&work, &["sync", "nothing"]);
    assert!(idle.status.success());
    assert!(!git(&remote, &["tag"]).contains("1.0.1"));

    fs::write(work.join("app.txt"), "two\n").unwrap();
    let output = git_semver(&work, &["sync", "fix", "the", "thing"]);
    assert!(
        output.status.success(),
        "sync failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains(">>>"));

    let tags = git(&remote, &["tag"]);
    assert!(tags.lines().any(|t| t == "1.0.1"), "remote tags: {}", tags);
    assert_eq!(git(&remote, &["log", "-1", "--format=%s"]), "fix the thing");
    assert_eq!(fs::read_to_string(&published).unwrap().trim(), "1.0.1");
}

#[cfg(unix)]
#[test]
fn test_sync_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("plain");
    fs::create_dir(&nested).unwrap();
    if Repository::discover(&nested).is_ok() {
        return;
    }

    let output = git_semver(&nested, &["sync"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not connect"));
}
