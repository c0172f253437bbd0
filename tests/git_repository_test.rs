use git2::{Oid, Repository as Git2Repo, Signature};
use nsv::analyzer::VersionAnalyzer;
use nsv::config::Options;
use nsv::git::{Git2Repository, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_repo() -> (TempDir, Git2Repo) {
    let dir = TempDir::new().unwrap();
    let repo = Git2Repo::init(dir.path()).unwrap();
    (dir, repo)
}

/// Write `path` and commit it on top of HEAD
fn commit_file(repo: &Git2Repo, path: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().unwrap().to_path_buf();
    let file = workdir.join(path);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(path)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tag_lightweight(repo: &Git2Repo, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn tag_annotated(repo: &Git2Repo, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    repo.tag(name, &object, &sig, "release", false).unwrap();
}

fn next_tag(repo: &Git2Repository) -> Option<String> {
    VersionAnalyzer::new(Options::default())
        .unwrap()
        .analyze(repo)
        .unwrap()
        .next
        .map(|next| next.formatted)
}

#[test]
fn test_first_release_without_tags() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "README.md", "hello", "feat: initial commit");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag(None).unwrap(), None);
    assert_eq!(next_tag(&repo).as_deref(), Some("0.1.0"));
}

#[test]
fn test_lightweight_tag_is_boundary() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "1", "feat: first");
    tag_lightweight(&repo, "v0.1.0", first);
    commit_file(&repo, "a.txt", "2", "fix: second");
    commit_file(&repo, "b.txt", "3", "docs: third");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag(None).unwrap().as_deref(), Some("v0.1.0"));

    let log = repo.log(Some("v0.1.0"), None).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].message, "docs: third");
    assert_eq!(log[1].message, "fix: second");
    assert_eq!(next_tag(&repo).as_deref(), Some("v0.1.1"));
}

#[test]
fn test_annotated_tag_is_found() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "1", "feat: first");
    tag_annotated(&repo, "1.4.2", first);
    commit_file(&repo, "a.txt", "2", "feat: second");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag(None).unwrap().as_deref(), Some("1.4.2"));
    assert_eq!(next_tag(&repo).as_deref(), Some("1.5.0"));
}

#[test]
fn test_highest_tag_on_same_commit_wins() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "1", "feat: first");
    tag_lightweight(&repo, "0.9.0", first);
    tag_lightweight(&repo, "0.10.0", first);
    tag_lightweight(&repo, "nightly", first);

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag(None).unwrap().as_deref(), Some("0.10.0"));
}

#[test]
fn test_non_version_tags_are_ignored() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "1", "feat: first");
    tag_lightweight(&repo, "0.1.0", first);
    let second = commit_file(&repo, "a.txt", "2", "fix: second");
    tag_lightweight(&repo, "deployed", second);

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag(None).unwrap().as_deref(), Some("0.1.0"));
}

#[test]
fn test_changed_paths_are_recorded() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "src/search/main.go", "package main", "feat(search): init");

    let repo = Git2Repository::open(dir.path()).unwrap();
    let log = repo.log(None, Some("src/search")).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].changed_paths, vec!["src/search/main.go".to_string()]);
    assert_eq!(log[0].hash.len(), 40);
}

#[test]
fn test_changed_paths_skipped_without_filter() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "src/search/main.go", "package main", "feat(search): init");

    let repo = Git2Repository::open(dir.path()).unwrap();
    let log = repo.log(None, None).unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].changed_paths.is_empty());
    assert_eq!(next_tag(&repo).as_deref(), Some("0.1.0"));
}

#[test]
fn test_non_utf8_message_is_kept() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "a.txt", "1", "fix: first");
    let head = repo.head().unwrap().peel_to_commit().unwrap();

    let mut raw = format!(
        "tree {}\nparent {}\nauthor Test User <test@example.com> 1700000000 +0000\n\
         committer Test User <test@example.com> 1700000000 +0000\n\n",
        head.tree_id(),
        head.id()
    )
    .into_bytes();
    raw.extend_from_slice(b"feat: caf\xe9 support\n");
    let oid = repo
        .odb()
        .unwrap()
        .write(git2::ObjectType::Commit, &raw)
        .unwrap();
    repo.reference("refs/heads/latin1", oid, true, "test").unwrap();
    repo.set_head("refs/heads/latin1").unwrap();

    let repo = Git2Repository::open(dir.path()).unwrap();
    let log = repo.log(None, None).unwrap();
    assert_eq!(log.len(), 2);
    assert!(log[0].message.starts_with("feat: caf"));
    assert_eq!(next_tag(&repo).as_deref(), Some("0.1.0"));
}

#[test]
fn test_invoked_from_subdirectory() {
    let (dir, repo) = init_repo();
    let store = commit_file(&repo, "src/store/main.go", "1", "feat(store): init");
    tag_lightweight(&repo, "store/0.1.0", store);
    commit_file(&repo, "src/search/main.go", "1", "feat(search): init");
    commit_file(&repo, "src/store/main.go", "2", "fix(store): retry");

    let search = Git2Repository::open(dir.path().join("src/search")).unwrap();
    assert_eq!(search.current_path().unwrap(), PathBuf::from("src/search"));
    assert_eq!(next_tag(&search).as_deref(), Some("search/0.1.0"));

    let store = Git2Repository::open(dir.path().join("src/store")).unwrap();
    assert_eq!(
        store.latest_tag(Some("store/")).unwrap().as_deref(),
        Some("store/0.1.0")
    );
    assert_eq!(next_tag(&store).as_deref(), Some("store/0.1.1"));
}

#[test]
fn test_path_option_from_root() {
    let (dir, repo) = init_repo();
    commit_file(&repo, "src/processor/main.go", "1", "fix(processor): retry");
    commit_file(&repo, "README.md", "1", "feat: readme");

    let repo = Git2Repository::open(dir.path()).unwrap();
    let options = Options {
        path: Some(PathBuf::from("src/processor")),
        ..Options::default()
    };

    let next = VersionAnalyzer::new(options)
        .unwrap()
        .analyze(&repo)
        .unwrap()
        .next
        .unwrap();
    assert_eq!(next.formatted, "processor/0.0.1");
    assert_eq!(next.log_dir, "src/processor");
    assert_eq!(next.log.len(), 1);
}
