// tests/integration_test.rs
use changelog_pr::assembler::ChangelogAssembler;
use changelog_pr::git::{Git2Repository, Repository};
use changelog_pr::provider::{MockProvider, ProviderKind};
use changelog_pr::render::render_markdown;
use git2::{Oid, Repository as Git2Repo, Signature, Time};
use std::process::Command;
use tempfile::TempDir;

fn commit(repo: &Git2Repo, message: &str, time: i64) -> Oid {
    let signature = Signature::new("Test User", "test@example.com", &Time::new(time, 0)).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
}

fn tag(repo: &Git2Repo, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn merge_message(branch: &str, id: u32) -> String {
    format!(
        "Merge branch '{}' into 'main'\n\n{}\n\nSee merge request team/app!{}",
        branch, branch, id
    )
}

/// Tags v1.0.0 and v1.1.0 followed by two merge requests
fn setup_repo() -> (TempDir, Git2Repository) {
    let dir = TempDir::new().unwrap();
    let raw = Git2Repo::init(dir.path()).unwrap();

    let root = commit(&raw, "Initial commit", 1_000);
    tag(&raw, "v1.0.0", root);
    let first = commit(&raw, &merge_message("feature-a", 11), 2_000);
    tag(&raw, "v1.1.0", first);
    commit(&raw, "Bump dependencies", 3_000);
    commit(&raw, &merge_message("feature-b", 12), 4_000);
    commit(&raw, &merge_message("fix-c", 13), 5_000);
    tag(&raw, "nightly", first);

    (dir, Git2Repository::from_git2(raw))
}

fn provider() -> MockProvider {
    let mut provider = MockProvider::new(ProviderKind::GitLab);
    provider.add_description(
        "11",
        "## Changelog Inclusions\n### Additions\nFeature A\n",
        "https://gitlab.com/team/app/-/merge_requests/11",
    );
    provider.add_description(
        "12",
        "Some context.\r\r## Changelog Inclusions\r### Additions\rFeature B\r### Deprecated\rOld flag\r",
        "https://gitlab.com/team/app/-/merge_requests/12",
    );
    provider.add_description(
        "13",
        "## Changelog Inclusions\n\n### Fixes\n\nCrash on empty input\n\n## Testing\n\nRan it.\n",
        "https://gitlab.com/team/app/-/merge_requests/13",
    );
    provider
}

#[test]
fn test_changelog_since_latest_version_tag() {
    let (_dir, repo) = setup_repo();
    let provider = provider();
    let assembler = ChangelogAssembler::new(&repo, &provider).unwrap();

    let assembly = assembler.run(None, "1.2.0").unwrap();
    assert_eq!(assembly.boundary.name, "refs/tags/v1.1.0");
    assert_eq!(assembly.request_ids, vec!["13", "12"]);

    let markdown = render_markdown(&assembly.changelog).unwrap();
    let expected = "## 1.2.0\n\
                    \n\
                    ### Additions\n\
                    \n\
                    Feature B\n\
                    [Merge Request #12](https://gitlab.com/team/app/-/merge_requests/12)\n\
                    \n\
                    ### Bugfixes\n\
                    \n\
                    Crash on empty input\n\
                    [Merge Request #13](https://gitlab.com/team/app/-/merge_requests/13)\n\
                    \n\
                    ### Deprecations\n\
                    \n\
                    Old flag\n\
                    [Merge Request #12](https://gitlab.com/team/app/-/merge_requests/12)\n";
    assert_eq!(markdown, expected);
}

#[test]
fn test_changelog_since_explicit_tag() {
    let (_dir, repo) = setup_repo();
    let provider = provider();
    let assembler = ChangelogAssembler::new(&repo, &provider).unwrap();

    let assembly = assembler.run(Some("v1.0.0"), "1.2.0").unwrap();
    assert_eq!(assembly.request_ids, vec!["13", "12", "11"]);
    let additions: Vec<&str> = assembly
        .changelog
        .additions
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(additions, vec!["Feature B\n", "Feature A\n"]);
}

#[test]
fn test_boundary_at_head_is_empty() {
    let (dir, repo) = setup_repo();
    let head = repo.head_oid().unwrap();
    let provider = provider();
    let assembler = ChangelogAssembler::new(&repo, &provider).unwrap();

    let history = repo.history_from(head).unwrap();
    assert_eq!(history.len(), 5);

    let assembly = assembler.run(Some("nightly"), "1.2.0").unwrap();
    assert_eq!(assembly.request_ids, vec!["13", "12"]);

    let raw = Git2Repo::open(dir.path()).unwrap();
    tag(&raw, "v2.0.0", head);
    let assembly = assembler.run(None, "2.0.1").unwrap();
    assert!(assembly.request_ids.is_empty());
    assert_eq!(
        render_markdown(&assembly.changelog).unwrap(),
        "## 2.0.1\n\nNo changelog inclusions found.\n"
    );
}

#[test]
fn test_binary_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_changelog-pr"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("changelog-pr"));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("template"));
}

#[test]
fn test_binary_template() {
    let output = Command::new(env!("CARGO_BIN_EXE_changelog-pr"))
        .arg("template")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("## Changelog Inclusions"));
    assert!(stdout.contains("### Breaking Changes"));
}

#[test]
fn test_binary_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_changelog-pr"))
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("changelog-pr "));
}

#[test]
fn test_generate_requires_release() {
    let output = Command::new(env!("CARGO_BIN_EXE_changelog-pr"))
        .arg("generate")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
