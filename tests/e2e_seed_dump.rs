use serde_json::Value;
use tempfile::TempDir;

mod common;

#[test]
fn e2e_seed_then_dump() {
    let data_dir = TempDir::new().expect("temp dir");

    let seeded = common::run_ok(
        common::base_cmd(&data_dir)
            .arg("seed")
            .arg("--posts")
            .arg("2")
            .arg("--projects")
            .arg("1")
            .arg("--author")
            .arg("ada"),
    );
    let post_ids: Vec<&str> = seeded
        .lines()
        .filter_map(|line| line.strip_prefix("post "))
        .collect();
    assert_eq!(post_ids.len(), 2);

    let dumped = common::run_ok(common::base_cmd(&data_dir).arg("dump").arg("posts"));
    let posts: Vec<Value> = dumped
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], post_ids[0]);
    assert_eq!(posts[1]["id"], post_ids[1]);
    assert_eq!(posts[0]["author"], "ada");

    let projects = common::run_ok(common::base_cmd(&data_dir).arg("dump").arg("projects"));
    assert_eq!(projects.lines().count(), 1);
}

#[test]
fn e2e_reset_clears_previous_data() {
    let data_dir = TempDir::new().expect("temp dir");

    common::run_ok(common::base_cmd(&data_dir).arg("seed"));
    let dumped = common::run_ok(
        common::base_cmd(&data_dir)
            .arg("--reset")
            .arg("dump")
            .arg("posts"),
    );
    assert!(dumped.is_empty());
}
