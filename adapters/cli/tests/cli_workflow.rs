use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "terrain-route-cli-{name}-{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch directory");
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_terrain-route"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("failed to run terrain-route")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn new_map_finds_route_along_left_edge() {
    let dir = workspace("find");
    let _ = stdout(&run(&dir, &["new", "--size", "3", "--output", "map.json"]));

    let text = stdout(&run(&dir, &["find", "map.json"]));
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines[0], "Path found!");
    assert!(lines.contains(&"Steps: 5"));
    assert!(lines.contains(&"Total Cost: 8.0"));
    assert!(lines.contains(&"Risk Level: Safe"));
    assert!(text.ends_with("S..\n*..\n**G\n"), "unexpected output:\n{text}");
}

#[test]
fn edits_report_each_outcome_and_persist() {
    let dir = workspace("edit");
    let _ = stdout(&run(&dir, &["new", "--size", "3", "--output", "map.json"]));

    let text = stdout(&run(
        &dir,
        &[
            "edit",
            "map.json",
            "--paint",
            "0,0=road",
            "--paint",
            "1,0=water",
            "--goal",
            "1,0",
        ],
    ));

    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Cannot change terrain of Start cell.",
            "Painted (1,0) as water.",
            "Cannot place Goal on water.",
        ]
    );
    let shown = stdout(&run(&dir, &["show", "map.json"]));
    assert_eq!(shown, "S..\n~..\n..G\n");
}

#[test]
fn configuration_can_hide_the_grid() {
    let dir = workspace("config");
    fs::write(dir.join("terrain-route.toml"), "[render]\nshow_grid = false\n")
        .expect("write config");
    let _ = stdout(&run(&dir, &["new", "--size", "3", "--output", "map.json"]));

    let text = stdout(&run(&dir, &["find", "map.json"]));

    assert!(text.starts_with("Path found!"));
    assert!(!text.contains("**G"));
}

#[test]
fn blocked_goal_reports_no_path() {
    let dir = workspace("blocked");
    let _ = stdout(&run(&dir, &["new", "--size", "3", "--output", "map.json"]));
    let _ = stdout(&run(
        &dir,
        &["edit", "map.json", "--paint", "1,2=water", "--paint", "2,1=water"],
    ));

    let text = stdout(&run(&dir, &["find", "map.json", "--no-grid"]));

    assert_eq!(text, "No path found. (Blocked terrain or isolated goal)\n");
}

#[test]
fn unreadable_map_fails() {
    let dir = workspace("missing");

    let output = run(&dir, &["show", "absent.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}
