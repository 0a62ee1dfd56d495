use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn deflist() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deflist"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_stdin_to_html() {
    let temp_dir = tempdir().unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .write_stdin("Term\n: - item A\n  - item B\n")
        .assert()
        .success()
        .stdout("<dl>\n<dt>Term</dt>\n<dd>\n<ul>\n<li>item A</li>\n<li>item B</li>\n</ul>\n</dd>\n</dl>\n");
}

#[test]
fn test_json_output() {
    let temp_dir = tempdir().unwrap();
    let output = deflist()
        .current_dir(temp_dir.path())
        .args(["--stdin", "--format", "json"])
        .write_stdin("Term\n: Definition\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["type"], "root");
    assert_eq!(tree["children"][0]["type"], "descriptionlist");
    assert_eq!(tree["children"][0]["data"]["hName"], "dl");
}

#[test]
fn test_json_input_with_source() {
    let temp_dir = tempdir().unwrap();
    let source = "Term\n: - item A\n  - item B\n";
    let source_path = temp_dir.path().join("doc.md");
    fs::write(&source_path, source).unwrap();

    let tree = serde_json::to_string(&deflist_lib::parse(source, deflist_lib::ParseOptions::default())).unwrap();
    let tree_path = temp_dir.path().join("doc.json");
    fs::write(&tree_path, tree).unwrap();

    deflist()
        .current_dir(temp_dir.path())
        .arg("--input-format")
        .arg("json")
        .arg("--source")
        .arg(&source_path)
        .arg(&tree_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("<li>item A</li>\n<li>item B</li>"));
}

#[test]
fn test_multiple_files_in_order_and_output_file() {
    let temp_dir = tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..4 {
        let path = temp_dir.path().join(format!("doc{i}.md"));
        fs::write(&path, format!("Term {i}\n: Definition {i}\n")).unwrap();
        paths.push(path);
    }
    let out = temp_dir.path().join("out.html");

    deflist()
        .current_dir(temp_dir.path())
        .args(&paths)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let html = fs::read_to_string(&out).unwrap();
    let positions: Vec<usize> = (0..4)
        .map(|i| html.find(&format!("<dt>Term {i}</dt>")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{html}");
}

#[test]
fn test_missing_file_is_processing_failure() {
    let temp_dir = tempdir().unwrap();
    let good = temp_dir.path().join("good.md");
    fs::write(&good, "Term\n: Definition\n").unwrap();

    deflist()
        .current_dir(temp_dir.path())
        .arg(&good)
        .arg(temp_dir.path().join("missing.md"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<dt>Term</dt>"))
        .stderr(predicate::str::contains("missing.md"));
}

#[test]
fn test_invalid_json_is_processing_failure() {
    let temp_dir = tempdir().unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .args(["--input-format", "json"])
        .write_stdin("{ not json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("<stdin>"));
}

#[test]
fn test_unknown_pass_is_tool_error() {
    let temp_dir = tempdir().unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .args(["--disable", "reflow"])
        .write_stdin("Term\n: Definition\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown pass 'reflow'"));
}

#[test]
fn test_config_file_is_discovered() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".deflist.toml"),
        "[transform]\ndisable = [\"coalescer\"]\n",
    )
    .unwrap();
    let nested = temp_dir.path().join("docs");
    fs::create_dir(&nested).unwrap();

    let source = "A\n: a\n\nB\n: b\n";
    deflist()
        .current_dir(&nested)
        .write_stdin(source)
        .assert()
        .success()
        .stdout(predicate::str::contains("</dl>\n<dl>"));

    deflist()
        .current_dir(&nested)
        .arg("--no-config")
        .write_stdin(source)
        .assert()
        .success()
        .stdout(predicate::str::contains("</dl>\n<dl>").not());
}

#[test]
fn test_invalid_config_is_tool_error() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".deflist.toml"), "[transform]\nvariant = \"fancy\"\n").unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .write_stdin("Term\n: Definition\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_init_command() {
    let temp_dir = tempdir().unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .deflist.toml"));
    let content = fs::read_to_string(temp_dir.path().join(".deflist.toml")).unwrap();
    assert!(content.contains("[transform]"));

    deflist().current_dir(temp_dir.path()).arg("init").assert().code(2);
    deflist()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_passes_command() {
    deflist()
        .arg("passes")
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-normalizer"))
        .stdout(predicate::str::contains("orphan-absorber"))
        .stdout(predicate::str::is_match(r"coalescer\s+basic, advanced").unwrap());
}

#[test]
fn test_verbose_logs_stages() {
    let temp_dir = tempdir().unwrap();
    deflist()
        .current_dir(temp_dir.path())
        .args(["--verbose", "--variant", "basic"])
        .write_stdin("Term\n: Definition\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Running stages: builder -> detail-merger"));
}
