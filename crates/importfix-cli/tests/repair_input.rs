//! Integration tests for `importfix repair`.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "importfix-cli", "--bin", "importfix", "--"]);
    cmd
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn project(root: &Path) {
    write(root, "package.json", "{}");
    write(root, "src/app.ts", "import { sum } from './utils';\n");
    write(root, "src/other.ts", "import { sum } from './utils';\n");
    write(root, "src/lib/utils.ts", "export const sum = 1;\n");
}

const DIAGNOSTICS: &str = "\
✘ [ERROR] Could not resolve \"./utils\" from \"src/app.ts\"
    src/app.ts:1:20:
Could not resolve something unexpected
";

#[test]
fn test_repair_fixes_only_reported_imports() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);
    write(root, "build.log", DIAGNOSTICS);

    let output = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .args(["repair", "--input", "build.log"])
        .output()
        .expect("Failed to run repair command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["command"], "repair");
    assert_eq!(json["summary"]["fixed"].as_u64(), Some(1));
    assert_eq!(json["summary"]["malformed_lines"].as_u64(), Some(1));
    assert_eq!(
        fs::read_to_string(root.join("src/app.ts")).unwrap(),
        "import { sum } from './lib/utils';\n"
    );
    // Not reported, so not touched
    assert_eq!(
        fs::read_to_string(root.join("src/other.ts")).unwrap(),
        "import { sum } from './utils';\n"
    );
}

#[test]
fn test_repair_reads_stdin() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);

    let mut child = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .args(["repair", "--dry-run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn repair command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(DIAGNOSTICS.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["findings"][0]["replacement"], "./lib/utils");
    assert_eq!(
        fs::read_to_string(root.join("src/app.ts")).unwrap(),
        "import { sum } from './utils';\n"
    );
}

#[test]
fn test_repair_missing_input_is_an_error() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    project(root);

    let output = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .args(["repair", "--input", "missing.log"])
        .output()
        .expect("Failed to run repair command");

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["error"]["code"], "IO");
}
