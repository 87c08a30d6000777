//! Integration tests for `importfix fix`.

use std::fs;
use std::path::Path;
use std::process::Command;
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

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn run_fix(root: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .arg("fix")
        .args(extra)
        .output()
        .expect("Failed to run fix command");

    assert!(output.status.success(), "fix should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

fn moved_project(root: &Path) {
    write(root, "package.json", "{}");
    write(
        root,
        "src/pages/home.tsx",
        "import { format } from '../utils/format';\nimport React from 'react';\n",
    );
    write(root, "src/lib/format.ts", "export const format = 1;\n");
}

#[test]
fn test_fix_rewrites_moved_import() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    moved_project(root);

    let json = run_fix(root, &[]);

    assert_eq!(json["command"], "fix");
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["summary"]["fixed"].as_u64(), Some(1));
    assert_eq!(json["summary"]["files_changed"].as_u64(), Some(1));
    assert_eq!(json["findings"][0]["replacement"], "../lib/format");
    assert_eq!(
        read(root, "src/pages/home.tsx"),
        "import { format } from '../lib/format';\nimport React from 'react';\n"
    );
}

#[test]
fn test_fix_is_idempotent() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    moved_project(root);

    run_fix(root, &[]);
    let after_first = read(root, "src/pages/home.tsx");
    let json = run_fix(root, &[]);

    assert_eq!(json["summary"]["fixed"].as_u64(), Some(0));
    assert_eq!(json["summary"]["files_changed"].as_u64(), Some(0));
    assert_eq!(read(root, "src/pages/home.tsx"), after_first);
}

#[test]
fn test_fix_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    moved_project(root);

    let json = run_fix(root, &["--dry-run"]);

    assert_eq!(json["dry_run"], true);
    assert_eq!(json["summary"]["fixed"].as_u64(), Some(1));
    assert_eq!(json["summary"]["files_changed"].as_u64(), Some(1));
    assert_eq!(
        read(root, "src/pages/home.tsx"),
        "import { format } from '../utils/format';\nimport React from 'react';\n"
    );
}

#[test]
fn test_fix_leaves_ambiguous_import_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(root, "src/app.ts", "import { h } from './helpers';\n");
    write(root, "src/a/helpers.ts", "");
    write(root, "src/b/helpers.ts", "");

    let json = run_fix(root, &[]);

    assert_eq!(json["summary"]["ambiguous"].as_u64(), Some(1));
    assert_eq!(json["summary"]["files_changed"].as_u64(), Some(0));
    let finding = &json["findings"][0];
    assert_eq!(finding["outcome"], "ambiguous");
    assert_eq!(finding["candidates"][0], "src/a/helpers.ts");
    assert_eq!(finding["candidates"][1], "src/b/helpers.ts");
    assert_eq!(read(root, "src/app.ts"), "import { h } from './helpers';\n");
}

#[test]
fn test_fix_quotes_unquoted_specifier() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(root, "src/app.ts", "import { x } from ./lib/x;\n");
    write(root, "src/lib/x.ts", "export const x = 1;\n");

    let json = run_fix(root, &[]);

    assert_eq!(json["findings"][0]["kind"], "syntax");
    assert_eq!(json["findings"][0]["outcome"], "fixed");
    assert_eq!(read(root, "src/app.ts"), "import { x } from './lib/x';\n");
}

#[test]
fn test_fix_uses_rename_table_when_candidates_are_ambiguous() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(
        root,
        "importfix.json",
        r#"{ "renames": [{ "from": "tipos", "to": "types" }] }"#,
    );
    write(root, "src/app.ts", "import type { User } from './tipos/user';\n");
    write(root, "src/types/user.ts", "export type User = {};\n");
    write(root, "src/admin/user.ts", "export type User = {};\n");

    let json = run_fix(root, &[]);

    assert_eq!(json["summary"]["fixed"].as_u64(), Some(1));
    assert_eq!(
        read(root, "src/app.ts"),
        "import type { User } from './types/user';\n"
    );
}
