//! Integration tests for `importfix alias`.

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

#[test]
fn test_alias_converts_relative_imports() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(
        root,
        "importfix.json",
        r#"{
            // hooks first, then the catch-all
            "aliases": [
                { "prefix": "@/", "dir": "" },
                { "prefix": "@/hooks/", "dir": "hooks/" },
            ]
        }"#,
    );
    write(
        root,
        "src/pages/home.ts",
        "import { useAuth } from '../../hooks/useAuth';\nimport { Button } from '../components/Button';\n",
    );
    write(root, "hooks/useAuth.ts", "");
    write(root, "src/components/Button.tsx", "");

    let output = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .arg("alias")
        .output()
        .expect("Failed to run alias command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["command"], "alias");
    assert_eq!(json["summary"]["files_changed"].as_u64(), Some(1));
    assert_eq!(
        fs::read_to_string(root.join("src/pages/home.ts")).unwrap(),
        "import { useAuth } from '@/hooks/useAuth';\nimport { Button } from '@/src/components/Button';\n"
    );
}

#[test]
fn test_alias_without_table_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(root, "src/app.ts", "import './b';\n");
    write(root, "src/b.ts", "");

    let output = cargo_bin()
        .args(["--json", "--cwd"])
        .arg(root)
        .arg("alias")
        .output()
        .expect("Failed to run alias command");

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["error"]["code"], "ALIAS_TABLE_MISSING");
}
