//! End-to-end tests running the `overlay` binary against a scratch project.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn overlay(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_overlay"))
        .current_dir(project)
        .env_remove("OVERLAY_LOG")
        .args(args)
        .output()
        .expect("failed to run overlay")
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "overlay.toml",
        r#"
[app]
extensions = ["this", ["that", { theme = "dark" }], false]
"#,
    );
    write(root, "app/routes.jsx", "// base");
    for short in ["this", "that"] {
        write(
            root,
            &format!("node_modules/@salesforce/extension-{short}/overrides/pages/home.jsx"),
            &format!("// {short}"),
        );
    }
    dir
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_extensions_lists_configured_order() {
    let dir = project();
    let output = overlay(dir.path(), &["extensions", "--json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let extensions = json["data"]["extensions"].as_array().unwrap();
    assert_eq!(extensions.len(), 2);
    assert_eq!(extensions[0]["identifier"], "@salesforce/extension-this");
    assert_eq!(extensions[1]["identifier"], "@salesforce/extension-that");
    assert_eq!(extensions[1]["config"]["theme"], "dark");
}

#[test]
fn test_resolve_prefers_first_configured_extension() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &["resolve", "*/pages/home", "--from", "app/routes.jsx", "--json"],
    );
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    let resolved = json["data"]["resolved"].as_str().unwrap();
    assert_eq!(fs::read_to_string(resolved).unwrap(), "// this");
}

#[test]
fn test_resolve_failure_exits_non_zero() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &["resolve", "*/pages/missing", "--from", "app/routes.jsx"],
    );
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Module not found"));
    assert!(stderr.contains("tried"));
}

#[test]
fn test_non_wildcard_import_passes_through() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &["resolve", "./pages/home", "--from", "app/routes.jsx", "--json"],
    );
    assert!(output.status.success());
    assert!(stdout_json(&output)["data"]["resolved"].is_null());
}

#[test]
fn test_candidates_in_probe_order() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &["candidates", "*/pages/home", "--from", "app/routes.jsx", "--json"],
    );
    assert!(output.status.success());

    let json = stdout_json(&output);
    let entries = json["data"]["entries"].as_array().unwrap();
    // project, 2 extensions x (overrides, src, root), sdk
    assert_eq!(entries.len(), 8);
    assert_eq!(entries[0]["origin"]["kind"], "project");
    assert_eq!(entries[5]["origin"]["kind"], "sdk");
}

#[test]
fn test_generate_writes_into_output_dir() {
    let dir = project();
    let output = overlay(dir.path(), &["generate", "--output", "out"]);
    assert!(output.status.success());

    let server = fs::read_to_string(dir.path().join("out/ssr/server/extensions.js")).unwrap();
    let this = server.find("extension-this/setup-server").unwrap();
    let that = server.find("extension-that/setup-server").unwrap();
    assert!(this < that);
    assert!(dir.path().join("out/ssr/universal/extensions.js").is_file());
}

#[test]
fn test_override_chains_to_next_extension() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &[
            "resolve",
            "*/pages/home",
            "--from",
            "node_modules/@salesforce/extension-that/overrides/pages/home.jsx",
            "--json",
        ],
    );
    assert!(output.status.success());

    let resolved = stdout_json(&output)["data"]["resolved"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(fs::read_to_string(resolved).unwrap(), "// this");
}

#[test]
fn test_generate_prints_each_module_once() {
    let dir = project();
    let output = overlay(dir.path(), &["generate"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("// Generated extension list").count(), 2);
}

#[test]
fn test_unhandled_import_reports_json_failure() {
    let dir = project();
    let output = overlay(
        dir.path(),
        &["candidates", "./pages/home", "--from", "app/routes.jsx", "--json"],
    );
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("not handled"));
}
