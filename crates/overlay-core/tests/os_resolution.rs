use overlay_common::config::ExtensionEntry;
use overlay_common::vfs::OsVfs;
use overlay_core::{
    ContentReplacement, ExtensionNaming, OverrideResolver, SdkFallback, normalize,
};
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, content: &str) -> anyhow::Result<()> {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, content)?;
    Ok(())
}

#[test]
fn test_resolves_against_real_filesystem() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let project = dir.path();
    write(project, "app/routes.jsx", "// base")?;
    write(
        project,
        "node_modules/@salesforce/extension-that/overrides/pages/sample-page.jsx",
        "// that",
    )?;
    write(
        project,
        "extensions/local/overrides/pages/sample-page.jsx",
        "// local",
    )?;

    let resolver = OverrideResolver::overrides(project, OsVfs)
        .with_extensions(["./extensions/local", "that"]);
    let resolved = resolver.resolve("*/pages/sample-page", &project.join("app/routes.jsx"))?;

    assert_eq!(
        resolved,
        fs::canonicalize(project.join("extensions/local/overrides/pages/sample-page.jsx"))?
    );
    assert_eq!(fs::read_to_string(resolved)?, "// local");
    Ok(())
}

#[test]
fn test_unresolvable_import_reports_candidates() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "app/routes.jsx", "")?;

    let resolver = OverrideResolver::overrides(dir.path(), OsVfs).with_extensions(["that"]);
    let err = resolver
        .resolve("*/pages/missing", &dir.path().join("app/routes.jsx"))
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Module not found"));
    assert!(message.contains("*/pages/missing"));
    Ok(())
}

#[test]
fn test_generated_modules_target_sdk_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let project = dir.path();
    let references = normalize(
        &[ExtensionEntry::name("a"), ExtensionEntry::name("b")],
        project,
        &ExtensionNaming::default(),
    );
    let replacement = ContentReplacement::server_extensions(project, &SdkFallback::default(), &references);

    let server = project.join("node_modules/@salesforce/pwa-kit-react-sdk/ssr/server/extensions.js");
    let source = replacement.replacement_for(&server).expect("server list is mapped");
    let a = source.find("extension-a/setup-server").unwrap();
    let b = source.find("extension-b/setup-server").unwrap();
    assert!(a < b);
    Ok(())
}
