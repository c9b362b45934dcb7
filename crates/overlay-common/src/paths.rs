//! Lexical path helpers.
//!
//! None of these touch the filesystem; they only rearrange components.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding normal component.
///
/// A `..` that would climb above the root of an absolute path is dropped;
/// leading `..` components of a relative path are kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Join `tail` onto `base`, treating `tail` as relative even if it carries a
/// leading separator, then clean the result.
///
/// `Path::join` replaces the base when the tail is absolute, which is never
/// what module specifiers mean.
pub fn join_relative(base: &Path, tail: impl AsRef<Path>) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in tail.as_ref().components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {}
            other => joined.push(other),
        }
    }
    clean(&joined)
}

/// Remove the file extension from the last component, if any.
///
/// `/a/b/routes.jsx` becomes `/a/b/routes`; dotfiles are left alone.
pub fn strip_extension(path: &Path) -> PathBuf {
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(_)) => path.with_file_name(stem),
        _ => path.to_path_buf(),
    }
}

/// Split a `/`-separated module specifier into its non-empty segments.
pub fn segments(module_path: &str) -> Vec<&str> {
    module_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Check whether `needle` appears as a contiguous run of whole components
/// inside `haystack`.
pub fn contains_segments(haystack: &Path, needle: &[&str]) -> bool {
    if needle.is_empty() {
        return false;
    }
    let components: Vec<String> = haystack
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    components
        .windows(needle.len())
        .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
}
