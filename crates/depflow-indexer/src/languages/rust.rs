//! Rust: `mod` declarations and `crate::` / `super::` paths

use super::LanguageStrategy;
use crate::paths::{child, FileIndex};
use depflow_core::{file_name, parent_dir, Language};

import_pattern!(
    USE_PATH,
    r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+((?:crate|super)(?:::\w+)*)(?:::\{([^}]*)\})?"
);
import_pattern!(
    MOD_DECL,
    r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)\s*;"
);

const MOD_PREFIX: &str = "mod:";
const ROOT_FILES: &[&str] = &["mod.rs", "lib.rs", "main.rs"];

pub struct RustStrategy;

/// Directory holding the child modules of `file`: its own directory for
/// `mod.rs`/`lib.rs`/`main.rs`, otherwise a directory named after the file.
fn children_dir(file: &str) -> String {
    let dir = parent_dir(file);
    let name = file_name(file);
    if ROOT_FILES.contains(&name) {
        return dir.to_string();
    }
    let stem = name.strip_suffix(".rs").unwrap_or(name);
    child(dir, stem)
}

/// Nearest ancestor directory of `file` holding a crate root.
fn crate_root(file: &str, files: &FileIndex) -> String {
    let mut dir = parent_dir(file);
    loop {
        if files.contains(&child(dir, "lib.rs")) || files.contains(&child(dir, "main.rs")) {
            return dir.to_string();
        }
        if dir.is_empty() {
            return "src".to_string();
        }
        dir = parent_dir(dir);
    }
}

fn module_file(dir: &str, files: &FileIndex) -> Option<String> {
    if dir.is_empty() {
        return files.get("lib.rs").or_else(|| files.get("main.rs"));
    }
    files
        .get(&format!("{dir}.rs"))
        .or_else(|| ROOT_FILES.iter().find_map(|f| files.get(&child(dir, f))))
}

/// Longest prefix of `segments` under `base` naming a module file. Trailing
/// segments are items (functions, types) inside that module; with no
/// matching prefix they are items of the module at `base` itself.
fn longest_module(base: &str, segments: &[&str], files: &FileIndex) -> Option<String> {
    (1..=segments.len())
        .rev()
        .find_map(|n| {
            let path = child(base, &segments[..n].join("/"));
            files
                .get(&format!("{path}.rs"))
                .or_else(|| files.get(&child(&path, "mod.rs")))
        })
        .or_else(|| module_file(base, files))
}

fn strip_alias(item: &str) -> &str {
    item.split_whitespace().next().unwrap_or(item)
}

impl LanguageStrategy for RustStrategy {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();

        if let Some(re) = USE_PATH.as_ref() {
            for caps in re.captures_iter(content) {
                let Some(path) = caps.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                match caps.get(2) {
                    Some(group) => {
                        let items = group
                            .as_str()
                            .split(',')
                            .map(|item| strip_alias(item.trim()))
                            .filter(|item| !item.is_empty() && *item != "self" && *item != "*");
                        let mut any = false;
                        for item in items {
                            specifiers.push(format!("{path}::{item}"));
                            any = true;
                        }
                        if !any {
                            specifiers.push(path.to_string());
                        }
                    }
                    None => specifiers.push(path.to_string()),
                }
            }
        }

        if let Some(re) = MOD_DECL.as_ref() {
            for caps in re.captures_iter(content) {
                if let Some(name) = caps.get(1) {
                    specifiers.push(format!("{MOD_PREFIX}{}", name.as_str()));
                }
            }
        }

        specifiers
    }

    /// Only `crate::`, `super::` and `mod` forms are extracted.
    fn is_external(&self, _specifier: &str) -> bool {
        false
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if let Some(name) = specifier.strip_prefix(MOD_PREFIX) {
            let path = child(&children_dir(importer), name);
            return files
                .get(&format!("{path}.rs"))
                .or_else(|| files.get(&child(&path, "mod.rs")));
        }

        let mut segments = specifier.split("::");
        match segments.next()? {
            "crate" => {
                let rest: Vec<&str> = segments.collect();
                if rest.is_empty() {
                    return None;
                }
                longest_module(&crate_root(importer, files), &rest, files)
            }
            "super" => {
                let children = children_dir(importer);
                let mut dir = parent_dir(&children).to_string();
                let mut rest: Vec<&str> = segments.collect();
                while rest.first() == Some(&"super") {
                    rest.remove(0);
                    if dir.is_empty() {
                        return None;
                    }
                    dir = parent_dir(&dir).to_string();
                }
                longest_module(&dir, &rest, files)
            }
            _ => None,
        }
    }
}
