//! Presentation metadata for graph nodes: file type, color, line estimate, purpose.
//!
//! Nothing here may feed back into graph structure; it runs after node
//! membership and edges are final.

use crate::model::{file_name, FileType};

/// Rough bytes-per-line ratio used when content was not fetched.
pub const BYTES_PER_LINE: f64 = 30.0;

/// In-degree at which a node is described as a hub.
pub const HUB_IN_DEGREE: usize = 5;

const ENTRY_STEMS: &[&str] = &[
    "index", "main", "app", "__init__", "__main__", "server", "program", "cli",
];
const ENTRY_NAMES: &[&str] = &[
    "lib.rs", "page.tsx", "page.jsx", "page.ts", "page.js", "layout.tsx", "layout.jsx",
    "_app.tsx", "_app.jsx", "_app.js", "_document.tsx", "+page.svelte", "+layout.svelte",
    "manage.py", "wsgi.py", "asgi.py",
];

/// Classify a file path by naming and directory conventions.
pub fn classify_file(path: &str) -> FileType {
    let lower = path.to_ascii_lowercase();
    let name = file_name(&lower);
    let stem = name.split('.').next().unwrap_or(name);
    let segments: Vec<&str> = lower.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];
    let in_dir = |candidates: &[&str]| dirs.iter().any(|d| candidates.contains(d));

    if ENTRY_NAMES.contains(&name) || ENTRY_STEMS.contains(&stem) {
        return FileType::Entry;
    }
    if is_test_path(&lower) {
        return FileType::Test;
    }
    if name.ends_with(".md") || name.ends_with(".mdx") || name.ends_with(".rst") || in_dir(&["docs", "doc"]) {
        return FileType::Docs;
    }
    if is_config_name(name) || in_dir(&["config", "configs", "settings"]) {
        return FileType::Config;
    }
    if in_dir(&["api", "routes", "controllers", "handlers", "endpoints", "router"])
        || ["route", "controller", "handler", "endpoint"].iter().any(|k| stem.contains(k))
    {
        return FileType::Api;
    }
    if in_dir(&["components", "widgets", "views", "pages", "screens", "ui"])
        || name.ends_with(".vue")
        || name.ends_with(".svelte")
        || ((name.ends_with(".tsx") || name.ends_with(".jsx")) && starts_upper(file_name(path)))
    {
        return FileType::Component;
    }
    if in_dir(&["models", "model", "entities", "schemas", "types", "dto"])
        || ["model", "schema", "entity", "types"].iter().any(|k| stem.contains(k))
    {
        return FileType::Model;
    }
    if in_dir(&["services", "service", "store", "stores", "hooks", "providers", "repositories"])
        || ["service", "store", "repository", "provider"].iter().any(|k| stem.contains(k))
    {
        return FileType::Service;
    }
    if in_dir(&["utils", "util", "helpers", "helper", "common", "shared"])
        || ["util", "helper"].iter().any(|k| stem.contains(k))
    {
        return FileType::Util;
    }
    FileType::Source
}

pub fn is_test_path(lower: &str) -> bool {
    let name = file_name(lower);
    lower.split('/').any(|s| matches!(s, "test" | "tests" | "__tests__" | "spec" | "specs"))
        || name.contains(".test.")
        || name.contains(".spec.")
        || name.contains("_test.")
        || name.starts_with("test_")
}

fn is_config_name(name: &str) -> bool {
    name.contains(".config.")
        || name.starts_with("config.")
        || name.starts_with("settings.")
        || name.starts_with("constants.")
        || name.ends_with(".json")
        || name.ends_with(".toml")
        || name.ends_with(".yml")
        || name.ends_with(".yaml")
        || name.starts_with(".env")
}

fn starts_upper(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

pub fn color_for(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Entry => "#f59e0b",
        FileType::Test => "#10b981",
        FileType::Api => "#ef4444",
        FileType::Component => "#3b82f6",
        FileType::Util => "#8b5cf6",
        FileType::Model => "#ec4899",
        FileType::Service => "#06b6d4",
        FileType::Config => "#6b7280",
        FileType::Docs => "#84cc16",
        FileType::Source => "#64748b",
        FileType::Folder => "#94a3b8",
    }
}

fn type_phrase(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Entry => "Application entry point",
        FileType::Test => "Test suite",
        FileType::Api => "API route or request handler",
        FileType::Component => "UI component",
        FileType::Util => "Shared utility helpers",
        FileType::Model => "Data model or type definitions",
        FileType::Service => "Service or state layer",
        FileType::Config => "Configuration",
        FileType::Docs => "Documentation",
        FileType::Source => "Source module",
        FileType::Folder => "Directory",
    }
}

/// Short deterministic description from the file type and final degrees.
pub fn describe_purpose(file_type: FileType, in_degree: usize, out_degree: usize) -> String {
    let base = type_phrase(file_type);
    if in_degree >= HUB_IN_DEGREE {
        format!("{base}; hub imported by {in_degree} files")
    } else if out_degree == 0 && in_degree > 0 {
        format!("{base}; leaf module used by {}", plural(in_degree, "file"))
    } else if in_degree == 0 && out_degree > 0 {
        format!("{base}; top-level consumer of {}", plural(out_degree, "module"))
    } else if in_degree > 0 {
        format!("{base}; imports {out_degree}, imported by {in_degree}")
    } else {
        base.to_string()
    }
}

pub fn describe_folder(file_count: usize) -> String {
    format!("Directory with {}", plural(file_count, "file"))
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Actual line count when content is known, else `max(1, round(size / 30))`.
pub fn estimate_lines(content: Option<&str>, size: Option<u64>) -> u64 {
    match content {
        Some(text) => text.lines().count().max(1) as u64,
        None => {
            let estimate = (size.unwrap_or(0) as f64 / BYTES_PER_LINE).round() as u64;
            estimate.max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_conventions() {
        assert_eq!(classify_file("src/index.ts"), FileType::Entry);
        assert_eq!(classify_file("pkg/__init__.py"), FileType::Entry);
        assert_eq!(classify_file("src/utils/format.test.ts"), FileType::Test);
        assert_eq!(classify_file("tests/test_api.py"), FileType::Test);
        assert_eq!(classify_file("src/api/users.ts"), FileType::Api);
        assert_eq!(classify_file("src/components/Button.tsx"), FileType::Component);
        assert_eq!(classify_file("src/Header.jsx"), FileType::Component);
        assert_eq!(classify_file("src/utils/format.ts"), FileType::Util);
        assert_eq!(classify_file("app/models/user.rb"), FileType::Model);
        assert_eq!(classify_file("src/services/auth.go"), FileType::Service);
        assert_eq!(classify_file("vite.config.ts"), FileType::Config);
        assert_eq!(classify_file("README.md"), FileType::Docs);
        assert_eq!(classify_file("src/parser.rs"), FileType::Source);
    }

    #[test]
    fn test_purpose_degree_clauses() {
        assert_eq!(
            describe_purpose(FileType::Source, 2, 0),
            "Source module; leaf module used by 2 files"
        );
        assert_eq!(
            describe_purpose(FileType::Entry, 0, 1),
            "Application entry point; top-level consumer of 1 module"
        );
        assert_eq!(
            describe_purpose(FileType::Util, 7, 1),
            "Shared utility helpers; hub imported by 7 files"
        );
        assert_eq!(describe_purpose(FileType::Docs, 0, 0), "Documentation");
        assert_eq!(describe_folder(1), "Directory with 1 file");
    }

    #[test]
    fn test_estimate_lines() {
        assert_eq!(estimate_lines(Some("a\nb\nc"), Some(9999)), 3);
        assert_eq!(estimate_lines(Some(""), None), 1);
        assert_eq!(estimate_lines(None, Some(300)), 10);
        assert_eq!(estimate_lines(None, Some(44)), 1);
        assert_eq!(estimate_lines(None, Some(46)), 2);
        assert_eq!(estimate_lines(None, None), 1);
    }
}
