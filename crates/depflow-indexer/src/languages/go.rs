//! Go: single and grouped imports, resolved to a file of the package directory

use super::{capture_all, LanguageStrategy};
use crate::paths::{join, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(GROUPED_IMPORT, r"(?s)\bimport\s*\(([^)]*)\)");
import_pattern!(QUOTED, r#""([^"\n]+)""#);
import_pattern!(
    SINGLE_IMPORT,
    r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"\n]+)""#
);

pub struct GoStrategy;

fn is_package_file(path: &str) -> bool {
    path.ends_with(".go") && !path.ends_with("_test.go")
}

impl LanguageStrategy for GoStrategy {
    fn language(&self) -> Language {
        Language::Go
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        if let Some(group) = GROUPED_IMPORT.as_ref() {
            for caps in group.captures_iter(content) {
                if let Some(body) = caps.get(1) {
                    capture_all(&QUOTED, body.as_str(), &mut specifiers);
                }
            }
        }
        capture_all(&SINGLE_IMPORT, content, &mut specifiers);
        specifiers
    }

    /// Standard library paths carry no slash; module paths of this
    /// repository are resolved by suffix, so anything else stays local.
    fn is_external(&self, specifier: &str) -> bool {
        !specifier.starts_with('.') && !specifier.contains('/')
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if specifier.starts_with('.') {
            let dir = join(parent_dir(importer), specifier)?;
            return files.first_in_dir(&dir, is_package_file);
        }

        // `github.com/acme/app/internal/db` lives at `internal/db` when the
        // module root is the repository root; try shorter tails in turn.
        let segments: Vec<&str> = specifier.split('/').collect();
        let skip_host = segments.first().is_some_and(|s| s.contains('.'));
        let start = usize::from(skip_host);
        (start..segments.len()).find_map(|i| {
            let dir = segments[i..].join("/");
            files.first_in_dir(&dir, is_package_file)
        })
    }
}
