//! C, C++ and Objective-C: quoted `#include` / `#import` directives

use super::{capture_all, LanguageStrategy};
use crate::paths::{child, join, normalize, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(INCLUDE, r#"(?m)^\s*#\s*(?:include|import)\s+"([^"\n]+)""#);

const INCLUDE_DIRS: &[&str] = &["", "include", "src"];

pub struct CStrategy;

impl LanguageStrategy for CStrategy {
    fn language(&self) -> Language {
        Language::CFamily
    }

    /// Angle-bracket includes are system headers and never extracted.
    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&INCLUDE, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, _specifier: &str) -> bool {
        false
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if let Some(hit) = join(parent_dir(importer), specifier).and_then(|p| files.get(&p)) {
            return Some(hit);
        }
        if let Some(hit) = INCLUDE_DIRS
            .iter()
            .filter_map(|dir| normalize(&child(dir, specifier)))
            .find_map(|p| files.get(&p))
        {
            return Some(hit);
        }
        let bare = specifier
            .split('/')
            .skip_while(|s| *s == "." || *s == "..")
            .collect::<Vec<_>>()
            .join("/");
        files.find_suffix(&bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted_only() {
        let code = "#include <stdio.h>\n#include \"util.h\"\n  # include \"../core/engine.hpp\"\n#import \"AppDelegate.h\"\n";
        assert_eq!(CStrategy.extract(code), vec!["util.h", "../core/engine.hpp", "AppDelegate.h"]);
    }

    #[test]
    fn test_resolve() {
        let files = FileIndex::from_paths(&[
            "src/main.c",
            "src/util.h",
            "include/api/public.h",
            "lib/core/engine.hpp",
        ]);
        let s = CStrategy;
        assert_eq!(s.resolve("util.h", "src/main.c", &files).as_deref(), Some("src/util.h"));
        assert_eq!(s.resolve("api/public.h", "src/main.c", &files).as_deref(), Some("include/api/public.h"));
        assert_eq!(s.resolve("../core/engine.hpp", "src/main.c", &files).as_deref(), Some("lib/core/engine.hpp"));
        assert_eq!(s.resolve("missing.h", "src/main.c", &files), None);
    }
}
