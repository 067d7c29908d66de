//! Dart: `import`, `export` and `part` directives

use super::{capture_all, LanguageStrategy};
use crate::paths::{child, join, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(
    DIRECTIVE,
    r#"(?m)^\s*(?:import|export|part)\s+['"]([^'"\n]+)['"]"#
);

pub struct DartStrategy;

impl LanguageStrategy for DartStrategy {
    fn language(&self) -> Language {
        Language::Dart
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&DIRECTIVE, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        specifier.starts_with("dart:")
            || specifier.starts_with("package:flutter/")
            || specifier.starts_with("package:flutter_test/")
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if let Some(package) = specifier.strip_prefix("package:") {
            // `package:name/rest` maps to `lib/rest` of the package
            let (_, rest) = package.split_once('/')?;
            return files
                .get(&child("lib", rest))
                .or_else(|| files.find_suffix(&child("lib", rest)));
        }
        join(parent_dir(importer), specifier).and_then(|p| files.get(&p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract() {
        let code = "import 'package:flutter/material.dart';\nimport 'package:app/src/api.dart' as api;\nexport \"widgets/button.dart\";\npart 'state.g.dart';\n";
        assert_eq!(
            DartStrategy.extract(code),
            vec![
                "package:flutter/material.dart",
                "package:app/src/api.dart",
                "widgets/button.dart",
                "state.g.dart",
            ]
        );
    }

    #[test]
    fn test_external() {
        assert!(DartStrategy.is_external("dart:async"));
        assert!(DartStrategy.is_external("package:flutter/material.dart"));
        assert!(!DartStrategy.is_external("package:flutter_app/main.dart"));
        assert!(!DartStrategy.is_external("widgets/button.dart"));
    }

    #[test]
    fn test_resolve() {
        let files = FileIndex::from_paths(&[
            "lib/main.dart",
            "lib/src/api.dart",
            "lib/widgets/button.dart",
            "packages/core/lib/model.dart",
        ]);
        let s = DartStrategy;
        assert_eq!(s.resolve("package:app/src/api.dart", "lib/main.dart", &files).as_deref(), Some("lib/src/api.dart"));
        assert_eq!(s.resolve("package:core/model.dart", "lib/main.dart", &files).as_deref(), Some("packages/core/lib/model.dart"));
        assert_eq!(s.resolve("widgets/button.dart", "lib/main.dart", &files).as_deref(), Some("lib/widgets/button.dart"));
        assert_eq!(s.resolve("../outside.dart", "lib/main.dart", &files), None);
    }
}
