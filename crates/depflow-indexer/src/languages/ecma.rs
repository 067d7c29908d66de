//! JavaScript / TypeScript family (also Vue and Svelte single-file components)

use super::{capture_all, LanguageStrategy};
use crate::paths::{child, join, normalize, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(
    STATIC_IMPORT,
    r#"\b(?:import|export)\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s+['"]([^'"\n]+)['"]"#
);
import_pattern!(BARE_IMPORT, r#"\bimport\s+['"]([^'"\n]+)['"]"#);
import_pattern!(DYNAMIC_IMPORT, r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);
import_pattern!(REQUIRE, r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);

const EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "vue", "svelte", "json",
];

pub struct EcmaStrategy;

impl EcmaStrategy {
    fn resolve_base(base: &str, files: &FileIndex) -> Option<String> {
        files
            .get(base)
            .or_else(|| Self::typescript_twin(base, files))
            .or_else(|| files.with_extensions(base, EXTENSIONS))
            .or_else(|| files.first_extension(&child(base, "index"), EXTENSIONS))
    }

    /// ESM TypeScript imports name the emitted `.js` file.
    fn typescript_twin(base: &str, files: &FileIndex) -> Option<String> {
        let (stem, twins): (&str, &[&str]) = if let Some(stem) = base.strip_suffix(".js") {
            (stem, &["ts", "tsx"])
        } else if let Some(stem) = base.strip_suffix(".jsx") {
            (stem, &["tsx"])
        } else if let Some(stem) = base.strip_suffix(".mjs") {
            (stem, &["mts"])
        } else {
            return None;
        };
        files.first_extension(stem, twins)
    }
}

impl LanguageStrategy for EcmaStrategy {
    fn language(&self) -> Language {
        Language::EcmaScript
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&STATIC_IMPORT, content, &mut specifiers);
        capture_all(&BARE_IMPORT, content, &mut specifiers);
        capture_all(&DYNAMIC_IMPORT, content, &mut specifiers);
        capture_all(&REQUIRE, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        !(specifier.starts_with('.') || specifier.starts_with("@/") || specifier.starts_with("~/"))
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        // bundler query strings such as `?raw` are not part of the path
        let specifier = specifier.split(['?', '#']).next().unwrap_or(specifier);

        let bases: Vec<String> = match specifier
            .strip_prefix("@/")
            .or_else(|| specifier.strip_prefix("~/"))
        {
            Some(rest) => [normalize(rest), normalize(&child("src", rest))]
                .into_iter()
                .flatten()
                .collect(),
            None => join(parent_dir(importer), specifier).into_iter().collect(),
        };

        bases.iter().find_map(|base| Self::resolve_base(base, files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_forms() {
        let code = r#"
import React, { useState } from 'react';
import type { Props } from "./types";
import {
  a,
  b as c,
} from './multi';
import * as utils from '../utils';
export { thing } from './reexport';
import './styles.css';
const lazy = () => import('./pages/Lazy');
const fs = require("fs");
export const x = 1;
"#;
        insta::assert_debug_snapshot!(EcmaStrategy.extract(code), @r###"
        [
            "react",
            "./types",
            "./multi",
            "../utils",
            "./reexport",
            "./styles.css",
            "./pages/Lazy",
            "fs",
        ]
        "###);
    }

    #[test]
    fn test_external_classification() {
        assert!(EcmaStrategy.is_external("react"));
        assert!(EcmaStrategy.is_external("@scope/pkg"));
        assert!(!EcmaStrategy.is_external("./local"));
        assert!(!EcmaStrategy.is_external("../up"));
        assert!(!EcmaStrategy.is_external("@/components/Button"));
        assert!(!EcmaStrategy.is_external("~/lib/db"));
    }

    #[test]
    fn test_resolve_variants() {
        let files = FileIndex::from_paths(&[
            "src/a.ts",
            "src/b.ts",
            "src/components/index.tsx",
            "src/components/Button.vue",
            "src/lib/db.ts",
            "src/esm.ts",
            "data/config.json",
        ]);
        let s = EcmaStrategy;
        assert_eq!(s.resolve("./b", "src/a.ts", &files).as_deref(), Some("src/b.ts"));
        assert_eq!(s.resolve("./components", "src/a.ts", &files).as_deref(), Some("src/components/index.tsx"));
        assert_eq!(s.resolve("./components/Button.vue", "src/a.ts", &files).as_deref(), Some("src/components/Button.vue"));
        assert_eq!(s.resolve("@/lib/db", "src/a.ts", &files).as_deref(), Some("src/lib/db.ts"));
        assert_eq!(s.resolve("~/lib/db", "src/a.ts", &files).as_deref(), Some("src/lib/db.ts"));
        assert_eq!(s.resolve("./esm.js", "src/a.ts", &files).as_deref(), Some("src/esm.ts"));
        assert_eq!(s.resolve("../data/config.json?raw", "src/a.ts", &files).as_deref(), Some("data/config.json"));
        assert_eq!(s.resolve("./missing", "src/a.ts", &files), None);
        assert_eq!(s.resolve("../../../escape", "src/a.ts", &files), None);
    }
}
