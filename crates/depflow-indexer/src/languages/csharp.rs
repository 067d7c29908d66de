//! C#: `using` namespace directives

use super::{capture_all, matches, LanguageStrategy};
use crate::paths::FileIndex;
use depflow_core::Language;

import_pattern!(
    USING,
    r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?([A-Za-z_][\w.]*)\s*;"
);

import_pattern!(
    DOTNET_EXTERNAL,
    r"^(?:System|Microsoft|Windows|Newtonsoft|NUnit|Xunit|Moq|AutoMapper|MediatR|Serilog|FluentValidation|Dapper|Polly|UnityEngine|UnityEditor|Unity|Godot)(?:\.|$)"
);

pub struct CSharpStrategy;

impl LanguageStrategy for CSharpStrategy {
    fn language(&self) -> Language {
        Language::CSharp
    }

    /// Alias directives (`using X = Y;`) do not match.
    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&USING, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        matches(&DOTNET_EXTERNAL, specifier)
    }

    /// Namespaces rarely map to one file; take the first file whose path
    /// ends with the namespace as directories, with and without its root.
    fn resolve(&self, specifier: &str, _importer: &str, files: &FileIndex) -> Option<String> {
        let base = specifier.replace('.', "/");
        files.find_suffix(&format!("{base}.cs")).or_else(|| {
            let (_, rest) = base.split_once('/')?;
            files.find_suffix(&format!("{rest}.cs"))
        })
    }
}
