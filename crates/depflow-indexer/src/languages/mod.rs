//! Per-language import strategies
//!
//! Each strategy pulls raw specifiers out of file text with regular
//! expressions, decides which specifiers name external (standard library or
//! third-party) code, and resolves the rest to files of the repository.
//! The scan is textual: matches inside comments and string literals are not
//! excluded. That trades precision for speed and breadth across languages.

use crate::paths::FileIndex;
use depflow_core::Language;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

macro_rules! import_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: std::sync::LazyLock<Option<regex::Regex>> =
            std::sync::LazyLock::new(|| regex::Regex::new($regex_str).ok());
    };
}

pub mod c;
pub mod csharp;
pub mod dart;
pub mod ecma;
pub mod go;
pub mod jvm;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod swift;

/// Extract, classify and resolve for one language.
pub trait LanguageStrategy: Send + Sync {
    fn language(&self) -> Language;

    /// Raw specifiers in match order, duplicates preserved.
    fn extract(&self, content: &str) -> Vec<String>;

    /// True when the specifier names standard-library or third-party code.
    fn is_external(&self, specifier: &str) -> bool;

    /// Resolve a non-external specifier to a file of `files`, or `None`.
    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String>;
}

/// Push capture group 1 of every match, trimmed.
pub(crate) fn capture_all(pattern: &LazyLock<Option<Regex>>, text: &str, out: &mut Vec<String>) {
    let Some(re) = pattern.as_ref() else { return };
    for caps in re.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let value = m.as_str().trim();
            if !value.is_empty() {
                out.push(value.to_string());
            }
        }
    }
}

/// Whether `specifier` matches an allow-list pattern. A pattern that failed
/// to compile matches nothing.
pub(crate) fn matches(pattern: &LazyLock<Option<Regex>>, specifier: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(specifier))
}

/// Language to strategy map. New languages register without touching the others.
pub struct StrategyRegistry {
    strategies: HashMap<Language, Box<dyn LanguageStrategy>>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn LanguageStrategy>) {
        self.strategies.insert(strategy.language(), strategy);
    }

    pub fn get(&self, language: Language) -> Option<&dyn LanguageStrategy> {
        self.strategies.get(&language).map(|s| s.as_ref())
    }

    /// Get the strategy for a file based on its extension
    pub fn for_path(&self, path: &str) -> Option<&dyn LanguageStrategy> {
        self.get(Language::from_path(path))
    }

    /// Unknown languages are never external; they are never analyzed either.
    pub fn is_external(&self, specifier: &str, language: Language) -> bool {
        self.get(language).is_some_and(|s| s.is_external(specifier))
    }

    pub fn resolve(
        &self,
        specifier: &str,
        importer: &str,
        language: Language,
        files: &FileIndex,
    ) -> Option<String> {
        self.get(language)?.resolve(specifier, importer, files)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ecma::EcmaStrategy));
        registry.register(Box::new(jvm::JvmStrategy::new(Language::Java)));
        registry.register(Box::new(jvm::JvmStrategy::new(Language::Kotlin)));
        registry.register(Box::new(jvm::JvmStrategy::new(Language::Scala)));
        registry.register(Box::new(python::PythonStrategy));
        registry.register(Box::new(go::GoStrategy));
        registry.register(Box::new(ruby::RubyStrategy));
        registry.register(Box::new(rust::RustStrategy));
        registry.register(Box::new(swift::SwiftStrategy));
        registry.register(Box::new(c::CStrategy));
        registry.register(Box::new(php::PhpStrategy));
        registry.register(Box::new(dart::DartStrategy));
        registry.register(Box::new(csharp::CSharpStrategy));
        registry
    }
}
