//! PHP: namespace `use` statements and `require`/`include` paths

use super::{capture_all, matches, LanguageStrategy};
use crate::paths::{child, join, normalize, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(
    USE_NAMESPACE,
    r"(?m)^\s*use\s+(?:function\s+|const\s+)?\\?([A-Za-z_][\w\\]*)"
);
import_pattern!(
    INCLUDE,
    r#"\b(?:require|include)(?:_once)?\s*\(?\s*(?:__DIR__\s*\.\s*)?['"]([^'"\n]+)['"]"#
);

import_pattern!(
    PHP_EXTERNAL,
    r"^(?:Illuminate|Symfony|Doctrine|GuzzleHttp|Psr|Monolog|Carbon|PHPUnit|Laravel|Livewire|Composer|League|Ramsey|Faker|Mockery|Twig|Predis|Aws|Google|Stripe|Sentry)(?:\\|$)"
);

pub struct PhpStrategy;

fn is_path(specifier: &str) -> bool {
    specifier.contains('/') || specifier.ends_with(".php")
}

impl LanguageStrategy for PhpStrategy {
    fn language(&self) -> Language {
        Language::Php
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&USE_NAMESPACE, content, &mut specifiers);
        capture_all(&INCLUDE, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        !is_path(specifier) && matches(&PHP_EXTERNAL, specifier)
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if is_path(specifier) {
            let trimmed = specifier.trim_start_matches('/');
            return join(parent_dir(importer), specifier)
                .and_then(|p| files.get(&p))
                .or_else(|| normalize(trimmed).and_then(|p| files.get(&p)))
                .or_else(|| files.find_suffix(trimmed.trim_start_matches("./")));
        }

        // PSR-4: `App\Http\Kernel` -> `app/Http/Kernel.php` or `src/Http/Kernel.php`
        let base = specifier.replace('\\', "/");
        let file = format!("{base}.php");
        let (head, tail) = base.split_once('/').unwrap_or((base.as_str(), ""));
        let mut candidates = vec![file.clone()];
        if !tail.is_empty() {
            candidates.push(format!("{}/{tail}.php", head.to_lowercase()));
            candidates.push(child("src", &format!("{tail}.php")));
        }
        candidates.push(child("src", &file));

        candidates
            .iter()
            .find_map(|c| files.get(c))
            .or_else(|| files.find_suffix(&file))
            .or_else(|| {
                if tail.is_empty() {
                    None
                } else {
                    files.find_suffix(&format!("{tail}.php"))
                }
            })
    }
}
