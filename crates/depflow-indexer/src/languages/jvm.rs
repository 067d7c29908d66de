//! Java, Kotlin and Scala: dotted package-qualified imports

use super::{capture_all, matches, LanguageStrategy};
use crate::paths::FileIndex;
use depflow_core::Language;

import_pattern!(JAVA_IMPORT, r"(?m)^\s*import\s+(?:static\s+)?([A-Za-z_][\w.]*)");
import_pattern!(SCALA_IMPORT, r"(?m)^\s*import\s+([A-Za-z_][\w.]*)");

import_pattern!(
    JAVA_EXTERNAL,
    r"^(?:java|javax|jakarta|jdk|sun|com\.sun|android|androidx|dalvik|kotlin|kotlinx|org\.junit|org\.mockito|org\.springframework|org\.apache|org\.slf4j|org\.hibernate|com\.google|com\.fasterxml|io\.reactivex|reactor|lombok)(?:\.|$)"
);
import_pattern!(
    KOTLIN_EXTERNAL,
    r"^(?:java|javax|jakarta|android|androidx|kotlin|kotlinx|org\.jetbrains|org\.junit|org\.mockito|org\.springframework|com\.google|io\.ktor|okhttp3|retrofit2|dagger|coil|io\.mockk)(?:\.|$)"
);
import_pattern!(
    SCALA_EXTERNAL,
    r"^(?:scala|java|javax|akka|cats|zio|org\.apache|play|sbt|io\.circe|com\.typesafe|org\.scalatest|munit|fs2|doobie|slick)(?:\.|$)"
);

const SOURCE_ROOTS: &[&str] = &[
    "",
    "src/main/java/",
    "src/main/kotlin/",
    "src/main/scala/",
    "src/",
    "app/",
];

pub struct JvmStrategy {
    language: Language,
}

impl JvmStrategy {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.language {
            Language::Kotlin => &["kt", "java"],
            Language::Scala => &["scala", "java"],
            _ => &["java", "kt"],
        }
    }

    fn resolve_qualified(&self, qualified: &str, files: &FileIndex) -> Option<String> {
        let base = qualified.replace('.', "/");
        let extensions = self.extensions();
        SOURCE_ROOTS
            .iter()
            .find_map(|root| files.first_extension(&format!("{root}{base}"), extensions))
            .or_else(|| {
                extensions
                    .iter()
                    .find_map(|ext| files.find_suffix(&format!("{base}.{ext}")))
            })
    }
}

fn starts_upper(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

impl LanguageStrategy for JvmStrategy {
    fn language(&self) -> Language {
        self.language
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut raw = Vec::new();
        match self.language {
            Language::Scala => capture_all(&SCALA_IMPORT, content, &mut raw),
            _ => capture_all(&JAVA_IMPORT, content, &mut raw),
        }
        raw.into_iter()
            .map(|s| {
                let s = s.trim_end_matches('.');
                s.strip_suffix("._").unwrap_or(s).to_string()
            })
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn is_external(&self, specifier: &str) -> bool {
        match self.language {
            Language::Kotlin => matches(&KOTLIN_EXTERNAL, specifier),
            Language::Scala => matches(&SCALA_EXTERNAL, specifier),
            _ => matches(&JAVA_EXTERNAL, specifier),
        }
    }

    fn resolve(&self, specifier: &str, _importer: &str, files: &FileIndex) -> Option<String> {
        if let Some(hit) = self.resolve_qualified(specifier, files) {
            return Some(hit);
        }
        // static member import: `a.b.Type.member` lives in `a/b/Type`
        let (owner, member) = specifier.rsplit_once('.')?;
        let owner_name = owner.rsplit('.').next().unwrap_or(owner);
        if starts_upper(owner_name) && !starts_upper(member) {
            return self.resolve_qualified(owner, files);
        }
        None
    }
}
