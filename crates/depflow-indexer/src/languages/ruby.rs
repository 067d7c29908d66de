//! Ruby: `require` and `require_relative`

use super::{matches, LanguageStrategy};
use crate::paths::{join, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(
    REQUIRE,
    r#"(?m)^\s*(require|require_relative)\s*\(?\s*['"]([^'"\n]+)['"]"#
);

import_pattern!(
    RUBY_EXTERNAL,
    r"^(?:rails|active_record|active_support|action_controller|action_view|json|yaml|set|date|time|fileutils|pathname|securerandom|net/http|uri|open-uri|logger|erb|csv|digest|base64|optparse|ostruct|benchmark|tempfile|bundler|rake|rspec|minitest|sinatra|nokogiri|redis|sidekiq|devise|pg|mysql2|sqlite3|faraday|httparty|dotenv|pry|byebug|thor|zeitwerk)(?:/|$)"
);

const RELATIVE_PREFIX: &str = "relative:";

pub struct RubyStrategy;

fn with_rb(path: &str) -> String {
    if path.ends_with(".rb") {
        path.to_string()
    } else {
        format!("{path}.rb")
    }
}

impl LanguageStrategy for RubyStrategy {
    fn language(&self) -> Language {
        Language::Ruby
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let Some(re) = REQUIRE.as_ref() else {
            return Vec::new();
        };
        re.captures_iter(content)
            .filter_map(|caps| {
                let target = caps.get(2)?.as_str().trim();
                match caps.get(1)?.as_str() {
                    "require_relative" => Some(format!("{RELATIVE_PREFIX}{target}")),
                    _ => Some(target.to_string()),
                }
            })
            .collect()
    }

    fn is_external(&self, specifier: &str) -> bool {
        !specifier.starts_with(RELATIVE_PREFIX)
            && !specifier.starts_with('.')
            && matches(&RUBY_EXTERNAL, specifier)
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if let Some(target) = specifier.strip_prefix(RELATIVE_PREFIX) {
            return join(parent_dir(importer), &with_rb(target)).and_then(|p| files.get(&p));
        }
        if specifier.starts_with('.') {
            return join(parent_dir(importer), &with_rb(specifier)).and_then(|p| files.get(&p));
        }
        let file = with_rb(specifier);
        ["lib/", "", "app/"]
            .iter()
            .find_map(|root| files.get(&format!("{root}{file}")))
            .or_else(|| files.find_suffix(&file))
    }
}
