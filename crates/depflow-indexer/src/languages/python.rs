//! Python: `from x import y` and `import x`, absolute and relative

use super::{matches, LanguageStrategy};
use crate::paths::{child, FileIndex};
use depflow_core::{parent_dir, Language};

import_pattern!(
    FROM_IMPORT,
    r"(?m)^from\s+(\.*[\w.]*)\s+import\s+(\([^)]*\)|[^\n#]+)"
);
import_pattern!(
    PLAIN_IMPORT,
    r"(?m)^import\s+([\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)"
);

import_pattern!(
    PYTHON_EXTERNAL,
    r"^(?:os|sys|re|json|math|time|datetime|typing|collections|itertools|functools|pathlib|subprocess|logging|asyncio|abc|dataclasses|enum|io|unittest|copy|hashlib|uuid|argparse|threading|multiprocessing|socket|shutil|tempfile|glob|pickle|csv|string|textwrap|warnings|contextlib|inspect|traceback|base64|http|urllib|email|xml|sqlite3|struct|queue|heapq|bisect|operator|decimal|fractions|statistics|secrets|signal|platform|random|pprint|types|weakref|__future__|numpy|pandas|requests|flask|django|fastapi|pydantic|pytest|torch|tensorflow|sklearn|scipy|matplotlib|seaborn|sqlalchemy|aiohttp|httpx|click|typer|yaml|setuptools|boto3|botocore|celery|redis|jinja2|starlette|uvicorn|transformers|openai|dotenv|attr|attrs|six|tqdm|PIL|cv2)(?:\.|$)"
);

pub struct PythonStrategy;

fn module_candidates(base: &str, files: &FileIndex) -> Option<String> {
    if base.is_empty() {
        return files.get("__init__.py");
    }
    files
        .first_extension(base, &["py", "pyi"])
        .or_else(|| files.get(&child(base, "__init__.py")))
}

fn first_word(name: &str) -> Option<&str> {
    let word = name.split_whitespace().next()?;
    let valid = word.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some(word)
}

impl LanguageStrategy for PythonStrategy {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();

        if let Some(re) = FROM_IMPORT.as_ref() {
            for caps in re.captures_iter(content) {
                let module = caps.get(1).map_or("", |m| m.as_str());
                if module.is_empty() {
                    continue;
                }
                if module.chars().all(|c| c == '.') {
                    // `from . import a, b` names sibling modules
                    let names = caps.get(2).map_or("", |m| m.as_str());
                    let names = names.trim().trim_start_matches('(').trim_end_matches(')');
                    for name in names.split(',').filter_map(first_word) {
                        specifiers.push(format!("{module}{name}"));
                    }
                } else {
                    specifiers.push(module.to_string());
                }
            }
        }

        if let Some(re) = PLAIN_IMPORT.as_ref() {
            for caps in re.captures_iter(content) {
                let list = caps.get(1).map_or("", |m| m.as_str());
                specifiers.extend(
                    list.split(',')
                        .filter_map(|item| item.split_whitespace().next())
                        .map(str::to_string),
                );
            }
        }

        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        !specifier.starts_with('.') && matches(&PYTHON_EXTERNAL, specifier)
    }

    fn resolve(&self, specifier: &str, importer: &str, files: &FileIndex) -> Option<String> {
        if specifier.starts_with('.') {
            let dots = specifier.chars().take_while(|c| *c == '.').count();
            let rest = &specifier[dots..];
            // one level up per leading dot, starting from the importing file
            let mut dir = importer;
            for _ in 0..dots {
                if dir.is_empty() {
                    return None;
                }
                dir = parent_dir(dir);
            }
            let base = if rest.is_empty() {
                dir.to_string()
            } else {
                child(dir, &rest.replace('.', "/"))
            };
            return module_candidates(&base, files);
        }

        let relative = specifier.replace('.', "/");
        let importer_dir = parent_dir(importer);
        ["", "src"]
            .iter()
            .chain(std::iter::once(&importer_dir))
            .find_map(|root| module_candidates(&child(root, &relative), files))
    }
}
