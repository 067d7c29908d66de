//! Outbound path sanitization

/// Normalizes repository paths before they leave the server.
pub trait PathSanitizer: Send + Sync {
    fn normalize(&self, path: &str) -> String;
}

/// Drops control characters and leading `/`, collapses `.` and `..`.
/// A `..` that would climb above the root is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSanitizer;

impl PathSanitizer for DefaultSanitizer {
    fn normalize(&self, path: &str) -> String {
        let cleaned: String = path.chars().filter(|c| !c.is_control()).collect();
        let mut parts: Vec<&str> = Vec::new();
        for segment in cleaned.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }
        parts.join("/")
    }
}
