//! Tutorial metadata from `tutorial.yml`.
//!
//! Deliberately not a YAML parser: only three top-level scalar keys are
//! read, one per line, and anything else in the file is ignored. A
//! malformed file degrades to missing fields, never to an error.
//!
//! | Key           | Used for                         |
//! |---------------|----------------------------------|
//! | `name`        | Page title                       |
//! | `category`    | Header meta line                 |
//! | `description` | Header meta line                 |

/// Category shown when `tutorial.yml` exists but has none.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Fields extracted from `tutorial.yml`. Absent or empty values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialMeta {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl TutorialMeta {
    /// Extract fields line by line. The first non-empty occurrence of a key wins.
    pub fn extract(text: &str) -> Self {
        let mut meta = Self::default();
        for line in text.lines() {
            let Some((key, value)) = split_line(line) else {
                continue;
            };
            let slot = match key {
                "name" => &mut meta.name,
                "category" => &mut meta.category,
                "description" => &mut meta.description,
                _ => continue,
            };
            if slot.is_none()
                && let Some(value) = clean_value(value)
            {
                *slot = Some(value);
            }
        }
        meta
    }

    /// Apply display defaults: the directory name for `name`,
    /// [`UNKNOWN_CATEGORY`] for `category`.
    pub fn with_defaults(mut self, dir_name: &str) -> Self {
        self.name.get_or_insert_with(|| dir_name.to_string());
        self.category
            .get_or_insert_with(|| UNKNOWN_CATEGORY.to_string());
        self
    }
}

/// Split an unindented `key: value` line.
fn split_line(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(char::is_whitespace) || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim_end();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

/// Trim, strip matching quotes or a trailing comment, drop empties.
fn clean_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    let value = match value.chars().next() {
        Some(q @ ('"' | '\'')) => match value[1..].find(q) {
            Some(end) => &value[1..=end],
            None => &value[1..],
        },
        _ => match value.find(" #") {
            Some(idx) => value[..idx].trim_end(),
            None => value,
        },
    };
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_scaffolded_file() {
        let meta = TutorialMeta::extract(
            "name: Zero To Hero\nslug: zero-to-hero\ncategory: polkadot-sdk-cookbook\nneeds_node: true\ndescription: Replace with a short description.\ntype: sdk # or contracts\n",
        );
        assert_eq!(meta.name.as_deref(), Some("Zero To Hero"));
        assert_eq!(meta.category.as_deref(), Some("polkadot-sdk-cookbook"));
        assert_eq!(
            meta.description.as_deref(),
            Some("Replace with a short description.")
        );
    }

    #[test]
    fn test_first_match_wins() {
        let meta = TutorialMeta::extract("name: First\nname: Second");
        assert_eq!(meta.name.as_deref(), Some("First"));
    }

    #[test]
    fn test_empty_value_ignored() {
        let meta = TutorialMeta::extract("name:\nname:   \nname: Later");
        assert_eq!(meta.name.as_deref(), Some("Later"));
    }

    #[test]
    fn test_quotes_stripped() {
        let meta = TutorialMeta::extract("name: \"Quoted: Title\"\ncategory: 'single'");
        assert_eq!(meta.name.as_deref(), Some("Quoted: Title"));
        assert_eq!(meta.category.as_deref(), Some("single"));
    }

    #[test]
    fn test_comment_stripped() {
        let meta = TutorialMeta::extract("category: sdk # or contracts");
        assert_eq!(meta.category.as_deref(), Some("sdk"));
    }

    #[test]
    fn test_nested_and_similar_keys_ignored() {
        let meta = TutorialMeta::extract("author:\n  name: Nested\nfilename: x.md\n# name: comment");
        assert_eq!(meta, TutorialMeta::default());
    }

    #[test]
    fn test_garbage_is_lenient() {
        let meta = TutorialMeta::extract("{{{ not yaml\n:::\n\0");
        assert_eq!(meta, TutorialMeta::default());
    }

    #[test]
    fn test_defaults() {
        let meta = TutorialMeta::extract("description: d").with_defaults("my-dir");
        assert_eq!(meta.name.as_deref(), Some("my-dir"));
        assert_eq!(meta.category.as_deref(), Some(UNKNOWN_CATEGORY));
        assert_eq!(meta.description.as_deref(), Some("d"));
    }
}
