//! Heading anchor ids.

use rustc_hash::FxHashMap;

/// Tracks ids already emitted in one document.
#[derive(Default)]
pub struct Anchors {
    seen: FxHashMap<String, usize>,
}

impl Anchors {
    /// Unique id for a heading text: `slug`, then `slug-1`, `slug-2`, ...
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() { "section".to_string() } else { base };
        self.claim(base)
    }

    /// Register an author-supplied id, suffixing it only if already taken.
    pub fn reserve(&mut self, id: &str) -> String {
        self.claim(id.to_string())
    }

    fn claim(&mut self, base: String) -> String {
        match self.seen.get(&base).copied() {
            None => {
                self.seen.insert(base.clone(), 1);
                base
            }
            Some(mut n) => loop {
                let candidate = format!("{base}-{n}");
                n += 1;
                if !self.seen.contains_key(&candidate) {
                    self.seen.insert(base.clone(), n);
                    self.seen.insert(candidate.clone(), 1);
                    break candidate;
                }
            },
        }
    }
}

/// GitHub-style slug: lowercase, punctuation dropped, whitespace to `-`.
///
/// Non-ASCII letters are transliterated (`Über` → `uber`).
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text.trim());
    let mut out = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if c == '-' || c == '_' {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('-');
        }
    }
    out
}
