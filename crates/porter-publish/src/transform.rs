//! Text normalization applied to the published entry document.
//!
//! The site bundler emits a multi-line `index.html` and, for root-relative
//! attributes, a stray bare slash (`src=/`). Both are patched at the string
//! level; nothing here parses HTML.

use std::sync::LazyLock;

use regex::Regex;

// `=` after a word character, then a lone `/` that does not start a path
// (`=/assets/..`) or a protocol-relative URL (`=//cdn..`).
static ROOT_SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b=/([^\w/]|$)").expect("Invalid root slash regex"));

/// Remove every newline, joining all lines into one.
pub fn collapse_newlines(source: &str) -> String {
    source.replace('\n', "")
}

/// Strip the bare trailing slash from attribute assignments such as `src=/`.
pub fn strip_root_slash(source: &str) -> String {
    ROOT_SLASH_RE.replace_all(source, "=${1}").into_owned()
}

/// Apply the full entry document normalization, newline collapse first.
pub fn normalize_index(source: &str) -> String {
    strip_root_slash(&collapse_newlines(source))
}
