use std::path::Path;

use crate::structure::qualify;

const NAMESPACE_KEYWORD: &str = "namespace";

/// Finds the namespace a PHP file declares without building a syntax tree.
///
/// Scans for the `namespace` keyword and takes the trimmed text up to the next
/// `;` or `{`. Occurrences whose captured text is not a valid namespace name
/// (the keyword inside prose, `namespace\Foo` relative names) are passed over.
/// Returns `None` when no declaration is found; callers treat that as the
/// global namespace.
pub fn extract_namespace(content: &str) -> Option<String> {
    for (pos, _) in content.match_indices(NAMESPACE_KEYWORD) {
        let before = content[..pos].chars().next_back();
        if before.is_some_and(is_name_char) || before == Some('$') {
            continue;
        }

        let from = pos + NAMESPACE_KEYWORD.len();
        let rest = &content[from..];
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let Some(to) = rest.find([';', '{']) else {
            continue;
        };
        let candidate = rest[..to].trim();
        if candidate.is_empty() {
            // `namespace { ... }` is the braced global namespace.
            if rest[to..].starts_with('{') {
                return Some(String::new());
            }
            continue;
        }
        if is_namespace_name(candidate) {
            return Some(candidate.trim_start_matches('\\').to_string());
        }
    }

    None
}

/// Builds the identifier a file is expected to declare: its namespace joined
/// with the file name minus extension.
pub fn candidate_identifier(namespace: &str, path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(qualify(namespace, stem))
}

fn is_namespace_name(s: &str) -> bool {
    s.trim_start_matches('\\').split('\\').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c == '_' || c.is_alphabetic() || !c.is_ascii())
            && chars.all(is_name_char)
    })
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric() || !c.is_ascii()
}
