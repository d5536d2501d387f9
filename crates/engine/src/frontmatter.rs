//! YAML-style front-matter parsing for markdown documents.
//!
//! Only the flat `key: value` subset is understood. Anything richer is kept
//! as raw text in the value.

use std::collections::BTreeMap;
use std::path::Path;

const DELIMITER: &str = "---";

/// How far into a document the description scan looks.
const SCAN_LINES: usize = 20;

/// A parsed front-matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
}

impl FrontMatter {
    /// Look up a field; keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_lowercase()).map(String::as_str)
    }

    /// The `name` field, falling back to the stem of `id` (`guide.md` → `guide`).
    pub fn name_or_stem(&self, id: &str) -> String {
        match self.get("name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => Path::new(id)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(id)
                .to_string(),
        }
    }

}

/// Extract the `description:` value from a leading front-matter block.
///
/// Only the first 20 lines are scanned. Returns `None` when the document
/// doesn't open with `---` or the block has no non-empty description.
pub fn description(content: &str) -> Option<String> {
    let content = content.trim_start();
    if !content.starts_with(DELIMITER) {
        return None;
    }

    let mut inside = false;
    for line in content.lines().take(SCAN_LINES) {
        let line = line.trim();
        if line == DELIMITER {
            if inside {
                break;
            }
            inside = true;
            continue;
        }
        if !inside {
            continue;
        }
        if let Some((key, value)) = line.split_once(':')
            && key.trim().eq_ignore_ascii_case("description")
        {
            let value = unquote(value.trim());
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Parse the full front-matter block into a key/value map.
///
/// A document without a closed block parses to no fields.
pub fn parse(content: &str) -> FrontMatter {
    let Some(block) = leading_block(content) else {
        return FrontMatter::default();
    };

    let fields = block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_lowercase(), unquote(value.trim()).to_string()))
        .collect();

    FrontMatter { fields }
}

/// The text between the delimiters when the content opens with a closed `---` block.
fn leading_block(content: &str) -> Option<&str> {
    let rest = content.trim_start().strip_prefix(DELIMITER)?;
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }
    let rest = &rest[newline + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim() == DELIMITER {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}
