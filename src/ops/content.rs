use std::sync::LazyLock;

use regex::Regex;

static PROJECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+in\s+#(\S+)\s*$").unwrap());
/// Like [`PROJECT_TAG`] but also matches a bare `in #` still being typed.
static PARTIAL_PROJECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+in\s+#\S*$").unwrap());
static COLLECTION_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s)@(\S+)").unwrap());

/// Whether the text ends in a (possibly empty) `in #…` project tag,
/// the point where a project picker becomes useful.
pub fn has_partial_project_tag(text: &str) -> bool {
    PARTIAL_PROJECT_TAG.is_match(text)
}

/// Split a trailing `… in #name` project tag off task content.
/// Returns the content without the tag and the tag name, if present.
pub fn split_project_tag(content: &str) -> (String, Option<String>) {
    if let Some(caps) = PROJECT_TAG.captures(content)
        && let (Some(whole), Some(name)) = (caps.get(0), caps.get(1))
    {
        let clean = content[..whole.start()].trim().to_string();
        return (clean, Some(name.as_str().to_string()));
    }
    (content.trim().to_string(), None)
}

/// Split the first `@name` collection tag out of event/note content.
/// The `@` must start a word; `a@b` is left alone.
pub fn split_collection_tag(content: &str) -> (String, Option<String>) {
    if let Some(caps) = COLLECTION_TAG.captures(content)
        && let (Some(whole), Some(name)) = (caps.get(0), caps.get(2))
    {
        let mut clean = String::with_capacity(content.len());
        clean.push_str(&content[..whole.start()]);
        clean.push(' ');
        clean.push_str(&content[whole.end()..]);
        let clean = clean.split_whitespace().collect::<Vec<_>>().join(" ");
        return (clean, Some(name.as_str().to_string()));
    }
    (content.trim().to_string(), None)
}

/// Apply a picker choice to the message: replace a trailing `in #partial`
/// tag with the chosen project, or append one.
pub fn apply_project_choice(message: &str, name: &str) -> String {
    let base = match PARTIAL_PROJECT_TAG.find(message) {
        Some(m) => message[..m.start()].trim_end(),
        None => message.trim_end(),
    };
    format!("{} in #{}", base, name)
}
