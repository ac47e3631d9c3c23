use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::suggest::prefix::PrefixIndex;
use crate::util::text;

/// Text before the caret that is a partial (possibly empty) command token.
static COMMAND_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([a-z0-9-]*)$").unwrap());

/// Text before the caret that is a complete command token plus a partial
/// argument token.
static COMMAND_WITH_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([a-z0-9-]+)\s+([a-z0-9-]*)$").unwrap());

/// The closed argument vocabulary of `/move-to`.
pub const TASK_STATES: [&str; 3] = ["todo", "in-progress", "done"];

/// Commands whose completion omits the trailing space: their follow-on
/// token is inserted by a picker, not typed.
const PICKER_COMMANDS: [&str; 2] = ["projects", "tasks-in"];

pub fn opens_picker(name: &str) -> bool {
    PICKER_COMMANDS.contains(&name)
}

/// A committed completion: the new input text and where the caret lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub caret: usize,
}

/// Derives ghost text and candidate lists from the current text and caret.
/// Purely a function of its inputs plus the last `rebuild`; the generation
/// counter lets asynchronous callers discard superseded write-backs.
#[derive(Debug, Default)]
pub struct SuggestionEngine {
    index: PrefixIndex,
    /// Command names available in the current overview context, registry order
    available: Vec<String>,
    suggestion_text: String,
    suggested_commands: Vec<String>,
    selected_index: isize,
    generation: u64,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        SuggestionEngine {
            selected_index: -1,
            ..SuggestionEngine::default()
        }
    }

    /// Repopulate the prefix index for a new available-command set.
    /// Call on overview-context change or registry mutation.
    pub fn rebuild(&mut self, available: &[&str], abbreviations: &IndexMap<String, String>) {
        self.available = available.iter().map(|n| n.to_string()).collect();
        self.index.rebuild(available, abbreviations);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.suggestion_text.clear();
        self.suggested_commands.clear();
        self.selected_index = -1;
    }

    /// Ghost text to append at the caret; empty when none.
    pub fn ghost(&self) -> &str {
        &self.suggestion_text
    }

    /// Ambiguous candidates, registry order; empty when resolved or inactive.
    pub fn candidates(&self) -> &[String] {
        &self.suggested_commands
    }

    pub fn selected_index(&self) -> isize {
        self.selected_index
    }

    pub fn selected_candidate(&self) -> Option<&str> {
        usize::try_from(self.selected_index)
            .ok()
            .and_then(|i| self.suggested_commands.get(i))
            .map(String::as_str)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply `f` only if no newer `update` has run since `seen` was observed.
    /// Returns whether it ran.
    pub fn apply_if_current(&mut self, seen: u64, f: impl FnOnce(&mut Self)) -> bool {
        if seen == self.generation {
            f(self);
            true
        } else {
            false
        }
    }

    /// Recompute suggestion state for the live text and caret (a codepoint
    /// offset). Every call supersedes all earlier ones.
    pub fn update(&mut self, input: &str, caret: usize) {
        self.generation += 1;
        self.clear();

        let (before, after) = text::split_at_char(input, caret);
        // Suggestions only apply at the insertion point
        if !after.trim().is_empty() {
            return;
        }

        if let Some(caps) = COMMAND_TOKEN.captures(before) {
            let partial = &caps[1];
            let Some(entry) = self.index.lookup(partial) else {
                return;
            };
            match entry.commands()[0].strip_prefix(partial) {
                // Ghost text only works as an append; a prefix reached
                // through an abbreviation goes through the candidate list
                Some(rest) if entry.is_unique() => self.suggestion_text = rest.to_string(),
                _ => self.suggested_commands = entry.commands().to_vec(),
            }
            return;
        }

        if let Some(caps) = COMMAND_WITH_ARG.captures(before) {
            let command = caps[1].to_string();
            let partial = &caps[2];
            self.suggest_argument(&command, partial);
        }
    }

    /// Argument-position suggestion for the commands that take a closed or
    /// enumerable second token. Free-form content commands get nothing.
    fn suggest_argument(&mut self, command: &str, partial: &str) {
        if !self.available.iter().any(|n| n == command) {
            return;
        }
        match command {
            "move-to" => {
                if let Some(state) = TASK_STATES.iter().find(|s| s.starts_with(partial)) {
                    self.suggestion_text = state[partial.len()..].to_string();
                }
            }
            "show" | "ai-overview" => {
                let hit = self
                    .available
                    .iter()
                    .find(|n| n.starts_with(partial) && n.as_str() != partial);
                if let Some(name) = hit {
                    self.suggestion_text = name[partial.len()..].to_string();
                }
            }
            _ => {}
        }
    }

    /// Advance the cycle index over the ambiguous candidates. Inserts
    /// nothing; the commit happens on Enter.
    pub fn cycle(&mut self) {
        if self.suggested_commands.is_empty() {
            return;
        }
        let len = self.suggested_commands.len() as isize;
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Materialize the current ghost text into the input. `None` when there
    /// is nothing unambiguous to commit.
    pub fn complete(&self, input: &str, caret: usize) -> Option<Completion> {
        if self.suggestion_text.is_empty() {
            return None;
        }
        let (before, after) = text::split_at_char(input, caret);

        if let Some(caps) = COMMAND_TOKEN.captures(before) {
            let full = format!("{}{}", &caps[1], self.suggestion_text);
            return Some(build_command_completion(&full, after));
        }
        if COMMAND_WITH_ARG.is_match(before) {
            let new_before = format!("{}{}", before, self.suggestion_text);
            let new_caret = text::char_len(&new_before);
            return Some(Completion {
                text: format!("{}{}", new_before, after),
                caret: new_caret,
            });
        }
        None
    }

    /// Commit a specific candidate picked out of the ambiguous list.
    pub fn commit_candidate(&self, input: &str, caret: usize, name: &str) -> Option<Completion> {
        let (before, after) = text::split_at_char(input, caret);
        if !COMMAND_TOKEN.is_match(before) {
            return None;
        }
        Some(build_command_completion(name, after))
    }
}

fn build_command_completion(full: &str, after: &str) -> Completion {
    let mut new_before = format!("/{}", full);
    if !opens_picker(full) {
        new_before.push(' ');
    }
    let caret = text::char_len(&new_before);
    Completion {
        text: format!("{}{}", new_before, after),
        caret,
    }
}
