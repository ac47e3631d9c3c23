use indexmap::IndexMap;

/// The commands reachable from one typed prefix, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixEntry {
    commands: Vec<String>,
}

impl PrefixEntry {
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// A unique entry resolves without a candidate list.
    pub fn is_unique(&self) -> bool {
        self.commands.len() == 1
    }

    fn push_deduped(&mut self, command: &str) {
        if !self.commands.iter().any(|c| c == command) {
            self.commands.push(command.to_string());
        }
    }
}

/// Map from every non-empty prefix of every available command name (and
/// declared abbreviation) to the commands it could still resolve to.
/// Rebuilt whenever the available command set changes; lookups are the
/// hot path, rebuilds are not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixIndex {
    entries: IndexMap<String, PrefixEntry>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        PrefixIndex::default()
    }

    /// Clear and repopulate. `abbreviations` maps a command name to its
    /// short alias; a command reachable through both its full name and
    /// its alias contributes to each shared prefix once.
    pub fn rebuild(&mut self, commands: &[&str], abbreviations: &IndexMap<String, String>) {
        self.entries.clear();
        for name in commands {
            self.insert_prefixes(name, name);
            if let Some(alias) = abbreviations.get(*name) {
                self.insert_prefixes(alias, name);
            }
        }
    }

    fn insert_prefixes(&mut self, spelled: &str, command: &str) {
        for (i, c) in spelled.char_indices() {
            let prefix = &spelled[..i + c.len_utf8()];
            self.entries
                .entry(prefix.to_string())
                .or_default()
                .push_deduped(command);
        }
    }

    /// The empty prefix is never stored.
    pub fn lookup(&self, prefix: &str) -> Option<&PrefixEntry> {
        if prefix.is_empty() {
            return None;
        }
        self.entries.get(prefix)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &PrefixEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
