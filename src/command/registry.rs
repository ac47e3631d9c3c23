use indexmap::IndexMap;
use regex::Regex;

use crate::command::args::{self, ArgMap};
use crate::command::effects::{self, EffectFn};
use crate::model::ItemType;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate command name: {0}")]
    DuplicateName(String),
    #[error("empty matcher pattern for command: {0}")]
    EmptyPattern(String),
    #[error("invalid matcher pattern for {name}: {source}")]
    BadPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Governs the dispatch path and whether the selection is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// Creates a timeline item or project
    ItemCreation,
    /// Acts on the current selection
    ItemAction,
    /// Toggles panel state
    SystemToggle,
    /// Triggers a system behavior (AI overview, project context)
    SystemAction,
    /// Drives the week panel
    WeekViewAction,
}

/// One slash command: grammar plus behavior
pub struct CommandDefinition {
    pub name: &'static str,
    pub category: CommandCategory,
    /// Short alias feeding the prefix index only, never the matcher
    pub abbrev: Option<&'static str>,
    /// Overview contexts in which the command is offered; `None` = always
    pub allowed_overview_types: Option<&'static [ItemType]>,
    matcher: Regex,
    pub effect: EffectFn,
}

impl CommandDefinition {
    fn new(
        name: &'static str,
        category: CommandCategory,
        pattern: &str,
        effect: EffectFn,
    ) -> Result<CommandDefinition, RegistryError> {
        if pattern.is_empty() {
            return Err(RegistryError::EmptyPattern(name.to_string()));
        }
        let matcher = Regex::new(pattern).map_err(|source| RegistryError::BadPattern {
            name: name.to_string(),
            source,
        })?;
        Ok(CommandDefinition {
            name,
            category,
            abbrev: None,
            allowed_overview_types: None,
            matcher,
            effect,
        })
    }

    fn only_in(mut self, types: &'static [ItemType]) -> Self {
        self.allowed_overview_types = Some(types);
        self
    }

    /// Whether the full (trimmed) line matches this command
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Named arguments from the matched line; empty on no match
    pub fn extract_args(&self, text: &str) -> ArgMap {
        args::extract_named(&self.matcher, text)
    }

    pub fn available_in(&self, overview_type: ItemType) -> bool {
        match self.allowed_overview_types {
            Some(types) => types.contains(&overview_type),
            None => true,
        }
    }
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("matcher", &self.matcher.as_str())
            .finish()
    }
}

/// Single source of truth for every slash command. Registration order is
/// match order: more specific patterns must be registered before general
/// ones sharing a prefix.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry::default()
    }

    pub fn register(&mut self, def: CommandDefinition) -> Result<(), RegistryError> {
        if self.commands.iter().any(|c| c.name == def.name) {
            return Err(RegistryError::DuplicateName(def.name.to_string()));
        }
        self.commands.push(def);
        Ok(())
    }

    /// First definition (registry order) whose matcher fully matches the
    /// trimmed text
    pub fn find_executable(&self, text: &str) -> Option<&CommandDefinition> {
        let trimmed = text.trim();
        self.commands.iter().find(|c| c.matches(trimmed))
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Names of the commands available in the given overview context,
    /// in registry order
    pub fn list_names(&self, overview_type: ItemType) -> Vec<&'static str> {
        self.commands
            .iter()
            .filter(|c| c.available_in(overview_type))
            .map(|c| c.name)
            .collect()
    }

    /// Declared abbreviations: command name → alias, in registry order
    pub fn abbreviations(&self) -> IndexMap<String, String> {
        self.commands
            .iter()
            .filter_map(|c| c.abbrev.map(|a| (c.name.to_string(), a.to_string())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    /// The full built-in command set, in its canonical order
    pub fn builtin() -> Result<CommandRegistry, RegistryError> {
        use CommandCategory::*;

        let mut registry = CommandRegistry::new();

        registry.register(CommandDefinition::new(
            "task",
            ItemCreation,
            r"(?i)^/task\s+(?P<content>.+)$",
            effects::create_task,
        )?)?;
        registry.register(CommandDefinition::new(
            "event",
            ItemCreation,
            r"(?i)^/event\s+(?P<content>.+)$",
            effects::create_event,
        )?)?;
        registry.register(CommandDefinition::new(
            "delete",
            ItemAction,
            r"(?i)^/delete\s*$",
            effects::delete_selected,
        )?)?;
        registry.register(
            CommandDefinition::new(
                "move-to",
                ItemAction,
                r"(?i)^/move-to\s+(?P<target>.+)$",
                effects::move_selected_to,
            )?
            .only_in(&[ItemType::Task]),
        )?;
        registry.register(CommandDefinition::new(
            "show",
            SystemToggle,
            r"(?i)^/show\s+(?P<item_type>\w+)\s*$",
            effects::show_overview,
        )?)?;
        registry.register(CommandDefinition::new(
            "close-overview",
            SystemToggle,
            r"(?i)^/close-overview\s*$",
            effects::close_overview,
        )?)?;
        registry.register(CommandDefinition::new(
            "canvas",
            SystemToggle,
            r"(?i)^/canvas\s*$",
            effects::open_canvas,
        )?)?;
        registry.register(CommandDefinition::new(
            "close-canvas",
            SystemToggle,
            r"(?i)^/close-canvas\s*$",
            effects::close_canvas,
        )?)?;
        registry.register(CommandDefinition::new(
            "ai-overview",
            SystemAction,
            r"(?i)^/ai-overview\s+(?P<item_type>\w+)\s*$",
            effects::ai_overview,
        )?)?;
        registry.register(CommandDefinition::new(
            "week-tasks",
            WeekViewAction,
            r"(?i)^/week-tasks\s*$",
            effects::open_week_tasks,
        )?)?;
        registry.register(CommandDefinition::new(
            "close-week-tasks",
            WeekViewAction,
            r"(?i)^/close-week-tasks\s*$",
            effects::close_week_tasks,
        )?)?;
        for (name, pattern) in [
            ("mon", r"(?i)^/(?P<day>mon)\s*$"),
            ("tue", r"(?i)^/(?P<day>tue)\s*$"),
            ("wed", r"(?i)^/(?P<day>wed)\s*$"),
            ("thu", r"(?i)^/(?P<day>thu)\s*$"),
            ("fri", r"(?i)^/(?P<day>fri)\s*$"),
            ("sat", r"(?i)^/(?P<day>sat)\s*$"),
            ("sun", r"(?i)^/(?P<day>sun)\s*$"),
        ] {
            registry.register(CommandDefinition::new(
                name,
                WeekViewAction,
                pattern,
                effects::focus_week_day,
            )?)?;
        }
        registry.register(CommandDefinition::new(
            "help",
            SystemToggle,
            r"(?i)^/help\s*$",
            effects::toggle_help,
        )?)?;
        registry.register(CommandDefinition::new(
            "unscheduled-tasks",
            WeekViewAction,
            r"(?i)^/unscheduled-tasks\s*$",
            effects::open_unscheduled,
        )?)?;
        registry.register(CommandDefinition::new(
            "add-project",
            ItemCreation,
            r"(?i)^/add-project\s+(?P<name>.+)$",
            effects::add_project,
        )?)?;
        registry.register(CommandDefinition::new(
            "projects",
            SystemAction,
            r"(?i)^/projects\s+(?P<name>.+)$",
            effects::select_project,
        )?)?;
        registry.register(CommandDefinition::new(
            "tasks-in",
            SystemAction,
            r"(?i)^/tasks-in\s+(?P<name>.+)$",
            effects::show_project_tasks,
        )?)?;

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_builds() {
        let registry = CommandRegistry::builtin().unwrap();
        assert!(registry.len() >= 17);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = CommandRegistry::builtin().unwrap();
        let dup = CommandDefinition::new(
            "task",
            CommandCategory::ItemCreation,
            r"^/task2$",
            effects::create_task,
        )
        .unwrap();
        assert!(matches!(
            registry.register(dup),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn empty_pattern_rejected() {
        let err = CommandDefinition::new(
            "broken",
            CommandCategory::SystemToggle,
            "",
            effects::toggle_help,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyPattern(_)));
    }

    #[test]
    fn find_executable_matches_every_builtin() {
        let registry = CommandRegistry::builtin().unwrap();
        // Commands taking an argument, with a valid one appended
        let with_arg = [
            ("task", "/task water the plants"),
            ("event", "/event dentist at noon"),
            ("move-to", "/move-to done"),
            ("show", "/show event"),
            ("ai-overview", "/ai-overview task"),
            ("add-project", "/add-project home"),
            ("projects", "/projects home"),
            ("tasks-in", "/tasks-in home"),
        ];
        for (name, line) in with_arg {
            assert_eq!(registry.find_executable(line).unwrap().name, name, "{line}");
        }
        // Bare commands
        for name in [
            "delete",
            "close-overview",
            "canvas",
            "close-canvas",
            "week-tasks",
            "close-week-tasks",
            "mon",
            "tue",
            "wed",
            "thu",
            "fri",
            "sat",
            "sun",
            "help",
            "unscheduled-tasks",
        ] {
            let line = format!("/{}", name);
            assert_eq!(registry.find_executable(&line).unwrap().name, name, "{line}");
        }
    }

    #[test]
    fn verb_is_case_insensitive() {
        let registry = CommandRegistry::builtin().unwrap();
        assert_eq!(registry.find_executable("/TASK do it").unwrap().name, "task");
        assert_eq!(registry.find_executable("  /Help  ").unwrap().name, "help");
    }

    #[test]
    fn unknown_line_matches_nothing() {
        let registry = CommandRegistry::builtin().unwrap();
        assert!(registry.find_executable("buy milk").is_none());
        assert!(registry.find_executable("/task").is_none()); // requires content
        assert!(registry.find_executable("/nope").is_none());
    }

    #[test]
    fn list_names_honors_context_constraint() {
        let registry = CommandRegistry::builtin().unwrap();
        let in_tasks = registry.list_names(ItemType::Task);
        let in_events = registry.list_names(ItemType::Event);
        assert!(in_tasks.contains(&"move-to"));
        assert!(!in_events.contains(&"move-to"));
        assert_eq!(in_tasks.len(), in_events.len() + 1);
        // Registry order is preserved
        assert_eq!(in_tasks[0], "task");
        assert_eq!(*in_tasks.last().unwrap(), "tasks-in");
    }

    #[test]
    fn extract_args_never_fails() {
        let registry = CommandRegistry::builtin().unwrap();
        let show = registry.get("show").unwrap();
        assert_eq!(show.extract_args("/show task").get("item_type"), Some("task"));
        assert!(show.extract_args("garbage").is_empty());
    }
}
