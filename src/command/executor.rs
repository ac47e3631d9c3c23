use crate::app::{AppContext, SelectionContext};
use crate::command::effects::{self, CommandError, EffectResult};
use crate::command::registry::{CommandCategory, CommandRegistry};

/// What a submitted line turned out to be.
#[derive(Debug)]
pub enum Classification {
    /// Plain text, persisted as a note
    Note { content: String },
    /// A recognized slash command and what its effect did
    Command {
        name: &'static str,
        result: EffectResult,
    },
}

/// Whether the line would dispatch as a command rather than a note.
pub fn is_command(registry: &CommandRegistry, text: &str) -> bool {
    registry.find_executable(text).is_some()
}

/// Classify a submitted line and run it. A line matching no registered
/// command becomes a note; nothing the user types is ever dropped.
pub fn classify_and_run(
    registry: &CommandRegistry,
    text: &str,
    ctx: &mut AppContext<'_>,
    selection: Option<&SelectionContext>,
) -> Result<Classification, CommandError> {
    let trimmed = text.trim();
    if let Some(def) = registry.find_executable(trimmed) {
        let args = def.extract_args(trimmed);
        // Only item actions see the selection
        let selection = match def.category {
            CommandCategory::ItemAction => selection,
            _ => None,
        };
        let result = (def.effect)(&args, ctx, selection)?;
        return Ok(Classification::Command {
            name: def.name,
            result,
        });
    }
    effects::create_note_item(ctx, trimmed)?;
    Ok(Classification::Note {
        content: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppContext, SelectionContext, ViewState};
    use crate::command::effects::EffectOutcome;
    use crate::model::{ItemType, TaskStatus, TimelineItem};
    use crate::store::{ItemStore, MemoryStore};

    fn run(
        store: &mut MemoryStore,
        view: &mut ViewState,
        text: &str,
        selection: Option<&SelectionContext>,
    ) -> Classification {
        let registry = CommandRegistry::builtin().unwrap();
        let mut ctx = AppContext { store, view };
        classify_and_run(&registry, text, &mut ctx, selection).unwrap()
    }

    #[test]
    fn is_command_matches_without_executing() {
        let registry = CommandRegistry::builtin().unwrap();
        assert!(is_command(&registry, "/help"));
        assert!(is_command(&registry, "  /task water plants  "));
        assert!(!is_command(&registry, "buy milk"));
        assert!(!is_command(&registry, "/task")); // incomplete line
    }

    #[test]
    fn plain_text_becomes_a_note() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let result = run(&mut store, &mut view, "buy milk", None);
        assert!(matches!(result, Classification::Note { ref content } if content == "buy milk"));
        assert_eq!(store.items().len(), 1);
        assert!(matches!(store.items()[0], TimelineItem::Note(_)));
    }

    #[test]
    fn task_command_creates_a_task() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let result = run(&mut store, &mut view, "/task water the plants", None);
        let Classification::Command { name, result } = result else {
            panic!("expected command classification");
        };
        assert_eq!(name, "task");
        assert!(result.success);
        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].content, "water the plants");
        assert_eq!(tasks[0].status, TaskStatus::Todo);
    }

    #[test]
    fn unknown_slash_verb_falls_back_to_note() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let result = run(&mut store, &mut view, "/frobnicate now", None);
        assert!(matches!(result, Classification::Note { .. }));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn show_with_bad_item_type_is_rejected_not_a_note() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let result = run(&mut store, &mut view, "/show xyz", None);
        let Classification::Command { name, result } = result else {
            panic!("expected command classification");
        };
        assert_eq!(name, "show");
        assert!(!result.success);
        assert!(matches!(result.outcome, EffectOutcome::Rejected { .. }));
        assert!(store.items().is_empty());
        assert!(!view.show_overview);
    }

    #[test]
    fn show_task_opens_overview_and_focuses_tasks() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let result = run(&mut store, &mut view, "/show task", None);
        let Classification::Command { result, .. } = result else {
            panic!("expected command classification");
        };
        assert!(result.success);
        assert!(result.activate_task_focus);
        assert!(view.show_overview);
        assert_eq!(view.overview_type, ItemType::Task);
    }

    #[test]
    fn focusing_a_week_day_highlights_its_next_to_last_task() {
        use chrono::{Datelike, Utc};
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let _a = store.create_task("one", TaskStatus::Todo, None).unwrap();
        let b = store.create_task("two", TaskStatus::Todo, None).unwrap();
        let _c = store.create_task("three", TaskStatus::Todo, None).unwrap();

        // All three were created today; focus today's weekday
        let today = Utc::now().date_naive();
        let result = run(&mut store, &mut view, &format!("/{}", today.weekday()), None);
        let Classification::Command { result, .. } = result else {
            panic!("expected command classification");
        };
        assert!(result.success);
        assert!(view.show_week_tasks);
        assert_eq!(view.focused_day, Some(today.weekday()));
        assert_eq!(view.focused_task, Some(b.id));

        run(&mut store, &mut view, "/close-week-tasks", None);
        assert!(!view.show_week_tasks);
        assert_eq!(view.focused_day, None);
        assert_eq!(view.focused_task, None);
    }

    #[test]
    fn opening_the_week_panel_focuses_today() {
        use chrono::{Datelike, Utc};
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let only = store.create_task("solo", TaskStatus::Todo, None).unwrap();
        run(&mut store, &mut view, "/week-tasks", None);
        assert!(view.show_week_tasks);
        assert_eq!(view.focused_day, Some(Utc::now().date_naive().weekday()));
        assert_eq!(view.focused_task, Some(only.id));
    }

    #[test]
    fn delete_without_selection_is_rejected() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        store.create_task("doomed", TaskStatus::Todo, None).unwrap();
        let result = run(&mut store, &mut view, "/delete", None);
        let Classification::Command { result, .. } = result else {
            panic!("expected command classification");
        };
        assert!(!result.success);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn delete_consumes_the_selection() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let a = store.create_task("one", TaskStatus::Todo, None).unwrap();
        let b = store.create_task("two", TaskStatus::Todo, None).unwrap();
        let selection = SelectionContext::new(vec![a.id, b.id]);
        let result = run(&mut store, &mut view, "/delete", Some(&selection));
        let Classification::Command { result, .. } = result else {
            panic!("expected command classification");
        };
        assert!(result.success);
        assert!(matches!(result.outcome, EffectOutcome::Deleted { count: 2 }));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn selection_is_withheld_from_non_action_commands() {
        // A stale selection must not leak into creation commands
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let a = store.create_task("keep", TaskStatus::Todo, None).unwrap();
        let selection = SelectionContext::new(vec![a.id]);
        run(&mut store, &mut view, "/task another", Some(&selection));
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn move_to_updates_only_selected_tasks() {
        let mut store = MemoryStore::new();
        let mut view = ViewState::default();
        let a = store.create_task("one", TaskStatus::Todo, None).unwrap();
        let _b = store.create_task("two", TaskStatus::Todo, None).unwrap();
        let note = store.create_note("just a note", None).unwrap();
        let selection = SelectionContext::new(vec![a.id, note.id]);
        let result = run(&mut store, &mut view, "/move-to done", Some(&selection));
        let Classification::Command { result, .. } = result else {
            panic!("expected command classification");
        };
        assert!(matches!(
            result.outcome,
            EffectOutcome::Moved {
                status: TaskStatus::Done,
                count: 1
            }
        ));
        let moved = store.tasks().into_iter().find(|t| t.id == a.id).unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
    }
}
