//! End-to-end flows through the interaction machine and the executor,
//! backed by a real file store.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use jot::app::{AppContext, SelectionContext, ViewState};
use jot::command::{self, Classification, CommandRegistry, EffectOutcome};
use jot::model::{ItemType, TaskStatus, TimelineItem};
use jot::store::{ItemStore, JsonStore, MemoryStore};
use jot::suggest::{CommandMachine, Handled, InputEvent, Key, MachineState};

/// Feed a string one keystroke at a time, the way a text box would.
fn type_chars(machine: &mut CommandMachine<'_>, text: &str) {
    let mut buffer = machine.text().to_string();
    for c in text.chars() {
        buffer.push(c);
        let caret = buffer.chars().count();
        machine.handle(InputEvent::TextChanged {
            text: buffer.clone(),
            caret,
        });
    }
}

#[test]
fn typing_tab_and_submit_opens_the_overview() {
    let registry = CommandRegistry::builtin().unwrap();
    let mut machine = CommandMachine::new(&registry, ItemType::Task, IndexMap::new());

    type_chars(&mut machine, "/sh");
    assert_eq!(machine.state(), MachineState::Suggesting);
    assert_eq!(machine.ghost(), "ow");

    machine.handle(InputEvent::Key(Key::Tab));
    assert_eq!(machine.text(), "/show ");
    assert_eq!(machine.caret(), 6);

    type_chars(&mut machine, "t");
    assert_eq!(machine.ghost(), "ask");
    machine.handle(InputEvent::Key(Key::Tab));
    assert_eq!(machine.text(), "/show task");

    let mut store = MemoryStore::new();
    let mut view = ViewState::new();
    let mut ctx = AppContext {
        store: &mut store,
        view: &mut view,
    };
    let classification =
        command::classify_and_run(&registry, machine.text(), &mut ctx, None).unwrap();
    let Classification::Command { name, result } = classification else {
        panic!("expected a command");
    };
    assert_eq!(name, "show");
    assert!(result.success);
    assert!(result.activate_task_focus);
    assert!(view.show_overview);
    assert_eq!(view.overview_type, ItemType::Task);

    machine.handle(InputEvent::CommandExecuted);
    assert_eq!(machine.state(), MachineState::Idle);
    assert_eq!(machine.text(), "");
}

#[test]
fn ambiguous_prefix_cycles_then_commits_on_enter() {
    let registry = CommandRegistry::builtin().unwrap();
    let mut machine = CommandMachine::new(&registry, ItemType::Task, IndexMap::new());

    type_chars(&mut machine, "/ta");
    assert_eq!(machine.candidates(), ["task", "tasks-in"]);
    assert_eq!(machine.ghost(), "");

    machine.handle(InputEvent::Key(Key::Tab));
    machine.handle(InputEvent::Key(Key::Tab));
    assert_eq!(machine.text(), "/ta"); // cycling never edits
    assert_eq!(machine.handle(InputEvent::Key(Key::Enter)), Handled::Consumed);
    assert_eq!(machine.text(), "/tasks-in");
}

#[test]
fn project_tag_resolves_against_the_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jot.json");
    let registry = CommandRegistry::builtin().unwrap();

    {
        let mut store = JsonStore::open(&path).unwrap();
        let mut view = ViewState::new();
        let mut ctx = AppContext {
            store: &mut store,
            view: &mut view,
        };
        let added =
            command::classify_and_run(&registry, "/add-project home", &mut ctx, None).unwrap();
        let Classification::Command { result, .. } = added else {
            panic!("expected a command");
        };
        assert!(matches!(result.outcome, EffectOutcome::ProjectAdded { .. }));

        command::classify_and_run(&registry, "/task water plants in #home", &mut ctx, None)
            .unwrap();
    }

    // Survives a reopen
    let store = JsonStore::open(&path).unwrap();
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].content, "water plants");
    let project = store.find_project("home").unwrap();
    assert_eq!(tasks[0].project_id, Some(project.id));
}

#[test]
fn notes_fall_through_and_persist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jot.json");
    let registry = CommandRegistry::builtin().unwrap();

    {
        let mut store = JsonStore::open(&path).unwrap();
        let mut view = ViewState::new();
        let mut ctx = AppContext {
            store: &mut store,
            view: &mut view,
        };
        let classification =
            command::classify_and_run(&registry, "  buy milk  ", &mut ctx, None).unwrap();
        assert!(matches!(
            classification,
            Classification::Note { ref content } if content == "buy milk"
        ));
    }

    let store = JsonStore::open(&path).unwrap();
    let items = store.items();
    assert_eq!(items.len(), 1);
    let TimelineItem::Note(note) = &items[0] else {
        panic!("expected a note");
    };
    assert_eq!(note.content, "buy milk");
}

#[test]
fn move_to_full_selection_round_trip() {
    let registry = CommandRegistry::builtin().unwrap();
    let mut store = MemoryStore::new();
    let mut view = ViewState::new();

    let a = store.create_task("one", TaskStatus::Todo, None).unwrap();
    let b = store.create_task("two", TaskStatus::Todo, None).unwrap();
    let selection = SelectionContext::new(vec![a.id, b.id]);

    let mut ctx = AppContext {
        store: &mut store,
        view: &mut view,
    };
    let classification = command::classify_and_run(
        &registry,
        "/move-to in-progress",
        &mut ctx,
        Some(&selection),
    )
    .unwrap();
    let Classification::Command { result, .. } = classification else {
        panic!("expected a command");
    };
    assert!(matches!(
        result.outcome,
        EffectOutcome::Moved {
            status: TaskStatus::InProgress,
            count: 2
        }
    ));
    assert!(store.tasks().iter().all(|t| t.status == TaskStatus::InProgress));
}

#[test]
fn overview_context_gates_move_to_suggestions_live() {
    let registry = CommandRegistry::builtin().unwrap();
    let mut machine = CommandMachine::new(&registry, ItemType::Note, IndexMap::new());

    type_chars(&mut machine, "/mov");
    assert_eq!(machine.ghost(), "");

    // Switching to the task overview re-enables the command mid-keystroke
    machine.set_overview_type(ItemType::Task);
    assert_eq!(machine.ghost(), "e-to");
}
