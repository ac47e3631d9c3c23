use chrono::Datelike;

use crate::app::{AppContext, OverviewMode, SelectionContext};
use crate::command::args::ArgMap;
use crate::model::{ItemType, TaskStatus};
use crate::ops::{content, week};
use crate::store::StoreError;

/// Error type for command execution. Classification itself never fails;
/// only a failing persistence call surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// What a successful (or declined) effect did
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    /// A timeline item was persisted
    Created { item_type: ItemType, id: u64 },
    /// Selected items were removed
    Deleted { count: usize },
    /// Selected tasks moved to a new status
    Moved { status: TaskStatus, count: usize },
    /// A project was created
    ProjectAdded { id: u64, name: String },
    /// Panel/visibility state changed
    ViewChanged,
    /// Command recognized but declined; no state was mutated
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectResult {
    pub success: bool,
    pub outcome: EffectOutcome,
    /// Whether the frontend should move keyboard focus into the task list
    pub activate_task_focus: bool,
}

impl EffectResult {
    pub fn ok(outcome: EffectOutcome) -> Self {
        EffectResult {
            success: true,
            outcome,
            activate_task_focus: false,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        EffectResult {
            success: false,
            outcome: EffectOutcome::Rejected {
                reason: reason.into(),
            },
            activate_task_focus: false,
        }
    }
}

/// The shape of every command effect. Selection is `Some` only for
/// `ItemAction` commands.
pub type EffectFn = fn(
    &ArgMap,
    &mut AppContext<'_>,
    Option<&SelectionContext>,
) -> Result<EffectResult, CommandError>;

// ---------------------------------------------------------------------------
// Item creation
// ---------------------------------------------------------------------------

pub fn create_task(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let raw = args.value("content");
    let (clean, tag) = content::split_project_tag(raw);
    // An unknown project name is not an error: the tag stays in the content
    let project = tag.as_deref().and_then(|name| ctx.store.find_project(name));
    let (content, project_id) = match project {
        Some(p) => (clean, Some(p.id)),
        None => (raw.trim().to_string(), None),
    };
    let task = ctx.store.create_task(&content, TaskStatus::Todo, project_id)?;
    Ok(EffectResult::ok(EffectOutcome::Created {
        item_type: ItemType::Task,
        id: task.id,
    }))
}

pub fn create_event(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let raw = args.value("content");
    let (clean, tag) = content::split_collection_tag(raw);
    let collection = tag.as_deref().and_then(|name| ctx.store.find_collection(name));
    let (content, collection_id) = match collection {
        Some(c) => (clean, Some(c.id)),
        None => (raw.trim().to_string(), None),
    };
    let event = ctx.store.create_event(&content, None, collection_id)?;
    Ok(EffectResult::ok(EffectOutcome::Created {
        item_type: ItemType::Event,
        id: event.id,
    }))
}

/// Note creation backs the plain-text fallback as well as explicit notes
pub fn create_note_item(
    ctx: &mut AppContext<'_>,
    raw: &str,
) -> Result<EffectResult, CommandError> {
    let (clean, tag) = content::split_collection_tag(raw);
    let collection = tag.as_deref().and_then(|name| ctx.store.find_collection(name));
    let (content, collection_id) = match collection {
        Some(c) => (clean, Some(c.id)),
        None => (raw.trim().to_string(), None),
    };
    let note = ctx.store.create_note(&content, collection_id)?;
    Ok(EffectResult::ok(EffectOutcome::Created {
        item_type: ItemType::Note,
        id: note.id,
    }))
}

pub fn add_project(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let name = args.value("name").trim().to_string();
    if name.is_empty() {
        return Ok(EffectResult::rejected("project name is empty"));
    }
    if ctx.store.find_project(&name).is_some() {
        return Ok(EffectResult::rejected(format!(
            "project already exists: {}",
            name
        )));
    }
    let project = ctx.store.create_project(&name)?;
    Ok(EffectResult::ok(EffectOutcome::ProjectAdded {
        id: project.id,
        name: project.name,
    }))
}

// ---------------------------------------------------------------------------
// Item actions (consume the selection)
// ---------------------------------------------------------------------------

pub fn delete_selected(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let Some(selection) = selection.filter(|s| !s.is_empty()) else {
        return Ok(EffectResult::rejected("nothing selected"));
    };
    let count = ctx.store.delete_items(&selection.selected_ids)?;
    Ok(EffectResult::ok(EffectOutcome::Deleted { count }))
}

pub fn move_selected_to(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let target = args.value("target").trim();
    let Some(status) = TaskStatus::parse(target) else {
        return Ok(EffectResult::rejected(format!(
            "unknown task state: {}",
            target
        )));
    };
    let Some(selection) = selection.filter(|s| !s.is_empty()) else {
        return Ok(EffectResult::rejected("nothing selected"));
    };

    // Only the selected IDs that are tasks move; other item kinds stay put
    let task_ids: Vec<u64> = ctx
        .store
        .tasks()
        .iter()
        .map(|t| t.id)
        .filter(|id| selection.selected_ids.contains(id))
        .collect();
    if task_ids.is_empty() {
        return Ok(EffectResult::rejected("no tasks selected"));
    }
    for id in &task_ids {
        ctx.store.update_task_status(*id, status)?;
    }
    Ok(EffectResult::ok(EffectOutcome::Moved {
        status,
        count: task_ids.len(),
    }))
}

// ---------------------------------------------------------------------------
// System toggles and actions
// ---------------------------------------------------------------------------

pub fn show_overview(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let Some(item_type) = ItemType::parse(args.value("item_type")) else {
        return Ok(EffectResult::rejected(format!(
            "unknown item type: {}",
            args.value("item_type")
        )));
    };
    ctx.view.open_overview(item_type, OverviewMode::Standard);
    let mut result = EffectResult::ok(EffectOutcome::ViewChanged);
    result.activate_task_focus = item_type == ItemType::Task;
    Ok(result)
}

pub fn ai_overview(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let Some(item_type) = ItemType::parse(args.value("item_type")) else {
        return Ok(EffectResult::rejected(format!(
            "unknown item type: {}",
            args.value("item_type")
        )));
    };
    ctx.view.open_overview(item_type, OverviewMode::Ai);
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn close_overview(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.close_overview();
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn open_canvas(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.show_canvas = true;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn close_canvas(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.show_canvas = false;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn toggle_help(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.show_help = !ctx.view.show_help;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

// ---------------------------------------------------------------------------
// Week view
// ---------------------------------------------------------------------------

/// Which task the panel highlights for `date`: the day's next-to-last in
/// creation order.
fn focused_task_on(ctx: &AppContext<'_>, date: chrono::NaiveDate) -> Option<u64> {
    let mut tasks = ctx.store.tasks();
    tasks.reverse(); // creation order, oldest first
    let day_tasks = week::tasks_on(&tasks, date);
    week::focus_task(&day_tasks).map(|t| t.id)
}

pub fn open_week_tasks(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    // Opening the panel focuses today
    let today = chrono::Utc::now().date_naive();
    ctx.view.show_week_tasks = true;
    ctx.view.focused_day = Some(today.weekday());
    ctx.view.focused_task = focused_task_on(ctx, today);
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn close_week_tasks(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.show_week_tasks = false;
    ctx.view.focused_day = None;
    ctx.view.focused_task = None;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn focus_week_day(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let day = args.value("day");
    let Some(index) = week::day_index(day) else {
        return Ok(EffectResult::rejected(format!("unknown day: {}", day)));
    };
    let Some(weekday) = week::weekday_at(index) else {
        return Ok(EffectResult::rejected(format!("unknown day: {}", day)));
    };
    let date = week::week_dates(chrono::Utc::now().date_naive())[index];
    ctx.view.show_week_tasks = true;
    ctx.view.focused_day = Some(weekday);
    ctx.view.focused_task = focused_task_on(ctx, date);
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn open_unscheduled(
    _args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    ctx.view.show_unscheduled = true;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

// ---------------------------------------------------------------------------
// Project context
// ---------------------------------------------------------------------------

pub fn select_project(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let name = args.value("name").trim();
    let Some(project) = ctx.store.find_project(name) else {
        return Ok(EffectResult::rejected(format!("unknown project: {}", name)));
    };
    ctx.view.current_project = Some(project.id);
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}

pub fn show_project_tasks(
    args: &ArgMap,
    ctx: &mut AppContext<'_>,
    _selection: Option<&SelectionContext>,
) -> Result<EffectResult, CommandError> {
    let name = args.value("name").trim();
    let Some(project) = ctx.store.find_project(name) else {
        return Ok(EffectResult::rejected(format!("unknown project: {}", name)));
    };
    ctx.view.project_panel = Some(project.id);
    ctx.view.show_overview = true;
    ctx.view.overview_type = ItemType::Task;
    Ok(EffectResult::ok(EffectOutcome::ViewChanged))
}
