use chrono::Weekday;

use crate::model::ItemType;
use crate::store::ItemStore;

/// How the overview panel presents its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverviewMode {
    #[default]
    Standard,
    Ai,
}

/// All panel/visibility state the commands act on. Owned explicitly and
/// passed through [`AppContext`] — never module-level globals.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub show_overview: bool,
    pub overview_type: ItemType,
    pub overview_mode: OverviewMode,
    pub show_canvas: bool,
    pub show_week_tasks: bool,
    pub show_unscheduled: bool,
    pub show_help: bool,
    /// Week panel day focus (set by `/mon` … `/sun`)
    pub focused_day: Option<Weekday>,
    /// Task highlighted within the focused day
    pub focused_task: Option<u64>,
    /// Project selected as current context via `/projects <name>`
    pub current_project: Option<u64>,
    /// Project whose tasks the overview shows via `/tasks-in <name>`
    pub project_panel: Option<u64>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            show_overview: false,
            overview_type: ItemType::Task,
            overview_mode: OverviewMode::Standard,
            show_canvas: false,
            show_week_tasks: false,
            show_unscheduled: false,
            show_help: false,
            focused_day: None,
            focused_task: None,
            current_project: None,
            project_panel: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        ViewState::default()
    }

    /// Open the overview on an item type in the given mode
    pub fn open_overview(&mut self, item_type: ItemType, mode: OverviewMode) {
        self.overview_type = item_type;
        self.overview_mode = mode;
        self.show_overview = true;
    }

    pub fn close_overview(&mut self) {
        self.show_overview = false;
    }
}

/// The item IDs the user has multi-selected elsewhere in the UI.
/// Read-only to the command core; consumed only by `ItemAction` commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    pub selected_ids: Vec<u64>,
}

impl SelectionContext {
    pub fn new(selected_ids: Vec<u64>) -> Self {
        SelectionContext { selected_ids }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }
}

/// Everything a command effect may touch. Effects receive this explicitly
/// instead of closing over shared state.
pub struct AppContext<'a> {
    pub store: &'a mut dyn ItemStore,
    pub view: &'a mut ViewState,
}
