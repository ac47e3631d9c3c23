use indexmap::IndexMap;

use crate::command::CommandRegistry;
use crate::model::ItemType;
use crate::ops::content;
use crate::suggest::engine::{self, SuggestionEngine};
use crate::util::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    Typing,
    Suggesting,
    /// Transient: a commit is running; never observed at rest
    Completing,
    /// An auxiliary picker (project/collection list) is open
    ArgumentSelection,
}

/// Keys with machine-level meaning. Everything else edits text and arrives
/// as [`InputEvent::TextChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    /// The dedicated whole-line submit chord, distinct from Enter
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    TextChanged { text: String, caret: usize },
    CursorMoved { caret: usize },
    Key(Key),
    ProjectSelected { name: String },
    CollectionSelected { name: String },
    PopoverClosed,
    /// The surrounding application ran the submitted line
    CommandExecuted,
}

/// What the machine did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event consumed; the caller should not act on it further
    Consumed,
    /// Event not meaningful here; the caller may apply its default behavior
    Ignored,
    /// The whole line should be submitted now
    Submit,
}

/// Reconciles keystrokes, caret moves and picker events into one
/// authoritative suggestion flow. Owns the mirror of the live text box;
/// every transition that changes the text recomputes the cursor-relative
/// views before it returns.
pub struct CommandMachine<'r> {
    registry: &'r CommandRegistry,
    engine: SuggestionEngine,
    state: MachineState,
    overview_type: ItemType,
    user_abbreviations: IndexMap<String, String>,
    input_text: String,
    caret: usize,
    text_before_cursor: String,
    text_after_cursor: String,
}

impl<'r> CommandMachine<'r> {
    pub fn new(
        registry: &'r CommandRegistry,
        overview_type: ItemType,
        user_abbreviations: IndexMap<String, String>,
    ) -> Self {
        let mut machine = CommandMachine {
            registry,
            engine: SuggestionEngine::new(),
            state: MachineState::Idle,
            overview_type,
            user_abbreviations,
            input_text: String::new(),
            caret: 0,
            text_before_cursor: String::new(),
            text_after_cursor: String::new(),
        };
        machine.rebuild_engine();
        machine
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.input_text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn text_before_cursor(&self) -> &str {
        &self.text_before_cursor
    }

    pub fn text_after_cursor(&self) -> &str {
        &self.text_after_cursor
    }

    pub fn ghost(&self) -> &str {
        self.engine.ghost()
    }

    pub fn candidates(&self) -> &[String] {
        self.engine.candidates()
    }

    pub fn selected_index(&self) -> isize {
        self.engine.selected_index()
    }

    pub fn overview_type(&self) -> ItemType {
        self.overview_type
    }

    // -----------------------------------------------------------------------
    // Context changes
    // -----------------------------------------------------------------------

    /// Changing the overview context changes which commands exist, so the
    /// prefix index is rebuilt and suggestions recomputed in place.
    pub fn set_overview_type(&mut self, overview_type: ItemType) {
        self.overview_type = overview_type;
        self.rebuild_engine();
        if self.state == MachineState::Suggesting {
            self.engine.update(&self.input_text, self.caret);
        }
    }

    fn rebuild_engine(&mut self) {
        let names = self.registry.list_names(self.overview_type);
        let mut abbreviations = self.registry.abbreviations();
        for (name, alias) in &self.user_abbreviations {
            abbreviations.insert(name.clone(), alias.clone());
        }
        self.engine.rebuild(&names, &abbreviations);
    }

    // -----------------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, event: InputEvent) -> Handled {
        match event {
            InputEvent::TextChanged { text, caret } => {
                self.sync_input(text, caret);
                self.reclassify();
                Handled::Consumed
            }
            InputEvent::CursorMoved { caret } => {
                self.sync_input(self.input_text.clone(), caret);
                self.reclassify();
                Handled::Consumed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::ProjectSelected { name } | InputEvent::CollectionSelected { name } => {
                if self.state == MachineState::ArgumentSelection {
                    self.insert_picked_name(&name);
                    Handled::Consumed
                } else {
                    Handled::Ignored
                }
            }
            InputEvent::PopoverClosed => {
                if self.state == MachineState::ArgumentSelection {
                    self.state = MachineState::Suggesting;
                    self.engine.update(&self.input_text, self.caret);
                    Handled::Consumed
                } else {
                    Handled::Ignored
                }
            }
            InputEvent::CommandExecuted => {
                self.reset();
                Handled::Consumed
            }
        }
    }

    fn handle_key(&mut self, key: Key) -> Handled {
        match key {
            // Submit bypasses suggestion handling from every state
            Key::Submit => {
                self.engine.clear();
                self.state = MachineState::Idle;
                Handled::Submit
            }
            Key::Escape => match self.state {
                MachineState::ArgumentSelection => {
                    self.state = MachineState::Suggesting;
                    self.engine.update(&self.input_text, self.caret);
                    Handled::Consumed
                }
                MachineState::Suggesting | MachineState::Typing => {
                    self.engine.clear();
                    self.state = MachineState::Idle;
                    Handled::Consumed
                }
                _ => Handled::Ignored,
            },
            Key::Tab => {
                if self.state != MachineState::Suggesting {
                    return Handled::Ignored;
                }
                if !self.engine.ghost().is_empty() {
                    self.commit_ghost();
                    return Handled::Consumed;
                }
                match self.engine.candidates() {
                    [] => {}
                    // A list collapsed to one element commits directly
                    [only] => {
                        let name = only.clone();
                        self.commit_candidate(&name);
                        return Handled::Consumed;
                    }
                    _ => {
                        self.engine.cycle();
                        return Handled::Consumed;
                    }
                }
                if self.typed_picker_command().is_some()
                    || content::has_partial_project_tag(&self.text_before_cursor)
                {
                    self.state = MachineState::ArgumentSelection;
                    return Handled::Consumed;
                }
                Handled::Ignored
            }
            Key::Enter => {
                if self.state != MachineState::Suggesting {
                    return Handled::Ignored;
                }
                let Some(name) = self.engine.selected_candidate().map(str::to_string) else {
                    return Handled::Ignored;
                };
                self.commit_candidate(&name);
                Handled::Consumed
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal transitions
    // -----------------------------------------------------------------------

    /// Mirror a text/caret change and refresh the cursor-relative views.
    fn sync_input(&mut self, text: String, caret: usize) {
        let caret = caret.min(text::char_len(&text));
        let (before, after) = text::split_at_char(&text, caret);
        self.text_before_cursor = before.to_string();
        self.text_after_cursor = after.to_string();
        self.input_text = text;
        self.caret = caret;
    }

    /// Decide between `typing` and `suggesting` after an input change.
    fn reclassify(&mut self) {
        if self.input_text.is_empty() {
            self.engine.clear();
            self.state = MachineState::Idle;
            return;
        }
        self.engine.update(&self.input_text, self.caret);
        if self.looks_like_command() {
            self.state = MachineState::Suggesting;
        } else {
            self.engine.clear();
            self.state = MachineState::Typing;
        }
    }

    fn looks_like_command(&self) -> bool {
        self.text_before_cursor.starts_with('/')
    }

    /// The fully typed command before the caret, when it opens a picker.
    fn typed_picker_command(&self) -> Option<&'static str> {
        let token = self.text_before_cursor.strip_prefix('/')?;
        let token = token.split_whitespace().next().unwrap_or(token);
        self.registry
            .get(token)
            .filter(|def| engine::opens_picker(def.name))
            .map(|def| def.name)
    }

    /// Transient `completing` pass: run the commit, then fall back to
    /// `suggesting` with the views and suggestions recomputed.
    fn commit_ghost(&mut self) {
        self.state = MachineState::Completing;
        if let Some(done) = self.engine.complete(&self.input_text, self.caret) {
            self.sync_input(done.text, done.caret);
        }
        self.state = MachineState::Suggesting;
        self.engine.update(&self.input_text, self.caret);
    }

    fn commit_candidate(&mut self, name: &str) {
        self.state = MachineState::Completing;
        if let Some(done) = self.engine.commit_candidate(&self.input_text, self.caret, name) {
            self.sync_input(done.text, done.caret);
        }
        self.state = MachineState::Suggesting;
        self.engine.update(&self.input_text, self.caret);
    }

    /// A picker choice lands in the text, caret at the end: it completes a
    /// trailing `in #…` tag when one is being typed, otherwise it becomes
    /// the command argument.
    fn insert_picked_name(&mut self, name: &str) {
        self.state = MachineState::Completing;
        let mut new_text = if content::has_partial_project_tag(&self.text_before_cursor) {
            content::apply_project_choice(&self.text_before_cursor, name)
        } else {
            let mut t = self.text_before_cursor.clone();
            if !t.ends_with(' ') {
                t.push(' ');
            }
            t.push_str(name);
            t
        };
        // Caret lands after the insertion; anything past it is kept
        let caret = text::char_len(&new_text);
        new_text.push_str(&self.text_after_cursor);
        self.sync_input(new_text, caret);
        self.state = MachineState::Suggesting;
        self.engine.update(&self.input_text, self.caret);
    }

    /// Back to a blank line after the surrounding application ran the line.
    fn reset(&mut self) {
        self.sync_input(String::new(), 0);
        self.engine.clear();
        self.state = MachineState::Idle;
    }
}
