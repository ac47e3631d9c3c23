use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, queue};
use unicode_width::UnicodeWidthStr;

use crate::app::{AnchorMeasure, AppContext, MonospaceMeasure, ViewState};
use crate::cli::output;
use crate::command::{self, CommandRegistry};
use crate::model::AppConfig;
use crate::store::{ItemStore, JsonStore};
use crate::suggest::{CommandMachine, Handled, InputEvent, Key, MachineState};
use crate::util::text;

const PROMPT: &str = "> ";

/// The project picker opened by Tab on `/projects` or `/tasks-in`.
struct PickerState {
    names: Vec<String>,
    selected: usize,
    /// Where the popover anchors, in terminal cells
    anchor_left: u16,
}

/// Interactive chat-style session: one prompt line, ghost text after the
/// caret, candidate cycling, and a picker for project arguments. Owns the
/// live text through the machine; the terminal is only ever a view of it.
struct Session<'r> {
    machine: CommandMachine<'r>,
    registry: &'r CommandRegistry,
    store: JsonStore,
    view: ViewState,
    picker: Option<PickerState>,
    should_quit: bool,
}

/// Run the interactive session until Ctrl+C / Ctrl+D.
pub fn run(data_path: &Path, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = CommandRegistry::builtin()?;
    let store = JsonStore::open(data_path)?;
    let view = ViewState::new();
    let machine = CommandMachine::new(&registry, view.overview_type, config.abbreviations.clone());

    let mut session = Session {
        machine,
        registry: &registry,
        store,
        view,
        picker: None,
        should_quit: false,
    };

    enable_raw_mode()?;
    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        original_hook(panic_info);
    }));

    let result = session.event_loop();

    disable_raw_mode()?;
    execute!(io::stdout(), Print("\r\n"))?;
    result
}

impl Session<'_> {
    fn event_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = io::stdout();
        loop {
            self.render(&mut out)?;

            if event::poll(Duration::from_millis(250))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code, key.modifiers)?;
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // The picker swallows navigation keys while open
        if self.picker.is_some() {
            return self.handle_picker_key(code);
        }

        match (modifiers, code) {
            (m, KeyCode::Char('c') | KeyCode::Char('d'))
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            // The whole-line submit chord, distinct from Enter
            (m, KeyCode::Char('j')) if m.contains(KeyModifiers::CONTROL) => {
                if self.machine.handle(InputEvent::Key(Key::Submit)) == Handled::Submit {
                    self.submit()?;
                }
            }
            (m, KeyCode::Enter) if m.contains(KeyModifiers::ALT) => {
                if self.machine.handle(InputEvent::Key(Key::Submit)) == Handled::Submit {
                    self.submit()?;
                }
            }
            (_, KeyCode::Tab) => {
                self.machine.handle(InputEvent::Key(Key::Tab));
                if self.machine.state() == MachineState::ArgumentSelection {
                    self.open_picker();
                }
            }
            (_, KeyCode::Enter) => {
                if self.machine.handle(InputEvent::Key(Key::Enter)) == Handled::Ignored {
                    self.submit()?;
                }
            }
            (_, KeyCode::Esc) => {
                self.machine.handle(InputEvent::Key(Key::Escape));
            }
            (_, KeyCode::Backspace) => {
                let (new_text, caret) =
                    text::remove_before(self.machine.text(), self.machine.caret());
                self.machine.handle(InputEvent::TextChanged {
                    text: new_text,
                    caret,
                });
            }
            (m, KeyCode::Left) if m.contains(KeyModifiers::CONTROL) => {
                let caret = text::prev_word_start(self.machine.text(), self.machine.caret());
                self.machine.handle(InputEvent::CursorMoved { caret });
            }
            (m, KeyCode::Right) if m.contains(KeyModifiers::CONTROL) => {
                let caret = text::next_word_end(self.machine.text(), self.machine.caret());
                self.machine.handle(InputEvent::CursorMoved { caret });
            }
            (_, KeyCode::Left) => {
                let caret = self.machine.caret().saturating_sub(1);
                self.machine.handle(InputEvent::CursorMoved { caret });
            }
            (_, KeyCode::Right) => {
                let caret = (self.machine.caret() + 1).min(text::char_len(self.machine.text()));
                self.machine.handle(InputEvent::CursorMoved { caret });
            }
            (_, KeyCode::Home) => {
                self.machine.handle(InputEvent::CursorMoved { caret: 0 });
            }
            (_, KeyCode::End) => {
                let caret = text::char_len(self.machine.text());
                self.machine.handle(InputEvent::CursorMoved { caret });
            }
            (_, KeyCode::Char(c)) => {
                let new_text = text::insert_at(self.machine.text(), self.machine.caret(), &c.to_string());
                let caret = self.machine.caret() + 1;
                self.machine.handle(InputEvent::TextChanged {
                    text: new_text,
                    caret,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> Result<(), Box<dyn std::error::Error>> {
        let Some(picker) = &mut self.picker else {
            return Ok(());
        };
        match code {
            KeyCode::Up => {
                picker.selected = picker.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if picker.selected + 1 < picker.names.len() {
                    picker.selected += 1;
                }
            }
            KeyCode::Enter => {
                let name = picker.names[picker.selected].clone();
                self.picker = None;
                self.machine.handle(InputEvent::ProjectSelected { name });
            }
            KeyCode::Esc => {
                self.picker = None;
                self.machine.handle(InputEvent::PopoverClosed);
            }
            _ => {}
        }
        Ok(())
    }

    fn open_picker(&mut self) {
        let names: Vec<String> = self.store.projects().into_iter().map(|p| p.name).collect();
        if names.is_empty() {
            self.machine.handle(InputEvent::PopoverClosed);
            return;
        }
        let width = terminal::size().map(|(w, _)| w).unwrap_or(80);
        let measure = MonospaceMeasure {
            row: 0,
            col: PROMPT.len() as u16,
            width,
        };
        let anchor = measure.compute_anchor_position(self.machine.caret());
        self.picker = Some(PickerState {
            names,
            selected: 0,
            anchor_left: anchor.left,
        });
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    fn submit(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let line = self.machine.text().trim().to_string();
        if line.is_empty() {
            return Ok(());
        }
        let mut ctx = AppContext {
            store: &mut self.store,
            view: &mut self.view,
        };
        // The session keeps no multi-selection; item actions decline cleanly
        let classification = command::classify_and_run(self.registry, &line, &mut ctx, None)?;
        let outcome = output::outcome_line(&classification);

        let mut out = io::stdout();
        execute!(
            out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(PROMPT),
            Print(&line),
            Print("\r\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(&outcome),
            ResetColor,
            Print("\r\n"),
        )?;

        // A command may have changed the overview context
        self.machine.set_overview_type(self.view.overview_type);
        self.machine.handle(InputEvent::CommandExecuted);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(PROMPT),
            Print(self.machine.text()),
        )?;

        if !self.machine.ghost().is_empty() {
            queue!(
                out,
                SetForegroundColor(Color::DarkGrey),
                Print(self.machine.ghost()),
                ResetColor,
            )?;
        }

        if let Some(picker) = &self.picker {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
            queue!(out, cursor::MoveToColumn(picker.anchor_left), Print(" {"))?;
            for (i, name) in picker.names.iter().enumerate() {
                if i > 0 {
                    queue!(out, Print(" | "))?;
                }
                if i == picker.selected {
                    queue!(out, SetForegroundColor(Color::White), Print(name))?;
                    queue!(out, SetForegroundColor(Color::DarkGrey))?;
                } else {
                    queue!(out, Print(name))?;
                }
            }
            queue!(out, Print("}"), ResetColor)?;
        } else if !self.machine.candidates().is_empty() {
            queue!(out, SetForegroundColor(Color::DarkGrey), Print("  ["))?;
            for (i, name) in self.machine.candidates().iter().enumerate() {
                if i > 0 {
                    queue!(out, Print(" | "))?;
                }
                if i as isize == self.machine.selected_index() {
                    queue!(out, SetForegroundColor(Color::White), Print(name))?;
                    queue!(out, SetForegroundColor(Color::DarkGrey))?;
                } else {
                    queue!(out, Print(name))?;
                }
            }
            queue!(out, Print("]"), ResetColor)?;
        }

        let width = terminal::size().map(|(w, _)| w).unwrap_or(80);
        let col = caret_column(self.machine.text(), self.machine.caret(), width);
        queue!(out, cursor::MoveToColumn(col))?;
        out.flush()
    }
}

/// Terminal column of the caret: display width of the prompt plus the text
/// before it, clamped to the last cell. Wide glyphs count as two cells.
fn caret_column(text: &str, caret: usize, width: u16) -> u16 {
    let (before, _) = text::split_at_char(text, caret);
    let col = PROMPT.width() + before.width();
    u16::try_from(col)
        .unwrap_or(u16::MAX)
        .min(width.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_column_counts_display_cells() {
        assert_eq!(caret_column("abc", 0, 80), 2);
        assert_eq!(caret_column("abc", 3, 80), 5);
        // CJK glyphs occupy two cells each
        assert_eq!(caret_column("日本語", 2, 80), 6);
        // Combining marks add no width
        assert_eq!(caret_column("he\u{301}llo", 3, 80), 4);
    }

    #[test]
    fn caret_column_clamps_to_the_terminal_width() {
        let long = "x".repeat(200);
        assert_eq!(caret_column(&long, 200, 80), 79);
        assert_eq!(caret_column("日本語", 3, 6), 5);
    }
}
