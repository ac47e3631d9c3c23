pub mod engine;
pub mod machine;
pub mod prefix;

pub use engine::{Completion, SuggestionEngine, TASK_STATES};
pub use machine::{CommandMachine, Handled, InputEvent, Key, MachineState};
pub use prefix::{PrefixEntry, PrefixIndex};
