pub mod context;
pub mod ports;

pub use context::{AppContext, OverviewMode, SelectionContext, ViewState};
pub use ports::{AnchorMeasure, AnchorPosition, MonospaceMeasure};
