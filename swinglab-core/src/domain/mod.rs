//! Domain types for the swing decision engine.

pub mod decision;
pub mod flow;
pub mod position;
pub mod snapshot;

pub use decision::{Action, Decision, Reason};
pub use flow::FlowReading;
pub use position::PositionState;
pub use snapshot::IndicatorSnapshot;

/// Symbol type alias
pub type Symbol = String;
