//! Entry and exit evaluation.
//!
//! Both evaluators are pure: prior state in, decision plus successor state
//! out. The engine owns reading and writing the store around them. Neither
//! evaluator branches on trading mode — the flow reading already carries
//! the mode-normalized answers.

pub mod entry;
pub mod exit;

pub use entry::{evaluate_entry, EntryConditions, EntryDecision, EntryEvaluation};
pub use exit::{evaluate_exit, ExitDecision, ExitEvaluation};
