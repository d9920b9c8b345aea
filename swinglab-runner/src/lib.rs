//! SwingLab Runner — backtest orchestration over daily bars.
//!
//! The core engine decides; this crate drives it through history: load
//! daily bars from CSV, replay them day by day per symbol, account for the
//! two-tranche fills the decisions ask for, and report a serializable
//! result with a content-addressed run id. Symbols are independent, so the
//! universe runner fans out across a thread pool.

pub mod config;
pub mod data_loader;
pub mod error;
pub mod replay;
pub mod result;
pub mod universe;

pub use config::RunConfig;
pub use data_loader::{load_bars_csv, DailyBar};
pub use error::RunnerError;
pub use replay::run_backtest;
pub use result::{BacktestResult, TradeRecord};
pub use universe::{run_universe, SymbolBars};
