// Layout and pagination engine.
// Print path: estimator → chunker → planner → PageModel.
// Preview path: measured height → fit check, stamped by FitMonitor generations.
// Everything except handlers and FitMonitor's generation counter is pure and synchronous.

pub mod chunker;
pub mod estimator;
pub mod fit;
pub mod geometry;
pub mod handlers;
pub mod model;
pub mod page_fill;
pub mod planner;
pub mod style;

pub use style::LayoutBudget;
