pub mod apply;
pub mod error;
pub mod options;
pub mod planner;
pub mod runner;
pub mod spec;

pub use apply::*;
pub use error::*;
pub use options::*;
pub use planner::*;
pub use runner::*;
pub use spec::*;
