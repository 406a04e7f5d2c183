pub mod command;
pub mod size;
pub mod table;

pub use command::*;
pub use size::*;
pub use table::*;
