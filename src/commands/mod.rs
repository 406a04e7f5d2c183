pub mod apply;
pub mod info;
pub mod report;
pub mod run;
