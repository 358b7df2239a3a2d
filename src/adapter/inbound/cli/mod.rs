//! CLI module graph.

pub mod check;
pub mod command;
pub mod dispatch;
pub mod output;
pub mod report;
pub mod run;
pub mod scan;
