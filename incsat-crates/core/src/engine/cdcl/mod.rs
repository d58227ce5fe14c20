mod assignments;
mod cdcl_engine;
mod clause_database;
mod conflict_analysis;
mod restart_strategy;
mod variable_selector;
mod watch_lists;

pub use cdcl_engine::CdclEngine;
