pub mod accounts;
pub mod completions;
pub mod run;
pub mod schema;
