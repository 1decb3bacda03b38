pub mod analyze;
pub mod config;
pub mod open_pr;
pub mod run;
pub mod ticket;
