pub mod branch;
pub mod change;
pub mod report;
pub mod repository;
pub mod ticket;
