pub mod change_request;
pub mod pipeline;
pub mod review;
pub mod stage;
