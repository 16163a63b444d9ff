pub mod history;
pub mod plan;
