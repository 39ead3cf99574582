pub mod context;
pub mod outlet;
pub mod planning;
pub mod synthesis;
pub mod workflow;
