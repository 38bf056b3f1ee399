pub mod invoke;
pub mod operations;
