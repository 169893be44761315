pub mod fold;
pub mod schedule;
