pub mod classify;
pub mod common;
pub mod data_loader;
pub mod errors;
pub mod export;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod plan;
pub mod plan_execution;
pub mod table;
pub mod transform;
