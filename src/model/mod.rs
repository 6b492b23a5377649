pub mod competitor_chain;
pub mod constants;
pub mod observation;
pub mod rating_engine;
pub mod rating_node;
pub mod structures;
pub mod tridiagonal;
