pub mod initialize;
pub mod leave;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
