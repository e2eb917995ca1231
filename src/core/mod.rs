pub mod common;
pub mod scheduler;
pub mod server;
pub mod server_pool;
pub mod task;
