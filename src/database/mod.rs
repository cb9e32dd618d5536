pub mod manager;
pub mod models;
pub mod queries;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
