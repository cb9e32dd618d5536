pub mod client;
pub mod project;
pub mod user;

pub use client::ClientRow;
pub use project::{ProjectAssignmentRow, ProjectRow};
pub use user::{User, UserRef};
