pub mod clients;
pub mod projects;
pub mod tokens;
