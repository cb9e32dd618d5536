pub mod format;
pub mod shapes;
