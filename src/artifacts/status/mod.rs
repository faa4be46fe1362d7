pub mod file_change;
pub mod inspector;
