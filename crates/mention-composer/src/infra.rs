pub mod clipboard;
pub mod file_index;
