pub mod color;
pub mod file_size;
pub mod uri;
