pub mod file;
pub mod traits;

// Re-export
pub use file::{default_data_dir, FileRepository, FileSubjectRepository};
pub use traits::{Entity, Repository};
