pub mod file_enumerator;
pub mod output_path;
pub mod result_writer;

pub use file_enumerator::{batches, discover, Batches};
pub use output_path::{OutputLayout, OUTPUT_SUFFIX};
pub use result_writer::{ResultWriter, WriteResult};
