mod file_record;
mod file_response;

pub use file_record::*;
pub use file_response::*;
