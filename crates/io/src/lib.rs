// File I/O operations

pub mod csv;
pub mod encoding;

pub use crate::csv::{render_records, write_atomic, write_records};
pub use crate::encoding::{read_input, InputEncoding, OutputEncoding};
