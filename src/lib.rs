pub mod error;
pub mod printer;
pub mod repl;
pub mod scanner;

pub use error::{NumberError, ScanError};
pub use scanner::{Scan, scan};
