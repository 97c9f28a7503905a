/// CLI layer: root option parsing and output formatting.
pub mod args;
pub mod output;

pub use args::{DebugArgs, GlobalArgs, OutputFormat};
pub use output::{Output, resolve_format, write_error};
