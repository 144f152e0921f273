pub mod compose;
pub mod options;
pub mod parser;

pub use compose::to_hive_url;
pub use options::{ConnectionOptions, ConnectionOptionsBuilder};
pub use parser::parse_url;
