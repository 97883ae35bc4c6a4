pub mod formatter;
pub mod node;

pub use formatter::*;
pub use node::*;
