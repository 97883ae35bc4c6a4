pub mod compare;
pub mod option;
pub mod path;

pub use compare::*;
pub use option::*;
pub use path::*;
