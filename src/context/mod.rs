pub mod accessor;
pub mod snapshot;
pub mod store;

pub use accessor::*;
pub use snapshot::*;
pub use store::*;
