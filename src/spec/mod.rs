pub mod conversion;
pub mod definition;
pub mod property;
pub mod wire;

pub use conversion::*;
pub use definition::*;
pub use property::*;
pub use wire::{RawForm, convert_node};
