mod factory;
pub mod strategy;

pub use factory::ControlFactory;
pub use strategy::*;
