pub mod regen;
pub mod store;
