pub mod compositor;
pub mod inputs;
pub mod placeholder;
pub mod preview;
