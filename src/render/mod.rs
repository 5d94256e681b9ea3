pub mod cover;
pub mod surface;
pub mod text;
