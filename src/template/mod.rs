pub mod background;
pub mod catalog;
pub mod model;
pub mod recipes;
