pub mod booth;
pub mod filters;
pub mod pipeline;
