//! Document analysis - text model, completion context detection

pub mod context;
pub mod text;
