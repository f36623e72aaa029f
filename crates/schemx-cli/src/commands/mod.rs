pub mod project;
pub mod workspace;
