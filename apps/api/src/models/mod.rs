pub mod resume;
pub mod theme;
