pub mod geo;
pub mod mappings;
