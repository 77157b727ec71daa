pub mod brands;
pub mod generate;
