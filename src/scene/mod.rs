pub mod dsl;
pub mod visual;
