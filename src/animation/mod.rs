pub mod action;
pub mod ease;
