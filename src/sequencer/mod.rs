pub mod canvas;
pub mod deck;
