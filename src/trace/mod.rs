pub mod generator;
pub mod generic;
pub mod interface;
