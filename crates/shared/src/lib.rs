pub mod display;
pub mod domain;
pub mod protocol;
