pub mod access;
pub mod gate;
