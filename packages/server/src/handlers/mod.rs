pub mod analysis;
pub mod file;
pub mod health;
