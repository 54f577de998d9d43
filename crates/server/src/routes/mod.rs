pub mod health;
pub mod schools;
