pub mod config;
pub mod school;
pub mod school_image;
