#![allow(clippy::useless_conversion)]

pub mod school;
