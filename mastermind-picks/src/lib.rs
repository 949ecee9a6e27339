pub mod calendar;
pub mod combo;
pub mod config;
pub mod context;
pub mod frequency;
pub mod heat;
pub mod hermes;
pub mod popularity;
pub mod sampler;
pub mod strategy;
