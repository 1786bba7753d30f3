pub mod macros;

pub mod config;
pub mod events;
pub mod nav;
pub mod sys;
