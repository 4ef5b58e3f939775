pub mod common;
pub mod domain;
pub mod path;
pub mod port;
