pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod es;
pub mod logging;
pub mod pipeline;
pub mod source;
