pub mod fetch;
pub mod unpack;
