pub mod client;
pub mod locator;
