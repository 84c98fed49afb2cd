pub mod client;
pub mod config;
pub mod exporters;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod reporter;
pub mod utils;
pub mod validators;
pub mod wizard;

#[cfg(feature = "desktop")]
mod desktop;

#[cfg(feature = "desktop")]
pub use desktop::run;
