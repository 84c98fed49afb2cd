pub mod cleaner;
pub mod partition;
