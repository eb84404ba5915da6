// Utility functions
pub mod sanitize;
