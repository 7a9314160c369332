//! External service clients.

pub mod splunk;
