//! Background analysis: the request worker and the availability poller.

pub mod types;
pub mod worker;
