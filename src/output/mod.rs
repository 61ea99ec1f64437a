// src/output/mod.rs
//! Delivery of post text and advice to the terminal, files and the clipboard.
//!
//! A [`DeliveryPlan`] is built first and carried out by [`deliver`], which is
//! the only place here that performs I/O.

mod clipboard;
mod types;
mod writer;

pub use clipboard::copy_to_clipboard;
pub use types::{Delivered, DeliveryPlan, DeliveryReport, DeliveryTarget, FailedDelivery};
pub use writer::deliver;
