//! Observable value cells.
//!
//! A [`Writable`] holds one value and pushes every change to its
//! subscribers synchronously, in the order they subscribed.

mod writable;

pub use writable::{Subscription, Writable};
