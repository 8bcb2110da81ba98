//! `Loggable` implementations for std and third-party types.

mod collections;
mod pointers;
mod primitives;
mod time;

#[cfg(feature = "chrono")]
mod datetime;
