pub mod client;
pub mod identity;

pub use client::{QrsClient, QrsSettings};
