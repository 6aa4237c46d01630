//! Core foundation: value types shared by every layer.

pub mod types;
