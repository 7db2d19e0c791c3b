//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, hex, Base64)
//! - Cookie and bearer credential extraction
//! - Injectable wall clock

pub mod clock;
pub mod cookie;
pub mod crypto;
