//! Unit tests module
//!
//! Contains unit tests for individual components driven through the public
//! API.

mod matching; // parameter extraction and decoding
mod pattern; // pattern grammar and flags
