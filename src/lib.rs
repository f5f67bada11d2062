//! nrgen - per-architecture Linux syscall number tables
//!
//! This library discovers the syscall names referenced in a Linux source
//! tree, resolves each name to its number on every configured architecture
//! (from `syscall.tbl` files or by probing the UAPI headers through the C
//! preprocessor), and writes one Rust constant table per architecture.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod expr;
pub mod generator;
pub mod headers;
pub mod resolve;
pub mod source;
pub mod table;
pub mod target;
