//! Data models: the account record and the identity it vouches for.

pub mod account;

pub use account::*;
