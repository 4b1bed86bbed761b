//! Business logic: the account lifecycle state machine.

pub mod account;

pub use account::{AccountPolicy, AccountService};
