pub mod account;
pub mod config;

pub use account::{AccountDescriptor, AccountState, AccountStatus};
pub use config::{AccountEntry, AppConfig};
