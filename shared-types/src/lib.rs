//! Types shared between the resolver, the input adapters and the CLI.

pub mod contact;
pub mod error;
pub mod match_strength;
pub mod property;

pub use contact::{Address, Contact, UNNAMED_CONTACT};
pub use error::ImportError;
pub use match_strength::MatchStrength;
pub use property::{Property, PropertyRecord};
