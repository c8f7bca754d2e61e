//! Resolver Crate
//!
//! Contact identity resolution: decides whether an incoming contact is
//! already known and, if so, how to fold its data into the existing record.
//!
//! # Components
//!
//! - `normalize`: phone, email, name, address and URL comparison keys
//! - `index`: append-only candidate index keyed by phone, email and name
//! - `classifier`: which candidates count as the same entity
//! - `compare`: graded pairwise match strength for reporting
//! - `merge`: conservative field-level merge
//! - `session`: the import flow tying index, classifier and merge together
//!
//! Everything here is synchronous and in-memory. An index has no internal
//! locking; share one across threads only behind the caller's own lock.
//!
//! # Example
//!
//! ```rust
//! use resolver::{normalize_phone, Contact, ContactIndex};
//!
//! let existing = Contact {
//!     phones: vec!["+1-555-123-4567".to_string()],
//!     ..Contact::named("John Doe")
//! };
//! let index = ContactIndex::new(vec![existing]);
//!
//! let incoming = Contact {
//!     phones: vec!["555-123-4567".to_string()],
//!     ..Contact::named("Johnny Doe")
//! };
//! assert!(index.is_duplicate(&incoming));
//! assert_eq!(normalize_phone("(555) 123-4567"), "551234567");
//! ```

pub mod classifier;
pub mod compare;
pub mod index;
pub mod merge;
pub mod normalize;
pub mod session;

pub use classifier::{accepts_name_match, classify_name_match, has_key_overlap, MatchReason};
pub use compare::compare;
pub use index::{CandidateMatch, ContactId, ContactIndex};
pub use merge::{merge, merge_fields};
pub use normalize::{
    normalize_address, normalize_email, normalize_name, normalize_phone, normalize_url,
};
pub use session::{ImportOptions, ImportOutcome, ImportSession, ImportSummary};

// Re-export the shared contact types for convenience
pub use shared_types::{Contact, MatchStrength};
