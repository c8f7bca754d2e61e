//! Importers Crate
//!
//! Adapters that turn external contact sources into [`Contact`] values and
//! back. Nothing here decides identity; that lives in the `resolver` crate.
//!
//! # Available Importers
//!
//! - `vcf`: vCard files (2.1, 3.0, 4.0)
//! - `properties`: object-store records made of keyed properties
//!
//! # Example
//!
//! ```rust,ignore
//! use importers::{parse_vcf_file, build_properties, slot_keys};
//!
//! let contacts = parse_vcf_file("contacts.vcf")?;
//! let props = build_properties(&contacts[0], &slot_keys("phone", 3), &slot_keys("email", 3));
//! ```

pub mod properties;
pub mod vcf;

pub use properties::{
    build_notes, build_properties, build_record, contact_from_properties, contact_from_record,
    parse_birthday, slot_keys,
};
pub use vcf::{parse_file as parse_vcf_file, VcfParser};

// Re-export the shared contact types for convenience
pub use shared_types::{Contact, ImportError};
