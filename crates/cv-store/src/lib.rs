//! # cv-store: Repository for CareVault
//!
//! The [`Repository`] trait is everything the metrics and validation code
//! needs from storage. It promises insertion order for access logs and
//! nothing else; retries and caching are the implementation's business.
//!
//! [`InMemoryRepository`] is the only implementation. It keeps everything
//! behind a `parking_lot::RwLock` and loses it on drop. The seeded
//! constructor loads the demo collections with timestamps relative to a
//! caller-supplied "now".

pub mod error;
pub mod memory;
pub mod repository;
pub mod seed;

pub use error::StoreError;
pub use memory::InMemoryRepository;
pub use repository::Repository;
