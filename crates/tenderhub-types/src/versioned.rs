//! the shape shared by entities that keep a version history.
//!
//! a versioned entity is an id, a version counter starting at 1, a creation
//! timestamp and a set of mutable attributes. every mutation archives the
//! current attributes and produces a new revision with `version + 1`.

use chrono::{DateTime, Utc};

/// first version of every freshly created entity.
pub const INITIAL_VERSION: i32 = 1;

/// an entity whose attribute set is archived on every change.
pub trait Versioned: Sized {
    /// identifier type of the entity.
    type Id: Copy + std::fmt::Display + Send + Sync + 'static;

    /// the mutable attribute set, archived as a whole.
    type Attrs: Clone + Send + 'static;

    /// entity kind used in log fields and error messages.
    const KIND: &'static str;

    /// entity identifier, stable across versions.
    fn id(&self) -> Self::Id;

    /// current version.
    fn version(&self) -> i32;

    /// creation timestamp, stable across versions.
    fn created_at(&self) -> DateTime<Utc>;

    /// current attribute set.
    fn attrs(&self) -> &Self::Attrs;

    /// build the next revision carrying `attrs`.
    ///
    /// the id and creation timestamp are kept and the version is bumped by one.
    fn revise(&self, attrs: Self::Attrs) -> Self;
}
