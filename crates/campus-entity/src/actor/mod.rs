//! Actor directory entities.

pub mod profile;

pub use profile::ActorProfile;
