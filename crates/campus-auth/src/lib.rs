//! # campus-auth
//!
//! Identity verification for the campus messaging service. Tokens are
//! HS256 JWTs whose claims name an [`Actor`](campus_core::Actor). The
//! encoder mints tokens for development and tests; the decoder turns a
//! bearer token into an authenticated actor.

pub mod jwt;

pub use jwt::{AuthenticatedActor, Claims, JwtDecoder, JwtEncoder};
