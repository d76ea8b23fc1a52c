//! Seeding pipeline for the Conduit store.
//!
//! [`Seeder`] reads a JSON fixture and fills an empty store with users, tags and
//! articles exactly once. The store and the password hasher are traits so the
//! pipeline runs the same against SeaORM ([`DbStore`]) and in memory ([`MemoryStore`]).

pub mod error;
pub mod fixture;
pub mod hasher;
pub mod seeder;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Result, SeedError};
pub use fixture::{ArticleSeed, Fixture, SeedRecord, TagSeed, UserSeed};
pub use hasher::{Argon2Hasher, CredentialHasher};
pub use seeder::{SeedOutcome, SeedSummary, Seeder};
pub use store::{DbStore, MemoryStore, SeedStore};
