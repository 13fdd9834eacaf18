//! In-memory repository implementations for tests and local runs.

mod players;

pub use players::InMemoryPlayerRepository;
