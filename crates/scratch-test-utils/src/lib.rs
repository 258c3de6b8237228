//! Test utilities and reusable fixtures for scratch-runtime development.
//!
//! Provides [`clock::FixedClock`] for deterministic frame driving and a
//! handful of pre-built block graphs in [`fixtures`] so scheduler,
//! engine, and ops tests don't each reinvent a `repeat`-loop or
//! `set variable` fixture by hand.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod clock;
pub mod fixtures;

pub use clock::FixedClock;
