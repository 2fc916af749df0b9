//! Core trait abstractions for the research library.
//!
//! These traits define the seams where applications plug in a search/scrape
//! provider and a language model.

pub mod ai;
pub mod provider;
