//! Service layer for the meuParlamento API.
//!
//! # Components
//!
//! - `parsers` - Author name, party code and archived link parsing
//! - `normalizer` - Raw proposal to client document mapping
//! - `sampling` - Balanced government/opposition batch assembly
//! - `news` - Archived news outlet links for a vote date
//! - `proposals` - Store-backed operations served by the handlers

pub mod news;
pub mod normalizer;
pub mod parsers;
pub mod proposals;
pub mod sampling;

pub use proposals::ProposalService;
