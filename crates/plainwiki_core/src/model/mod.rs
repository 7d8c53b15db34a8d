//! Domain model for stored pages.
//!
//! # Responsibility
//! - Define the single content unit the wiki manages.
//! - Own the title character rules shared by routing and storage.
//!
//! # Invariants
//! - A page's durable identity is its title and nothing else.
//! - Two pages with the same title denote the same stored resource.

pub mod page;
