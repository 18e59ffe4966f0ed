//! Tabletop Core - Component trees and a small query language for board games
//!
//! Game state is a tree of [`Entity`] values: leaf [`Component`]s holding
//! named [`Value`]s and [`Zone`]s owning ordered children. Zones are searched
//! and transformed with [`Predicate`]s, built either from query text such as
//! `"type == 'card' and 1 <= cost <= 3"` or from native callbacks.
//!
//! ```
//! use tabletop_core::{Component, Entity, Zone};
//!
//! let hand = Zone::new()
//!     .with("name", "hand")
//!     .with_child(Component::new().with("name", "ace").with("cost", 1))
//!     .with_child(Component::new().with("name", "king").with("cost", 4));
//!
//! let cheap = hand.search_all_components("cost <= 3").unwrap();
//! assert_eq!(cheap.len(), 1);
//! assert_eq!(cheap[0].get("name").unwrap().to_text(), "ace");
//! ```

pub mod config;
pub mod error;
pub mod predicate;
pub mod property;
pub mod query;
pub mod tree;

pub use crate::config::QueryConfig;
pub use crate::error::{QueryError, Result};
pub use crate::predicate::Predicate;
pub use crate::property::{Properties, Value};
pub use crate::tree::{Component, ComponentId, Entity, Zone};
