//! Component tree: the entity interface, leaf components and zones

mod component;
mod entity;
mod traversal;
mod zone;


pub use component::Component;
pub use entity::{ComponentId, Entity};
pub use zone::Zone;
