//! Zone: a component that owns an ordered list of children

use crate::error::Result;
use crate::predicate::Predicate;
use crate::property::{Properties, Value};
use crate::tree::component::Component;
use crate::tree::entity::{ComponentId, Entity};
use crate::tree::traversal;
use tracing::trace;

/// Composite node of the game tree (board, hand, deck, player area...)
#[derive(Debug, Default)]
pub struct Zone {
    base: Component,
    children: Vec<Box<dyn Entity>>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Properties) -> Self {
        Self {
            base: Component::with_properties(properties),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Zone::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.set(name, value);
        self
    }

    /// Builder form of [`Zone::add`]
    pub fn with_child(mut self, child: impl Entity + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.base.set(name, value);
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.base.set_visible(visible);
        self
    }

    /// Append a child after the existing ones
    pub fn add(&mut self, child: impl Entity + 'static) -> &mut Self {
        self.add_boxed(Box::new(child))
    }

    pub fn add_boxed(&mut self, child: Box<dyn Entity>) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Remove the first direct child with this id; unknown ids are ignored
    pub fn remove(&mut self, id: ComponentId) -> &mut Self {
        if self.take(id).is_none() {
            trace!(zone = %self.id(), child = %id, "remove ignored, no such child");
        }
        self
    }

    /// Remove the first direct child with this id and hand it back
    pub fn take(&mut self, id: ComponentId) -> Option<Box<dyn Entity>> {
        let index = self.children.iter().position(|child| child.id() == id)?;
        Some(self.children.remove(index))
    }

    /// Direct child with this id
    pub fn child(&self, id: ComponentId) -> Option<&dyn Entity> {
        self.iter().find(|child| child.id() == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.children.iter().map(|child| &**child as &dyn Entity)
    }

    /// First entity of this subtree matching `predicate`, the zone itself
    /// included, in depth-first pre-order
    pub fn search_component(
        &self,
        predicate: impl Into<Predicate>,
    ) -> Result<Option<&dyn Entity>> {
        traversal::find_first(self, &predicate.into())
    }

    /// Every entity of this subtree matching `predicate`, in depth-first
    /// pre-order
    pub fn search_all_components(
        &self,
        predicate: impl Into<Predicate>,
    ) -> Result<Vec<&dyn Entity>> {
        traversal::collect_all(self, &predicate.into())
    }

    /// Every entity of this subtree, the zone first, in depth-first pre-order
    pub fn all_components(&self) -> Vec<&dyn Entity> {
        traversal::walk(self)
    }

    /// Run `transform` on every matching entity of this subtree, in the
    /// same order as [`Zone::search_all_components`]
    pub fn apply<F>(
        &mut self,
        mut transform: F,
        predicate: impl Into<Predicate>,
    ) -> Result<&mut Self>
    where
        F: FnMut(&mut dyn Entity),
    {
        traversal::apply_in_place(self, &mut transform, &predicate.into())?;
        Ok(self)
    }

    /// Run `transform` on every entity of this subtree, the zone first
    pub fn apply_all<F>(&mut self, mut transform: F) -> &mut Self
    where
        F: FnMut(&mut dyn Entity),
    {
        traversal::visit_in_place(self, &mut transform);
        self
    }
}

impl Entity for Zone {
    #[inline]
    fn id(&self) -> ComponentId {
        self.base.id()
    }

    #[inline]
    fn properties(&self) -> &Properties {
        self.base.properties()
    }

    #[inline]
    fn properties_mut(&mut self) -> &mut Properties {
        self.base.properties_mut()
    }

    #[inline]
    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn children(&self) -> Option<&[Box<dyn Entity>]> {
        Some(&self.children)
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Entity>>> {
        Some(&mut self.children)
    }
}
