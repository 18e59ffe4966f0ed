//! Leaf component: a property store with a visibility gate

use crate::error::Result;
use crate::property::{Properties, Value};
use crate::tree::entity::{ComponentId, Entity};

/// Atomic node of the game tree
#[derive(Debug)]
pub struct Component {
    id: ComponentId,
    properties: Properties,
    visible: bool,
}

impl Component {
    /// Empty, visible component
    pub fn new() -> Self {
        Self::with_properties(Properties::new())
    }

    pub fn with_properties(properties: Properties) -> Self {
        Self {
            id: ComponentId::next(),
            properties,
            visible: true,
        }
    }

    /// Build a component from a JSON object of properties
    pub fn from_json(text: &str) -> Result<Self> {
        let properties: Properties = serde_json::from_str(text)?;
        Ok(Self::with_properties(properties))
    }

    /// Builder form of [`Component::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone is a distinct component: same properties, new identity
impl Clone for Component {
    fn clone(&self) -> Self {
        Self {
            id: ComponentId::next(),
            properties: self.properties.clone(),
            visible: self.visible,
        }
    }
}

impl Entity for Component {
    #[inline]
    fn id(&self) -> ComponentId {
        self.id
    }

    #[inline]
    fn properties(&self) -> &Properties {
        &self.properties
    }

    #[inline]
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    #[inline]
    fn is_visible(&self) -> bool {
        self.visible
    }
}
