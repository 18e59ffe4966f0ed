//! Depth-first pre-order walks over a component tree

use crate::error::Result;
use crate::predicate::Predicate;
use crate::tree::entity::Entity;
use smallvec::{smallvec, SmallVec};

/// Pending nodes; most game trees stay shallow enough to never spill
type Stack<'a> = SmallVec<[&'a dyn Entity; 32]>;

/// Children are pushed in reverse so they pop in insertion order
#[inline]
fn push_children<'a>(stack: &mut Stack<'a>, entity: &'a dyn Entity) {
    if let Some(children) = entity.children() {
        for child in children.iter().rev() {
            stack.push(&**child);
        }
    }
}

/// First entity matching `predicate`, visiting `root` before its children
pub fn find_first<'a>(
    root: &'a dyn Entity,
    predicate: &Predicate,
) -> Result<Option<&'a dyn Entity>> {
    let mut stack: Stack<'a> = smallvec![root];

    while let Some(entity) = stack.pop() {
        if predicate.test(entity)? {
            return Ok(Some(entity));
        }
        push_children(&mut stack, entity);
    }

    Ok(None)
}

/// Every entity matching `predicate`, in pre-order
pub fn collect_all<'a>(
    root: &'a dyn Entity,
    predicate: &Predicate,
) -> Result<Vec<&'a dyn Entity>> {
    let mut stack: Stack<'a> = smallvec![root];
    let mut found = Vec::new();

    while let Some(entity) = stack.pop() {
        if predicate.test(entity)? {
            found.push(entity);
        }
        push_children(&mut stack, entity);
    }

    Ok(found)
}

/// Every entity of the tree, in pre-order
pub fn walk<'a>(root: &'a dyn Entity) -> Vec<&'a dyn Entity> {
    let mut stack: Stack<'a> = smallvec![root];
    let mut found = Vec::new();

    while let Some(entity) = stack.pop() {
        found.push(entity);
        push_children(&mut stack, entity);
    }

    found
}

/// Run `transform` on every entity, in pre-order
pub fn visit_in_place(entity: &mut dyn Entity, transform: &mut dyn FnMut(&mut dyn Entity)) {
    transform(&mut *entity);

    if let Some(children) = entity.children_mut() {
        for child in children.iter_mut() {
            visit_in_place(&mut **child, transform);
        }
    }
}

/// Run `transform` on every matching entity, in pre-order.
///
/// A node is transformed before its children are read, so children a
/// transform adds to its own target are visited too.
pub fn apply_in_place(
    entity: &mut dyn Entity,
    transform: &mut dyn FnMut(&mut dyn Entity),
    predicate: &Predicate,
) -> Result<()> {
    if predicate.test(&*entity)? {
        transform(&mut *entity);
    }

    if let Some(children) = entity.children_mut() {
        for child in children.iter_mut() {
            apply_in_place(&mut **child, transform, predicate)?;
        }
    }

    Ok(())
}
