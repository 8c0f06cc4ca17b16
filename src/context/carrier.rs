//! Immutable, hierarchical context values.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// An immutable chain of typed values.
///
/// Each binding creates a child that points at its parent; lookups walk
/// from the child toward the root and return the nearest value of the
/// requested type. Existing contexts are never modified, so a context can be
/// shared freely between tasks.
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

struct Node {
    parent: Context,
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Return a child context that binds `value` under its type.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Context {
        Context {
            node: Some(Arc::new(Node {
                parent: self.clone(),
                key: TypeId::of::<T>(),
                value: Arc::new(value),
            })),
        }
    }

    /// The nearest value of type `T`, if any ancestor bound one.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        let key = TypeId::of::<T>();
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            if node.key == key {
                return node.value.downcast_ref::<T>();
            }
            current = node.parent.node.as_deref();
        }
        None
    }

    /// The parent context, or `None` for the root.
    pub fn parent(&self) -> Option<&Context> {
        self.node.as_deref().map(|node| &node.parent)
    }

    /// Number of bindings between this context and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("depth", &self.depth()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tenant(&'static str);

    #[derive(Debug, PartialEq)]
    struct Attempt(u32);

    #[test]
    fn test_lookup_walks_to_root() {
        let root = Context::background().with_value(Tenant("acme"));
        let child = root.with_value(Attempt(2));

        assert_eq!(child.value::<Tenant>(), Some(&Tenant("acme")));
        assert_eq!(child.value::<Attempt>(), Some(&Attempt(2)));
        assert_eq!(root.value::<Attempt>(), None);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_nearest_binding_wins() {
        let parent = Context::background().with_value(Attempt(1));
        let child = parent.with_value(Attempt(2));
        let sibling = parent.with_value(Tenant("other"));

        assert_eq!(child.value::<Attempt>(), Some(&Attempt(2)));
        assert_eq!(parent.value::<Attempt>(), Some(&Attempt(1)));
        assert_eq!(sibling.value::<Attempt>(), Some(&Attempt(1)));
    }

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.parent().is_none());
        assert_eq!(ctx.value::<Tenant>(), None);
    }
}
