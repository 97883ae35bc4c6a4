use crate::context::ContextSnapshot;
use crate::error::PropertyError;
use std::fmt;
use std::sync::Arc;

/// A property computed from the context snapshot at resolution time.
pub type ComputeFn<T> = Arc<dyn Fn(&ContextSnapshot) -> Result<T, PropertyError> + Send + Sync>;

/// A field-descriptor property that is either a literal or a function of the context.
///
/// This is the only place that discriminates between the two: every other
/// component calls [`Prop::resolve`] and never cares where a value came from.
pub enum Prop<T> {
    Literal(T),
    Computed(ComputeFn<T>),
}

impl<T: Clone + 'static> Prop<T> {
    pub fn literal(value: T) -> Self {
        Prop::Literal(value)
    }

    /// A computed property that cannot fail.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ContextSnapshot) -> T + Send + Sync + 'static,
    {
        Prop::Computed(Arc::new(move |ctx: &ContextSnapshot| -> Result<T, PropertyError> {
            Ok(f(ctx))
        }))
    }

    /// A computed property that may raise an error while resolving.
    pub fn try_computed<F>(f: F) -> Self
    where
        F: Fn(&ContextSnapshot) -> Result<T, PropertyError> + Send + Sync + 'static,
    {
        Prop::Computed(Arc::new(f))
    }

    pub fn resolve(&self, ctx: &ContextSnapshot) -> Result<T, PropertyError> {
        match self {
            Prop::Literal(value) => Ok(value.clone()),
            Prop::Computed(f) => f(ctx),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Prop::Computed(_))
    }

    pub fn as_literal(&self) -> Option<&T> {
        match self {
            Prop::Literal(value) => Some(value),
            Prop::Computed(_) => None,
        }
    }
}

impl<T: Clone> Clone for Prop<T> {
    fn clone(&self) -> Self {
        match self {
            Prop::Literal(value) => Prop::Literal(value.clone()),
            Prop::Computed(f) => Prop::Computed(Arc::clone(f)),
        }
    }
}

impl<T: Default> Default for Prop<T> {
    fn default() -> Self {
        Prop::Literal(T::default())
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Prop::Literal(value)
    }
}

impl From<&str> for Prop<String> {
    fn from(value: &str) -> Self {
        Prop::Literal(value.to_string())
    }
}

impl<T: fmt::Debug> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Prop::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}
