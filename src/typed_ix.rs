use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// An index into an arena of `T`s.
///
/// Keeps indices of different arenas apart at the type level; the manual
/// impls avoid requiring any bounds on `T` itself.
pub struct TypedIx<T>(usize, PhantomData<fn() -> T>);

impl<T> TypedIx<T> {
    pub const fn new(index: usize) -> Self {
        Self(index, PhantomData)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl<T> Clone for TypedIx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedIx<T> {}

impl<T> Hash for TypedIx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> Ord for TypedIx<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> PartialOrd for TypedIx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for TypedIx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedIx<T> {}

impl<T> Debug for TypedIx<T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or_default();
        write!(f, "TypedIx<{}>({})", name, self.0)
    }
}

impl<T> Display for TypedIx<T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<T> From<TypedIx<T>> for usize {
    fn from(ix: TypedIx<T>) -> usize {
        ix.0
    }
}
