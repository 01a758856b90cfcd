use crate::error::CollectionError;
use crate::flags::PriorityCollectionFlags;
use crate::prioritised::{IntoIter, Iter, PrioritisedCollection, PrioritisesElements};
use core::cmp::Ordering;
use std::fmt;

/// A stack whose top is the highest element under the active ordering.
///
/// Reads and removals happen at the tail (`peek_last` / `poll_last`). Among elements
/// that compare equal, the most recently added one is on top.
pub struct PriorityStack<T, const N: usize = 8> {
    inner: PrioritisedCollection<T, N>,
}

impl<T, const N: usize> PriorityStack<T, N> {
    pub fn new() -> Self {
        Self {
            inner: PrioritisedCollection::new(),
        }
    }

    pub fn with_flags(flags: impl Into<PriorityCollectionFlags>) -> Result<Self, CollectionError> {
        PrioritisedCollection::with_flags(flags).map(Self::from_collection)
    }

    pub fn with_comparator<F>(self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self::from_collection(self.inner.with_comparator(comparator))
    }

    pub fn without_duplicates(self) -> Self {
        Self::from_collection(self.inner.without_duplicates())
    }

    pub(crate) fn from_collection(inner: PrioritisedCollection<T, N>) -> Self {
        Self { inner }
    }

    pub fn into_collection(self) -> PrioritisedCollection<T, N> {
        self.inner
    }

    #[inline]
    pub fn is_on_stack(&self) -> bool {
        self.inner.is_on_stack()
    }

    pub fn peek_last(&self) -> Option<Option<&T>> {
        self.inner.peek_last()
    }

    pub fn poll_last(&mut self) -> Option<Option<T>> {
        self.inner.poll_last()
    }
}

impl<T: PartialEq, const N: usize> PriorityStack<T, N> {
    pub fn from_elements<I, E>(
        elements: I,
        flags: impl Into<PriorityCollectionFlags>,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        PrioritisedCollection::from_elements(elements, flags).map(Self::from_collection)
    }
}

impl<T: Clone, const N: usize> PriorityStack<T, N> {
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn copy_with<I, E>(
        &self,
        elements: I,
        flags: Option<PriorityCollectionFlags>,
    ) -> Result<Self, CollectionError>
    where
        T: PartialEq,
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        self.inner.copy_with(elements, flags).map(Self::from_collection)
    }

    pub fn copy_with_flags(
        &self,
        flags: impl Into<PriorityCollectionFlags>,
    ) -> Result<Self, CollectionError> {
        self.inner.copy_with_flags(flags).map(Self::from_collection)
    }

    /// Elements bottom to top.
    pub fn to_vec(&self) -> Vec<Option<T>> {
        self.inner.to_vec()
    }
}

impl<T: PartialEq, const N: usize> PrioritisesElements<T, N> for PriorityStack<T, N> {
    fn collection(&self) -> &PrioritisedCollection<T, N> {
        &self.inner
    }
    fn collection_mut(&mut self) -> &mut PrioritisedCollection<T, N> {
        &mut self.inner
    }
}

impl<T, const N: usize> Default for PriorityStack<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for PriorityStack<T, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for PriorityStack<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: PartialEq, const N: usize> Extend<T> for PriorityStack<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T: PartialEq, const N: usize> FromIterator<T> for PriorityStack<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_collection(iter.into_iter().collect())
    }
}

impl<T, const N: usize> IntoIterator for PriorityStack<T, N> {
    type Item = Option<T>;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PriorityStack<T, N> {
    type Item = Option<&'a T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
