use crate::element::Priority;
use crate::error::CollectionError;
use crate::flags::PriorityCollectionFlags;
use crate::prioritised::{IntoIter, Iter, PrioritisedCollection, PrioritisesElements};
use crate::queue::PriorityQueue;
use crate::stack::PriorityStack;
use core::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

/// A double-ended prioritised collection.
///
/// # Overview
/// Both ends are readable: `first` is the lowest element under the active ordering,
/// `last` the highest. The deque can be turned into any of the single-ended roles
/// with the `as_*` conversions; each returns an independent deep copy.
///
/// # Insertion end
/// [`add_first`](Self::add_first) and [`add_last`](Self::add_last) do **not** choose an
/// end. Both behave exactly like `add`: the priority decides where the element goes.
pub struct PriorityDeque<T, const N: usize = 8> {
    inner: PrioritisedCollection<T, N>,
}

impl<T, const N: usize> PriorityDeque<T, N> {
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

    // --- Access ---

    pub fn peek_first(&self) -> Option<Option<&T>> {
        self.inner.peek_first()
    }

    pub fn peek_last(&self) -> Option<Option<&T>> {
        self.inner.peek_last()
    }

    pub fn poll_first(&mut self) -> Option<Option<T>> {
        self.inner.poll_first()
    }

    pub fn poll_last(&mut self) -> Option<Option<T>> {
        self.inner.poll_last()
    }
}

impl<T: PartialEq, const N: usize> PriorityDeque<T, N> {
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

    /// Same as `add`; the element is placed by priority, not at the front.
    pub fn add_first(
        &mut self,
        element: impl Into<Option<T>>,
        priority: impl Into<Priority>,
    ) -> Result<bool, CollectionError> {
        self.inner.add(element, priority)
    }

    /// Same as `add`; the element is placed by priority, not at the back.
    pub fn add_last(
        &mut self,
        element: impl Into<Option<T>>,
        priority: impl Into<Priority>,
    ) -> Result<bool, CollectionError> {
        self.inner.add(element, priority)
    }
}

impl<T: Clone, const N: usize> PriorityDeque<T, N> {
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

    pub fn to_vec(&self) -> Vec<Option<T>> {
        self.inner.to_vec()
    }

    // --- Conversions ---

    /// A plain FIFO snapshot: the front of the returned queue is `peek_first`.
    /// Priorities are dropped.
    pub fn as_queue(&self) -> VecDeque<Option<T>> {
        self.inner.iter().map(|e| e.cloned()).collect()
    }

    /// A plain LIFO snapshot: `Vec::pop` yields `peek_last` first.
    /// Priorities are dropped.
    pub fn as_stack(&self) -> Vec<Option<T>> {
        self.inner.to_vec()
    }

    /// A priority queue holding the same entries, flags, duplicate rule and comparator.
    pub fn as_priority_queue(&self) -> PriorityQueue<T, N> {
        PriorityQueue::from_collection(self.inner.clone())
    }

    /// A priority stack holding the same entries, flags, duplicate rule and comparator.
    pub fn as_priority_stack(&self) -> PriorityStack<T, N> {
        PriorityStack::from_collection(self.inner.clone())
    }
}

impl<T: PartialEq, const N: usize> PrioritisesElements<T, N> for PriorityDeque<T, N> {
    fn collection(&self) -> &PrioritisedCollection<T, N> {
        &self.inner
    }
    fn collection_mut(&mut self) -> &mut PrioritisedCollection<T, N> {
        &mut self.inner
    }
}

impl<T, const N: usize> From<PriorityQueue<T, N>> for PriorityDeque<T, N> {
    fn from(queue: PriorityQueue<T, N>) -> Self {
        Self::from_collection(queue.into_collection())
    }
}

impl<T, const N: usize> From<PriorityStack<T, N>> for PriorityDeque<T, N> {
    fn from(stack: PriorityStack<T, N>) -> Self {
        Self::from_collection(stack.into_collection())
    }
}

impl<T, const N: usize> Default for PriorityDeque<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for PriorityDeque<T, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for PriorityDeque<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: PartialEq, const N: usize> Extend<T> for PriorityDeque<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T: PartialEq, const N: usize> FromIterator<T> for PriorityDeque<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_collection(iter.into_iter().collect())
    }
}

impl<T, const N: usize> IntoIterator for PriorityDeque<T, N> {
    type Item = Option<T>;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PriorityDeque<T, N> {
    type Item = Option<&'a T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
