use crate::error::CollectionError;
use crate::flags::PriorityCollectionFlags;
use crate::prioritised::{IntoIter, Iter, PrioritisedCollection, PrioritisesElements};
use core::cmp::Ordering;
use std::fmt;

/// A queue that hands out its elements lowest-first under the active ordering.
///
/// Elements are read and removed at the head (`peek_first` / `poll_first`). Where an
/// element lands is decided by its priority, not by when it was added; elements that
/// compare equal come out in insertion order.
pub struct PriorityQueue<T, const N: usize = 8> {
    inner: PrioritisedCollection<T, N>,
}

impl<T, const N: usize> PriorityQueue<T, N> {
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

    /// The head of the queue. `Some(None)` is a null head.
    pub fn peek_first(&self) -> Option<Option<&T>> {
        self.inner.peek_first()
    }

    pub fn poll_first(&mut self) -> Option<Option<T>> {
        self.inner.poll_first()
    }
}

impl<T: PartialEq, const N: usize> PriorityQueue<T, N> {
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

impl<T: Clone, const N: usize> PriorityQueue<T, N> {
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
}

impl<T: PartialEq, const N: usize> PrioritisesElements<T, N> for PriorityQueue<T, N> {
    fn collection(&self) -> &PrioritisedCollection<T, N> {
        &self.inner
    }
    fn collection_mut(&mut self) -> &mut PrioritisedCollection<T, N> {
        &mut self.inner
    }
}

impl<T, const N: usize> Default for PriorityQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for PriorityQueue<T, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for PriorityQueue<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: PartialEq, const N: usize> Extend<T> for PriorityQueue<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T: PartialEq, const N: usize> FromIterator<T> for PriorityQueue<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_collection(iter.into_iter().collect())
    }
}

impl<T, const N: usize> IntoIterator for PriorityQueue<T, N> {
    type Item = Option<T>;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PriorityQueue<T, N> {
    type Item = Option<&'a T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Iterator returned by [`PriorityQueue::drain`].
pub struct PriorityQueueDrain<'a, T, const N: usize> {
    queue: &'a mut PriorityQueue<T, N>,
}

impl<T, const N: usize> PriorityQueue<T, N> {
    /// Polls elements head first. Elements not consumed stay in the queue.
    pub fn drain(&mut self) -> PriorityQueueDrain<'_, T, N> {
        PriorityQueueDrain { queue: self }
    }
}

impl<T, const N: usize> Iterator for PriorityQueueDrain<'_, T, N> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.poll_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.inner.len();
        (len, Some(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Priority, PriorityLookup};

    type F = PriorityCollectionFlags;

    #[test]
    fn test_queue_polls_lowest_first() {
        let mut queue: PriorityQueue<&str> = PriorityQueue::new();
        queue.add("low", 10).unwrap();
        queue.add("urgent", -1).unwrap();
        queue.add("later", Priority::Keep).unwrap();
        queue.add("mid", 5).unwrap();

        assert_eq!(queue.peek_first(), Some(Some(&"urgent")));
        assert_eq!(queue.poll_first(), Some(Some("urgent")));
        assert_eq!(queue.poll_first(), Some(Some("mid")));
        assert_eq!(queue.poll_first(), Some(Some("low")));
        assert_eq!(queue.poll_first(), Some(Some("later")));
        assert_eq!(queue.poll_first(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_desc_order() {
        let mut queue: PriorityQueue<i32> = PriorityQueue::with_flags(F::DESC_ORDER).unwrap();
        queue.add_all([1, 2], 1).unwrap();
        queue.add(3, 7).unwrap();
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_queue_equal_priorities_fifo() {
        let mut queue: PriorityQueue<i32, 2> = PriorityQueue::new();
        for i in 0..5 {
            queue.add(i, 0).unwrap();
        }
        assert!(!queue.is_on_stack());
        let mut drain = queue.drain();
        assert_eq!(drain.size_hint(), (5, Some(5)));
        assert_eq!(drain.next(), Some(Some(0)));
        assert_eq!(drain.next(), Some(Some(1)));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_queue_no_null() {
        let mut queue: PriorityQueue<i32> = PriorityQueue::with_flags(F::NO_NULL).unwrap();
        assert_eq!(queue.add(None, 1), Err(CollectionError::NullNotAllowed));
        assert!(PriorityQueue::<i32>::from_elements([None], F::NO_NULL).is_err());
    }

    #[test]
    fn test_queue_with_comparator_and_copy() {
        let mut queue: PriorityQueue<i32> = PriorityQueue::new()
            .with_comparator(|a: &i32, b: &i32| (a % 10).cmp(&(b % 10)))
            .without_duplicates();
        queue.add(1, 1).unwrap();
        assert_eq!(queue.add(11, 3), Ok(true));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.priority(&21), PriorityLookup::Found(Some(3)));

        let mut copy = queue.copy();
        copy.add(2, 0).unwrap();
        assert_eq!(copy.to_vec(), vec![Some(2), Some(1)]);
        assert_eq!(queue.to_vec(), vec![Some(1)]);
        assert!(copy.contains(&31));

        let rebuilt = queue.copy_with([5, 15, 6], None).unwrap();
        assert_eq!(rebuilt.to_vec(), vec![Some(5), Some(6)]);
    }

    #[test]
    fn test_queue_copy_with_flags() {
        let queue: PriorityQueue<i32> = PriorityQueue::from_elements([3, 1], F::empty()).unwrap();
        let copy = queue.copy_with_flags(F::NO_PRIORITY_FIRST | F::DESC_ORDER).unwrap();
        assert_eq!(copy.flags(), F::NO_PRIORITY_FIRST | F::DESC_ORDER);
        assert_eq!(copy.to_vec(), vec![Some(3), Some(1)]);
    }

    #[test]
    fn test_queue_traits() {
        let queue: PriorityQueue<i32> = vec![3, 1, 2].into_iter().collect();
        assert_eq!(format!("{:?}", queue), "[Some(3)@-, Some(1)@-, Some(2)@-]");
        assert_eq!((&queue).into_iter().count(), 3);

        let mut q2 = PriorityQueue::<i32>::default();
        q2.extend([4, 5]);
        assert_eq!(q2.into_iter().collect::<Vec<_>>(), vec![Some(4), Some(5)]);

        let collection = queue.into_collection();
        assert_eq!(collection.len(), 3);
    }
}
