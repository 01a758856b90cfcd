//! The engine shared by every prioritised collection.
//!
//! [`PrioritisedCollection`] owns a sorted [`PriorityStore`] together with the
//! resolved flag policy, the equality comparator and the duplicate rule. The role
//! types ([`PriorityQueue`](crate::PriorityQueue), [`PriorityStack`](crate::PriorityStack),
//! [`PriorityDeque`](crate::PriorityDeque)) wrap it and expose only the ends that make
//! sense for their access pattern. Code that does not care about the role can work
//! against the [`PrioritisesElements`] trait instead.

use crate::comparator::{PrioritisedElementComparator, PriorityComparator, RawComparator};
use crate::element::{PrioritisedElement, Priority, PriorityLookup};
use crate::error::CollectionError;
use crate::flags::{PriorityCollectionFlags, PriorityPolicy};
use crate::store::{PriorityStore, StoreIntoIter};
use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::slice;
use std::fmt;

/// A sorted multiset of optionally prioritised, possibly null elements.
///
/// # Behavior
/// * **Ordering:** every insert re-sorts the store with a stable sort, so the order is
///   observable at all times and equal entries keep their insertion order.
/// * **Nulls:** `None` is the null element. `NO_NULL` makes inserting it an error.
/// * **Duplicates:** allowed by default. With [`without_duplicates`](Self::without_duplicates),
///   adding an element that is already present updates its priority instead.
/// * **Equality:** `PartialEq` unless a raw comparator was supplied.
pub struct PrioritisedCollection<T, const N: usize = 8> {
    store: PriorityStore<T, N>,
    flags: PriorityCollectionFlags,
    ordering: PriorityComparator,
    equality: PrioritisedElementComparator<T>,
    allow_duplicates: bool,
}

impl<T, const N: usize> PrioritisedCollection<T, N> {
    /// Creates an empty collection with the default policy
    /// (`ASC_ORDER | NO_PRIORITY_LAST`).
    pub fn new() -> Self {
        let policy = PriorityPolicy::default();
        Self {
            store: PriorityStore::new(),
            flags: policy.flags(),
            ordering: PriorityComparator::new(policy),
            equality: PrioritisedElementComparator::natural(),
            allow_duplicates: true,
        }
    }

    /// Creates an empty collection after validating and normalizing `flags`.
    pub fn with_flags(flags: impl Into<PriorityCollectionFlags>) -> Result<Self, CollectionError> {
        let requested = flags.into();
        let normalized = requested.normalize().inspect_err(|conflict| {
            tracing::warn!(flags = requested.bits(), %conflict, "rejected prioritised collection flags");
        })?;
        let policy = PriorityPolicy::from_flags(normalized)?;
        if requested != PriorityCollectionFlags::empty() {
            tracing::debug!(flags = normalized.bits(), ?policy, "prioritised collection configured");
        }

        Ok(Self {
            store: PriorityStore::new(),
            flags: normalized,
            ordering: PriorityComparator::new(policy),
            equality: PrioritisedElementComparator::natural(),
            allow_duplicates: true,
        })
    }

    /// Uses `comparator` instead of `PartialEq` to decide whether two elements are equal.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.equality = PrioritisedElementComparator::new(comparator);
        self
    }

    pub fn with_raw_comparator(mut self, comparator: Option<RawComparator<T>>) -> Self {
        self.equality = PrioritisedElementComparator::from_raw(comparator);
        self
    }

    /// Makes the collection behave like a set: adding an element that is already
    /// present updates its priority instead of inserting a second entry.
    pub fn without_duplicates(mut self) -> Self {
        self.allow_duplicates = false;
        self
    }

    // --- Inspection ---

    /// The normalized flag set: always exactly one order flag and one no-priority
    /// placement flag.
    #[inline]
    pub fn flags(&self) -> PriorityCollectionFlags {
        self.flags
    }

    #[inline]
    pub fn policy(&self) -> PriorityPolicy {
        self.ordering.policy()
    }

    #[inline]
    pub fn priority_comparator(&self) -> &PriorityComparator {
        &self.ordering
    }

    #[inline]
    pub fn element_comparator(&self) -> &PrioritisedElementComparator<T> {
        &self.equality
    }

    #[inline]
    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns `true` while the backing store has not spilled to the heap.
    #[inline]
    pub fn is_on_stack(&self) -> bool {
        self.store.is_on_stack()
    }

    /// Iterates the raw elements in priority order. Null elements come out as `None`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store.iter(),
        }
    }

    /// Iterates the wrapped entries in priority order.
    pub fn entries(&self) -> slice::Iter<'_, PrioritisedElement<T>> {
        self.store.iter()
    }

    #[inline]
    pub fn first_entry(&self) -> Option<&PrioritisedElement<T>> {
        self.store.first()
    }

    #[inline]
    pub fn last_entry(&self) -> Option<&PrioritisedElement<T>> {
        self.store.last()
    }

    /// The lowest element under the active ordering. The outer `Option` is `None` when
    /// the collection is empty, the inner one when the element is null.
    pub fn peek_first(&self) -> Option<Option<&T>> {
        self.store.first().map(PrioritisedElement::element)
    }

    /// The highest element under the active ordering.
    pub fn peek_last(&self) -> Option<Option<&T>> {
        self.store.last().map(PrioritisedElement::element)
    }

    // --- Removal ---

    pub fn poll_first(&mut self) -> Option<Option<T>> {
        self.store.pop_front().map(PrioritisedElement::into_element)
    }

    pub fn poll_last(&mut self) -> Option<Option<T>> {
        self.store.pop().map(PrioritisedElement::into_element)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Removes every element for which `predicate` returns `true`. Returns how many
    /// were removed. The remaining order is untouched, so no re-sort happens.
    pub fn remove_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(Option<&T>) -> bool,
    {
        self.store.retain(|entry| !predicate(entry.element()))
    }

    /// Appends `entry` and restores the ordering.
    fn push_entry(&mut self, entry: PrioritisedElement<T>) {
        self.store.push(entry);
        self.resort();
    }

    fn resort(&mut self) {
        let ordering = self.ordering;
        self.store.sort_by(|a, b| ordering.compare(a, b));
        tracing::trace!(len = self.store.len(), "prioritised store re-sorted");
    }
}

impl<T: PartialEq, const N: usize> PrioritisedCollection<T, N> {
    /// Builds a collection from `elements`, adding each one without a priority through
    /// the same checks as [`add`](Self::add).
    pub fn from_elements<I, E>(
        elements: I,
        flags: impl Into<PriorityCollectionFlags>,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        let mut collection = Self::with_flags(flags)?;
        collection.add_all(elements, Priority::Keep)?;
        Ok(collection)
    }

    /// Adds `element` under `priority`.
    ///
    /// * A null element in a `NO_NULL` collection fails with
    ///   [`CollectionError::NullNotAllowed`].
    /// * Without duplicates, an element that is already present has its priority
    ///   replaced, unless `priority` is [`Priority::Keep`].
    ///
    /// Returns `Ok(true)` if the collection changed.
    pub fn add(
        &mut self,
        element: impl Into<Option<T>>,
        priority: impl Into<Priority>,
    ) -> Result<bool, CollectionError> {
        let element = element.into();
        if element.is_none() && !self.policy().accepts_null() {
            tracing::warn!("null value rejected by NO_NULL collection");
            return Err(CollectionError::NullNotAllowed);
        }
        Ok(self.insert(element, priority.into()))
    }

    /// Adds every element under the same `priority`.
    ///
    /// Stops at the first disallowed null. Elements added before it stay in the
    /// collection.
    pub fn add_all<I, E>(
        &mut self,
        elements: I,
        priority: impl Into<Priority>,
    ) -> Result<bool, CollectionError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        let priority = priority.into();
        let mut modified = false;
        for element in elements {
            modified |= self.add(element, priority)?;
        }
        Ok(modified)
    }

    // Null admission has already been checked.
    fn insert(&mut self, element: Option<T>, priority: Priority) -> bool {
        if !self.allow_duplicates {
            if let Some(index) = self.position(element.as_ref()) {
                if !priority.is_explicit() || self.store[index].priority() == priority.value() {
                    return false;
                }
                self.store.reprioritise(index, priority.value());
                self.resort();
                return true;
            }
        }
        self.push_entry(PrioritisedElement::new(element, priority.value()));
        true
    }

    /// Index of the first entry equal to `element`.
    pub fn position<'a>(&self, element: impl Into<Option<&'a T>>) -> Option<usize>
    where
        T: 'a,
    {
        let element = element.into();
        self.store
            .iter()
            .position(|entry| self.equality.equals_raw(entry.element(), element))
    }

    pub fn contains<'a>(&self, element: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        self.position(element).is_some()
    }

    /// Looks up the priority of the first entry equal to `element`.
    pub fn priority<'a>(&self, element: impl Into<Option<&'a T>>) -> PriorityLookup
    where
        T: 'a,
    {
        match self.position(element) {
            Some(index) => PriorityLookup::Found(self.store[index].priority()),
            None => PriorityLookup::NotFound,
        }
    }

    /// Removes the first entry equal to `element`. Returns `true` if one was found.
    pub fn remove<'a>(&mut self, element: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        match self.position(element) {
            Some(index) => self.store.remove(index).is_some(),
            None => false,
        }
    }

    /// Keeps only entries equal to one of `elements`. Returns how many were removed.
    pub fn retain_all<I, E>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        let keep: Vec<Option<T>> = elements.into_iter().map(Into::into).collect();
        let equality = &self.equality;
        self.store.retain(|entry| {
            keep.iter()
                .any(|candidate| equality.equals_raw(entry.element(), candidate.as_ref()))
        })
    }
}

impl<T: Clone, const N: usize> PrioritisedCollection<T, N> {
    /// An independent copy: same entries, flags, comparator and duplicate rule.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Copies the current entries under different flags. The entries are re-sorted and
    /// re-checked against `NO_NULL`.
    pub fn copy_with_flags(
        &self,
        flags: impl Into<PriorityCollectionFlags>,
    ) -> Result<Self, CollectionError> {
        let mut copy = self.empty_copy(Some(flags.into()))?;
        if !copy.policy().accepts_null() && self.store.iter().any(PrioritisedElement::is_null) {
            return Err(CollectionError::NullNotAllowed);
        }
        for entry in self.store.iter() {
            copy.store.push(entry.clone());
        }
        copy.resort();
        Ok(copy)
    }

    /// Builds a new collection from `elements`, keeping this collection's comparator and
    /// duplicate rule, and its flags unless `flags` overrides them.
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
        let mut copy = self.empty_copy(flags)?;
        copy.add_all(elements, Priority::Keep)?;
        Ok(copy)
    }

    fn empty_copy(&self, flags: Option<PriorityCollectionFlags>) -> Result<Self, CollectionError> {
        let mut copy = Self::with_flags(flags.unwrap_or(self.flags))?;
        copy.equality = self.equality.clone();
        copy.allow_duplicates = self.allow_duplicates;
        Ok(copy)
    }

    /// The raw elements in priority order.
    pub fn to_vec(&self) -> Vec<Option<T>> {
        self.iter().map(|e| e.cloned()).collect()
    }
}

/// Shared behaviour of every prioritised collection.
///
/// Implementors only hand out their [`PrioritisedCollection`]; all operations are
/// provided on top of it.
pub trait PrioritisesElements<T: PartialEq, const N: usize> {
    fn collection(&self) -> &PrioritisedCollection<T, N>;
    fn collection_mut(&mut self) -> &mut PrioritisedCollection<T, N>;

    fn add(
        &mut self,
        element: impl Into<Option<T>>,
        priority: impl Into<Priority>,
    ) -> Result<bool, CollectionError> {
        self.collection_mut().add(element, priority)
    }

    fn add_all<I, E>(&mut self, elements: I, priority: impl Into<Priority>) -> Result<bool, CollectionError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        self.collection_mut().add_all(elements, priority)
    }

    fn priority<'a>(&self, element: impl Into<Option<&'a T>>) -> PriorityLookup
    where
        T: 'a,
    {
        self.collection().priority(element)
    }

    fn flags(&self) -> PriorityCollectionFlags {
        self.collection().flags()
    }

    fn contains<'a>(&self, element: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        self.collection().contains(element)
    }

    fn remove<'a>(&mut self, element: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        self.collection_mut().remove(element)
    }

    fn remove_if<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(Option<&T>) -> bool,
    {
        self.collection_mut().remove_if(predicate)
    }

    fn retain_all<I, E>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<T>>,
    {
        self.collection_mut().retain_all(elements)
    }

    fn len(&self) -> usize {
        self.collection().len()
    }

    fn is_empty(&self) -> bool {
        self.collection().is_empty()
    }

    fn clear(&mut self) {
        self.collection_mut().clear();
    }

    fn iter(&self) -> Iter<'_, T> {
        self.collection().iter()
    }
}

impl<T: PartialEq, const N: usize> PrioritisesElements<T, N> for PrioritisedCollection<T, N> {
    fn collection(&self) -> &PrioritisedCollection<T, N> {
        self
    }
    fn collection_mut(&mut self) -> &mut PrioritisedCollection<T, N> {
        self
    }
}

// --- Iterators ---

/// Borrowing iterator over the raw elements of a prioritised collection.
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, PrioritisedElement<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(PrioritisedElement::element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(PrioritisedElement::element)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Owning iterator over the raw elements, in priority order.
pub struct IntoIter<T, const N: usize> {
    inner: StoreIntoIter<T, N>,
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(PrioritisedElement::into_element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> IntoIterator for PrioritisedCollection<T, N> {
    type Item = Option<T>;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.store.into_iter(),
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PrioritisedCollection<T, N> {
    type Item = Option<&'a T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<T, const N: usize> Default for PrioritisedCollection<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for PrioritisedCollection<T, N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            flags: self.flags,
            ordering: self.ordering,
            equality: self.equality.clone(),
            allow_duplicates: self.allow_duplicates,
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for PrioritisedCollection<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.store.iter()).finish()
    }
}

// Non-null values can never trip NO_NULL, so extending cannot fail.
impl<T: PartialEq, const N: usize> Extend<T> for PrioritisedCollection<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(Some(element), Priority::Keep);
        }
    }
}

impl<T: PartialEq, const N: usize> FromIterator<T> for PrioritisedCollection<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

// --- Tests ---
