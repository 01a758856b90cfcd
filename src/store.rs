use crate::element::PrioritisedElement;
use core::cmp::Ordering;
use core::mem::ManuallyDrop;
use core::ops::Deref;
use core::ptr;
use std::fmt;

/// Sorted backing storage for prioritised collections.
///
/// # Behavior
/// * **Stack Storage:** Uses `heapless::Vec` for the first `N` entries.
/// * **Heap Spill:** Moves to `std::vec::Vec` when capacity `N` is exceeded. There is no
///   way back to the stack short of building a new store.
/// * **Ordering:** The store itself does not know the ordering. Owners call
///   [`PriorityStore::sort_by`] after every structural insert; removals keep the
///   relative order of the remaining entries.
///
/// # Safety Invariants
/// * `on_stack` determines which side of the `StoreData` union is active.
pub struct PriorityStore<T, const N: usize> {
    on_stack: bool,
    data: StoreData<T, N>,
}

/// Either a `heapless::Vec` (stack) or a `std::vec::Vec` (heap) of wrapped elements.
///
/// `ManuallyDrop` keeps the compiler from dropping both variants; `Drop` for the
/// store picks the active one.
union StoreData<T, const N: usize> {
    stack: ManuallyDrop<heapless::Vec<PrioritisedElement<T>, N>>,
    heap: ManuallyDrop<Vec<PrioritisedElement<T>>>,
}

impl<T, const N: usize> PriorityStore<T, N> {
    pub const MAX_STACK_SIZE: usize = 16 * 1024;

    /// Creates a new empty store on the stack.
    pub fn new() -> Self {
        const {
            assert!(
                std::mem::size_of::<Self>() <= PriorityStore::<T, N>::MAX_STACK_SIZE,
                "PriorityStore is too large! Reduce N."
            );
        }
        Self {
            on_stack: true,
            data: StoreData {
                stack: ManuallyDrop::new(heapless::Vec::new()),
            },
        }
    }

    /// Creates a store that starts on the heap if `capacity` exceeds `N`.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity <= N {
            Self::new()
        } else {
            Self {
                on_stack: false,
                data: StoreData {
                    heap: ManuallyDrop::new(Vec::with_capacity(capacity)),
                },
            }
        }
    }

    // --- Inspection ---

    #[inline]
    pub fn is_on_stack(&self) -> bool {
        self.on_stack
    }

    pub fn len(&self) -> usize {
        unsafe {
            if self.on_stack {
                self.data.stack.len()
            } else {
                self.data.heap.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        unsafe {
            if self.on_stack {
                N
            } else {
                self.data.heap.capacity()
            }
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[PrioritisedElement<T>] {
        unsafe {
            if self.on_stack {
                self.data.stack.as_slice()
            } else {
                self.data.heap.as_slice()
            }
        }
    }

    // Private: handing out `&mut [_]` would let callers break the ordering.
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [PrioritisedElement<T>] {
        unsafe {
            if self.on_stack {
                (*self.data.stack).as_mut_slice()
            } else {
                (*self.data.heap).as_mut_slice()
            }
        }
    }

    // --- Modification ---

    /// Appends an entry at the back. Callers re-sort afterwards.
    pub fn push(&mut self, entry: PrioritisedElement<T>) {
        unsafe {
            if self.on_stack {
                if self.data.stack.len() == N {
                    self.spill_to_heap();
                    // Fallthrough to heap push
                } else {
                    match (*self.data.stack).push(entry) {
                        Ok(()) => return,
                        Err(_) => unreachable!("Stack capacity check failed in push"),
                    }
                }
            }
            (*self.data.heap).push(entry);
        }
    }

    /// Re-wraps the entry at `index` under a new priority, keeping its position.
    /// Panics if `index` is out of bounds.
    pub fn reprioritise(&mut self, index: usize, priority: Option<i64>) {
        let len = self.len();
        assert!(
            index < len,
            "reprioritise index (is {}) should be < len (is {})",
            index,
            len
        );
        let slot = &mut self.as_mut_slice()[index];
        let entry = core::mem::replace(slot, PrioritisedElement::new(None, None));
        *slot = entry.with_priority(priority);
    }

    /// Removes and returns the entry at `index`, shifting later entries down.
    pub fn remove(&mut self, index: usize) -> Option<PrioritisedElement<T>> {
        if index >= self.len() {
            return None;
        }
        unsafe {
            if self.on_stack {
                Some((*self.data.stack).remove(index))
            } else {
                Some((*self.data.heap).remove(index))
            }
        }
    }

    pub fn pop(&mut self) -> Option<PrioritisedElement<T>> {
        unsafe {
            if self.on_stack {
                (*self.data.stack).pop()
            } else {
                (*self.data.heap).pop()
            }
        }
    }

    pub fn pop_front(&mut self) -> Option<PrioritisedElement<T>> {
        self.remove(0)
    }

    pub fn clear(&mut self) {
        unsafe {
            if self.on_stack {
                (*self.data.stack).clear();
            } else {
                (*self.data.heap).clear();
            }
        }
    }

    /// Keeps only the entries for which `f` returns `true`, preserving their order.
    /// Returns the number of entries removed.
    pub fn retain<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&PrioritisedElement<T>) -> bool,
    {
        let before = self.len();
        unsafe {
            if self.on_stack {
                // Order-preserving compaction for the stack side.
                let vec = &mut *self.data.stack;
                let len = vec.len();
                let mut del = 0;
                for i in 0..len {
                    if !f(&vec[i]) {
                        del += 1;
                    } else if del > 0 {
                        vec.swap(i - del, i);
                    }
                }
                vec.truncate(len - del);
            } else {
                (*self.data.heap).retain(f);
            }
        }
        before - self.len()
    }

    /// Stable sort. Entries that compare `Equal` keep their current relative order.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&PrioritisedElement<T>, &PrioritisedElement<T>) -> Ordering,
    {
        self.as_mut_slice().sort_by(compare);
    }

    /// Consumes the store and returns its entries as a standard `Vec`.
    pub fn into_vec(self) -> Vec<PrioritisedElement<T>> {
        let this = ManuallyDrop::new(self);
        unsafe {
            if this.on_stack {
                ptr::read(&*this.data.stack).into_iter().collect()
            } else {
                ptr::read(&*this.data.heap)
            }
        }
    }

    // --- Internal Helpers ---

    #[inline(never)]
    unsafe fn spill_to_heap(&mut self) {
        tracing::debug!(capacity = N, "priority store spilling to heap");
        unsafe {
            let stack_vec = ptr::read(&*self.data.stack);
            let mut heap_vec = Vec::with_capacity(N * 2);
            heap_vec.extend(stack_vec);
            ptr::write(&mut self.data.heap, ManuallyDrop::new(heap_vec));
            self.on_stack = false;
        }
    }
}

// --- Trait Implementations ---

impl<T, const N: usize> Deref for PriorityStore<T, N> {
    type Target = [PrioritisedElement<T>];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> Drop for PriorityStore<T, N> {
    fn drop(&mut self) {
        unsafe {
            if self.on_stack {
                ManuallyDrop::drop(&mut self.data.stack);
            } else {
                ManuallyDrop::drop(&mut self.data.heap);
            }
        }
    }
}

impl<T: Clone, const N: usize> Clone for PriorityStore<T, N> {
    fn clone(&self) -> Self {
        unsafe {
            if self.on_stack {
                Self {
                    on_stack: true,
                    data: StoreData {
                        stack: ManuallyDrop::new((*self.data.stack).clone()),
                    },
                }
            } else {
                Self {
                    on_stack: false,
                    data: StoreData {
                        heap: ManuallyDrop::new((*self.data.heap).clone()),
                    },
                }
            }
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for PriorityStore<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, const N: usize> Default for PriorityStore<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Owning iterator over the entries of a store, front to back.
pub struct StoreIntoIter<T, const N: usize> {
    iter: StoreIterEnum<T, N>,
}

enum StoreIterEnum<T, const N: usize> {
    Stack(heapless::vec::IntoIter<PrioritisedElement<T>, N, usize>),
    Heap(std::vec::IntoIter<PrioritisedElement<T>>),
}

impl<T, const N: usize> IntoIterator for PriorityStore<T, N> {
    type Item = PrioritisedElement<T>;
    type IntoIter = StoreIntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        unsafe {
            if this.on_stack {
                let stack_vec = ptr::read(&*this.data.stack);
                StoreIntoIter {
                    iter: StoreIterEnum::Stack(stack_vec.into_iter()),
                }
            } else {
                let heap_vec = ptr::read(&*this.data.heap);
                StoreIntoIter {
                    iter: StoreIterEnum::Heap(heap_vec.into_iter()),
                }
            }
        }
    }
}

impl<T, const N: usize> Iterator for StoreIntoIter<T, N> {
    type Item = PrioritisedElement<T>;
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.iter {
            StoreIterEnum::Stack(iter) => iter.next(),
            StoreIterEnum::Heap(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            StoreIterEnum::Stack(iter) => iter.size_hint(),
            StoreIterEnum::Heap(iter) => iter.size_hint(),
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for StoreIntoIter<T, N> {}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: i32, priority: Option<i64>) -> PrioritisedElement<i32> {
        PrioritisedElement::new(Some(value), priority)
    }

    fn values<const N: usize>(store: &PriorityStore<i32, N>) -> Vec<i32> {
        store.iter().filter_map(|e| e.element().copied()).collect()
    }

    #[test]
    fn test_store_stack_ops_basic() {
        let mut store: PriorityStore<i32, 4> = PriorityStore::new();
        assert!(store.is_empty());
        assert!(store.is_on_stack());

        store.push(entry(1, Some(1)));
        store.push(entry(2, None));
        assert_eq!(store.len(), 2);
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.first().and_then(|e| e.element()), Some(&1));
        assert_eq!(store.pop().map(|e| e.into_parts()), Some((Some(2), None)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_spill_trigger_on_push() {
        let mut store: PriorityStore<i32, 2> = PriorityStore::new();
        store.push(entry(1, None));
        store.push(entry(2, None));
        assert!(store.is_on_stack());

        store.push(entry(3, None));
        assert!(!store.is_on_stack());
        assert_eq!(values(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_store_with_capacity() {
        let store: PriorityStore<i32, 2> = PriorityStore::with_capacity(10);
        assert!(!store.is_on_stack());
        assert!(store.capacity() >= 10);

        let store: PriorityStore<i32, 4> = PriorityStore::with_capacity(3);
        assert!(store.is_on_stack());
    }

    #[test]
    fn test_store_sort_is_stable_any_storage() {
        for spill in [false, true] {
            let mut store: PriorityStore<i32, 4> = PriorityStore::new();
            let count = if spill { 8 } else { 4 };
            for i in 0..count {
                store.push(entry(i, Some((i % 2) as i64)));
            }
            assert_eq!(store.is_on_stack(), !spill);

            store.sort_by(|a, b| a.priority().cmp(&b.priority()));
            let expected: Vec<i32> = (0..count)
                .filter(|i| i % 2 == 0)
                .chain((0..count).filter(|i| i % 2 == 1))
                .collect();
            assert_eq!(values(&store), expected);
        }
    }

    #[test]
    fn test_store_remove_and_reprioritise() {
        let mut store: PriorityStore<i32, 4> = PriorityStore::new();
        for i in 0..3 {
            store.push(entry(i, None));
        }
        assert_eq!(store.remove(1).and_then(|e| e.into_element()), Some(1));
        assert!(store.remove(5).is_none());
        assert_eq!(values(&store), vec![0, 2]);

        store.reprioritise(0, Some(9));
        assert_eq!(store[0].priority(), Some(9));
        assert_eq!(store[0].element(), Some(&0));

        assert_eq!(store.pop_front().and_then(|e| e.into_element()), Some(0));
        assert_eq!(values(&store), vec![2]);
    }

    #[test]
    #[should_panic(expected = "reprioritise index (is 3) should be < len (is 1)")]
    fn test_store_reprioritise_out_of_bounds() {
        let mut store: PriorityStore<i32, 4> = PriorityStore::new();
        store.push(entry(1, None));
        store.reprioritise(3, Some(2));
    }

    #[test]
    fn test_store_retain_any_storage() {
        let mut stack: PriorityStore<i32, 8> = PriorityStore::new();
        let mut heap: PriorityStore<i32, 2> = PriorityStore::new();
        for i in 0..6 {
            stack.push(entry(i, None));
            heap.push(entry(i, None));
        }

        assert_eq!(stack.retain(|e| e.element().is_some_and(|v| v % 2 == 1)), 3);
        assert_eq!(heap.retain(|e| e.element().is_some_and(|v| v % 2 == 1)), 3);
        assert_eq!(values(&stack), vec![1, 3, 5]);
        assert_eq!(values(&heap), vec![1, 3, 5]);
    }

    #[test]
    fn test_store_clone_is_independent() {
        let mut s1: PriorityStore<i32, 2> = PriorityStore::new();
        s1.push(entry(1, None));
        let s2 = s1.clone();
        s1.push(entry(2, None));
        s1.push(entry(3, None));

        assert!(!s1.is_on_stack());
        assert!(s2.is_on_stack());
        assert_eq!(values(&s2), vec![1]);

        let s3 = s1.clone();
        assert!(!s3.is_on_stack());
        assert_eq!(values(&s3), vec![1, 2, 3]);
    }

    #[test]
    fn test_store_into_iter_any_storage() {
        let mut stack: PriorityStore<i32, 4> = PriorityStore::new();
        stack.push(entry(1, None));
        stack.push(entry(2, None));
        let mut it = stack.into_iter();
        assert_eq!(it.size_hint(), (2, Some(2)));
        assert_eq!(it.next().and_then(|e| e.into_element()), Some(1));

        let mut heap: PriorityStore<i32, 1> = PriorityStore::new();
        heap.push(entry(1, None));
        heap.push(entry(2, None));
        assert_eq!(heap.into_vec().len(), 2);
    }

    #[test]
    fn test_store_clear_and_debug() {
        let mut store: PriorityStore<i32, 2> = PriorityStore::new();
        store.push(entry(1, Some(4)));
        assert_eq!(format!("{:?}", store), "[Some(1)@4]");

        store.push(entry(2, None));
        store.push(entry(3, None));
        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_on_stack());
    }

    #[test]
    fn test_store_drop_check() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Tracker(Rc<RefCell<i32>>);
        impl Drop for Tracker {
            fn drop(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        let counter = Rc::new(RefCell::new(0));
        {
            let mut store: PriorityStore<Tracker, 2> = PriorityStore::new();
            store.push(PrioritisedElement::new(Some(Tracker(counter.clone())), None));
            store.push(PrioritisedElement::new(Some(Tracker(counter.clone())), None));
        }
        assert_eq!(*counter.borrow(), 2);

        *counter.borrow_mut() = 0;
        {
            let mut store: PriorityStore<Tracker, 2> = PriorityStore::new();
            for _ in 0..3 {
                store.push(PrioritisedElement::new(Some(Tracker(counter.clone())), None));
            }
            store.retain(|_| false);
            assert_eq!(*counter.borrow(), 3);
        }
        assert_eq!(*counter.borrow(), 3);
    }
}
