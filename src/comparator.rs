use crate::element::PrioritisedElement;
use crate::error::FlagConflict;
use crate::flags::{NoPriorityPlacement, NullPlacement, PriorityCollectionFlags, PriorityPolicy, SortOrder};
use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

/// A user-supplied ordering over raw elements.
pub type RawComparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// Orders wrapped elements according to a resolved [`PriorityPolicy`].
///
/// Rules are applied in a fixed precedence, the first one that tells the operands
/// apart wins:
/// 1. null placement (`NULL_VALUE_FIRST` / `NULL_VALUE_LAST`),
/// 2. no-priority placement (`NO_PRIORITY_FIRST` / `NO_PRIORITY_LAST`),
/// 3. numeric priority, inverted for `DESC_ORDER`.
///
/// Elements that tie on every rule compare `Equal`; collections sort with a stable
/// sort so those keep their insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriorityComparator {
    policy: PriorityPolicy,
}

impl PriorityComparator {
    pub fn new(policy: PriorityPolicy) -> Self {
        Self { policy }
    }

    pub fn from_flags(flags: PriorityCollectionFlags) -> Result<Self, FlagConflict> {
        PriorityPolicy::from_flags(flags).map(Self::new)
    }

    #[inline]
    pub fn policy(&self) -> PriorityPolicy {
        self.policy
    }

    pub fn compare<T>(&self, a: &PrioritisedElement<T>, b: &PrioritisedElement<T>) -> Ordering {
        let nulls = match self.policy.null_placement {
            NullPlacement::First => place_first(a.is_null(), b.is_null()),
            NullPlacement::Last => place_first(a.is_null(), b.is_null()).reverse(),
            NullPlacement::Unconstrained => Ordering::Equal,
        };
        if nulls != Ordering::Equal {
            return nulls;
        }

        let missing = match self.policy.no_priority_placement {
            NoPriorityPlacement::First => place_first(!a.has_priority(), !b.has_priority()),
            NoPriorityPlacement::Last => place_first(!a.has_priority(), !b.has_priority()).reverse(),
        };
        if missing != Ordering::Equal {
            return missing;
        }

        let by_priority = match (a.priority(), b.priority()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        };
        match self.policy.order {
            SortOrder::Ascending => by_priority,
            SortOrder::Descending => by_priority.reverse(),
        }
    }

    /// Returns `true` if `elements` is ordered under this comparator.
    pub fn is_sorted<T>(&self, elements: &[PrioritisedElement<T>]) -> bool {
        elements
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }
}

// `Less` when only `a` has the property, `Greater` when only `b` has it.
#[inline]
fn place_first(a: bool, b: bool) -> Ordering {
    match (a, b) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Anything a raw element can be read out of: a wrapped element or a bare
/// (possibly null) value.
pub trait AsRawElement<T> {
    fn raw_element(&self) -> Option<&T>;
}

impl<T> AsRawElement<T> for PrioritisedElement<T> {
    #[inline]
    fn raw_element(&self) -> Option<&T> {
        self.element()
    }
}

impl<T> AsRawElement<T> for Option<T> {
    #[inline]
    fn raw_element(&self) -> Option<&T> {
        self.as_ref()
    }
}

/// Reuses a comparator over raw elements for wrapped elements.
///
/// Each operand is unwrapped before the raw comparator sees it, so a stored
/// [`PrioritisedElement`] can be compared against a bare value. Nulls are handled
/// here: two nulls are equal and a null sorts before any value. Without a raw
/// comparator, `equals` falls back to `PartialEq` and `compare` to `Ord`.
pub struct PrioritisedElementComparator<T> {
    comparator: Option<RawComparator<T>>,
}

impl<T> PrioritisedElementComparator<T> {
    pub fn new<F>(comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self {
            comparator: Some(Rc::new(comparator)),
        }
    }

    /// An adapter with no raw comparator; equality is `PartialEq`.
    pub fn natural() -> Self {
        Self { comparator: None }
    }

    pub fn from_raw(comparator: Option<RawComparator<T>>) -> Self {
        Self { comparator }
    }

    #[inline]
    pub fn raw_comparator(&self) -> Option<&RawComparator<T>> {
        self.comparator.as_ref()
    }

    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: AsRawElement<T> + ?Sized,
        B: AsRawElement<T> + ?Sized,
        T: Ord,
    {
        match (a.raw_element(), b.raw_element(), &self.comparator) {
            (Some(x), Some(y), Some(cmp)) => cmp(x, y),
            (x, y, _) => x.cmp(&y),
        }
    }

    pub fn equals<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: AsRawElement<T> + ?Sized,
        B: AsRawElement<T> + ?Sized,
        T: PartialEq,
    {
        self.equals_raw(a.raw_element(), b.raw_element())
    }

    pub fn equals_raw(&self, a: Option<&T>, b: Option<&T>) -> bool
    where
        T: PartialEq,
    {
        match (a, b, &self.comparator) {
            (Some(x), Some(y), Some(cmp)) => cmp(x, y) == Ordering::Equal,
            (x, y, _) => x == y,
        }
    }
}

impl<T> Clone for PrioritisedElementComparator<T> {
    fn clone(&self) -> Self {
        Self {
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> Default for PrioritisedElementComparator<T> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<T> fmt::Debug for PrioritisedElementComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrioritisedElementComparator")
            .field("custom", &self.comparator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type F = PriorityCollectionFlags;

    fn e(element: Option<i32>, priority: Option<i64>) -> PrioritisedElement<i32> {
        PrioritisedElement::new(element, priority)
    }

    fn cmp(flags: F) -> PriorityComparator {
        PriorityComparator::from_flags(flags).unwrap()
    }

    #[rstest]
    #[case(F::empty(), Some(1), Some(2), Ordering::Less)]
    #[case(F::DESC_ORDER, Some(1), Some(2), Ordering::Greater)]
    #[case(F::empty(), Some(2), Some(2), Ordering::Equal)]
    #[case(F::empty(), None, Some(2), Ordering::Greater)]
    #[case(F::NO_PRIORITY_FIRST, None, Some(2), Ordering::Less)]
    #[case(F::DESC_ORDER, None, Some(2), Ordering::Greater)]
    #[case(F::DESC_ORDER | F::NO_PRIORITY_FIRST, Some(2), None, Ordering::Greater)]
    #[case(F::empty(), None, None, Ordering::Equal)]
    #[case(F::empty(), Some(0), None, Ordering::Less)]
    fn test_comparator_priorities(
        #[case] flags: F,
        #[case] a: Option<i64>,
        #[case] b: Option<i64>,
        #[case] expected: Ordering,
    ) {
        assert_eq!(cmp(flags).compare(&e(Some(1), a), &e(Some(2), b)), expected);
    }

    #[test]
    fn test_comparator_null_placement_precedes_priority() {
        let null_low = e(None, Some(-100));
        let value_high = e(Some(5), Some(100));

        let first = cmp(F::NULL_VALUE_FIRST | F::DESC_ORDER);
        assert_eq!(first.compare(&null_low, &value_high), Ordering::Less);
        assert_eq!(first.compare(&value_high, &null_low), Ordering::Greater);

        let last = cmp(F::NULL_VALUE_LAST);
        assert_eq!(last.compare(&null_low, &value_high), Ordering::Greater);

        // Unconstrained nulls sort purely by priority.
        let none = cmp(F::empty());
        assert_eq!(none.compare(&null_low, &value_high), Ordering::Less);
    }

    #[test]
    fn test_comparator_null_placement_beats_missing_priority() {
        let null_prioritised = e(None, Some(1));
        let value_unprioritised = e(Some(1), None);

        let c = cmp(F::NULL_VALUE_LAST | F::NO_PRIORITY_LAST);
        assert_eq!(c.compare(&null_prioritised, &value_unprioritised), Ordering::Greater);
    }

    #[test]
    fn test_comparator_two_nulls_fall_through() {
        let c = cmp(F::NULL_VALUE_FIRST);
        assert_eq!(c.compare(&e(None, Some(2)), &e(None, Some(1))), Ordering::Greater);
        assert_eq!(c.compare(&e(None, None), &e(None, Some(1))), Ordering::Greater);
    }

    #[test]
    fn test_comparator_is_sorted() {
        let c = cmp(F::empty());
        assert!(c.is_sorted(&[e(Some(1), Some(1)), e(Some(1), Some(3)), e(Some(1), None)]));
        assert!(!c.is_sorted(&[e(Some(1), None), e(Some(1), Some(3))]));
        assert!(c.is_sorted::<i32>(&[]));
    }

    #[test]
    fn test_element_comparator_natural() {
        let c: PrioritisedElementComparator<i32> = PrioritisedElementComparator::natural();
        assert!(c.equals(&e(Some(1), Some(9)), &Some(1)));
        assert!(!c.equals(&e(Some(1), None), &Some(2)));
        assert!(c.equals(&e(None, Some(9)), &None::<i32>));
        assert!(!c.equals(&e(None, None), &Some(0)));
        assert_eq!(c.compare(&Some(1), &e(Some(3), None)), Ordering::Less);
        assert_eq!(c.compare(&None::<i32>, &Some(3)), Ordering::Less);
    }

    #[test]
    fn test_element_comparator_custom() {
        // Case-insensitive equality on strings.
        let c = PrioritisedElementComparator::new(|a: &String, b: &String| {
            a.to_lowercase().cmp(&b.to_lowercase())
        });
        let stored = PrioritisedElement::new(Some("Hello".to_string()), Some(1));
        assert!(c.equals(&stored, &Some("HELLO".to_string())));
        assert!(!c.equals(&stored, &None::<String>));
        assert_eq!(
            c.compare(&Some("apple".to_string()), &Some("Banana".to_string())),
            Ordering::Less
        );

        let copy = c.clone();
        assert!(copy.raw_comparator().is_some());
        assert_eq!(format!("{:?}", copy), "PrioritisedElementComparator { custom: true }");
    }
}
