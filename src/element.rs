use core::fmt;

/// A raw element paired with an optional integer priority.
///
/// `element == None` is the null value; `priority == None` means the element was
/// inserted without a priority, which is not the same thing as priority `0`.
/// Entries are never mutated in place: a priority update replaces the wrapper.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PrioritisedElement<T> {
    element: Option<T>,
    priority: Option<i64>,
}

impl<T> PrioritisedElement<T> {
    #[inline]
    pub fn new(element: Option<T>, priority: Option<i64>) -> Self {
        Self { element, priority }
    }

    #[inline]
    pub fn element(&self) -> Option<&T> {
        self.element.as_ref()
    }

    #[inline]
    pub fn priority(&self) -> Option<i64> {
        self.priority
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.element.is_none()
    }

    #[inline]
    pub fn has_priority(&self) -> bool {
        self.priority.is_some()
    }

    /// Returns the same element under a different priority.
    pub fn with_priority(self, priority: Option<i64>) -> Self {
        Self {
            element: self.element,
            priority,
        }
    }

    pub fn into_element(self) -> Option<T> {
        self.element
    }

    pub fn into_parts(self) -> (Option<T>, Option<i64>) {
        (self.element, self.priority)
    }
}

impl<T: fmt::Debug> fmt::Debug for PrioritisedElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.priority {
            Some(p) => write!(f, "{:?}@{}", self.element, p),
            None => write!(f, "{:?}@-", self.element),
        }
    }
}

/// The priority argument accepted by `add`.
///
/// `Keep` gives no priority to new elements and leaves an existing matching element
/// untouched. `Unset` and `Set` are explicit requests: they are applied to new
/// elements and, in collections without duplicates, to an existing match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    #[default]
    Keep,
    Unset,
    Set(i64),
}

impl Priority {
    /// The priority a freshly inserted element receives.
    #[inline]
    pub fn value(self) -> Option<i64> {
        match self {
            Priority::Keep | Priority::Unset => None,
            Priority::Set(p) => Some(p),
        }
    }

    #[inline]
    pub fn is_explicit(self) -> bool {
        !matches!(self, Priority::Keep)
    }
}

impl From<i64> for Priority {
    fn from(p: i64) -> Self {
        Priority::Set(p)
    }
}

impl From<i32> for Priority {
    fn from(p: i32) -> Self {
        Priority::Set(p.into())
    }
}

impl From<Option<i64>> for Priority {
    fn from(p: Option<i64>) -> Self {
        match p {
            Some(p) => Priority::Set(p),
            None => Priority::Unset,
        }
    }
}

/// Result of a priority lookup: either the element was found (with or without a
/// priority), or it is not in the collection at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityLookup {
    Found(Option<i64>),
    NotFound,
}

impl PriorityLookup {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, PriorityLookup::Found(_))
    }

    /// Flattens the lookup, losing the distinction between "absent" and "no priority".
    #[inline]
    pub fn priority(&self) -> Option<i64> {
        match self {
            PriorityLookup::Found(p) => *p,
            PriorityLookup::NotFound => None,
        }
    }
}
