//! Ordering and placement policy for prioritised collections.
//!
//! Callers describe a policy with [`PriorityCollectionFlags`], a plain bitmask whose
//! constants can be OR'd together. The collection validates the mask once, when it is
//! built, and resolves it into a [`PriorityPolicy`]. The comparator only ever sees the
//! resolved policy, so defaults and exclusivity rules live in exactly one place.

use crate::error::FlagConflict;
use bitflags::bitflags;

bitflags! {
    /// Bitmask selecting how a prioritised collection orders its elements.
    ///
    /// Three pairs are mutually exclusive: `ASC_ORDER`/`DESC_ORDER`,
    /// `NULL_VALUE_FIRST`/`NULL_VALUE_LAST` and `NO_PRIORITY_FIRST`/`NO_PRIORITY_LAST`.
    /// An empty mask means ascending order with priority-less elements last.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PriorityCollectionFlags: u32 {
        const ASC_ORDER = 1;
        const DESC_ORDER = 2;
        const NULL_VALUE_FIRST = 4;
        const NULL_VALUE_LAST = 8;
        const NO_NULL = 16;
        const NO_PRIORITY_FIRST = 32;
        const NO_PRIORITY_LAST = 64;

        // Unknown bits are carried along untouched.
        const _ = !0;
    }
}

impl From<u32> for PriorityCollectionFlags {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

impl From<PriorityCollectionFlags> for u32 {
    fn from(flags: PriorityCollectionFlags) -> Self {
        flags.bits()
    }
}

impl PriorityCollectionFlags {
    /// Checks the three exclusive pairs, reporting the first conflict found.
    pub fn validate(self) -> Result<Self, FlagConflict> {
        if self.contains(Self::ASC_ORDER | Self::DESC_ORDER) {
            return Err(FlagConflict::Order);
        }
        if self.contains(Self::NO_PRIORITY_FIRST | Self::NO_PRIORITY_LAST) {
            return Err(FlagConflict::NoPriorityPlacement);
        }
        if self.contains(Self::NULL_VALUE_FIRST | Self::NULL_VALUE_LAST) {
            return Err(FlagConflict::NullPlacement);
        }
        Ok(self)
    }

    /// Validates the mask and fills in the implicit defaults
    /// (`ASC_ORDER`, `NO_PRIORITY_LAST`).
    pub fn normalize(self) -> Result<Self, FlagConflict> {
        let mut flags = self.validate()?;
        if !flags.intersects(Self::ASC_ORDER | Self::DESC_ORDER) {
            flags |= Self::ASC_ORDER;
        }
        if !flags.intersects(Self::NO_PRIORITY_FIRST | Self::NO_PRIORITY_LAST) {
            flags |= Self::NO_PRIORITY_LAST;
        }
        Ok(flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullPlacement {
    First,
    Last,
    Unconstrained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoPriorityPlacement {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullAdmission {
    Allowed,
    Forbidden,
}

/// A validated flag set, one field per policy axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriorityPolicy {
    pub order: SortOrder,
    pub null_placement: NullPlacement,
    pub no_priority_placement: NoPriorityPlacement,
    pub null_admission: NullAdmission,
}

impl PriorityPolicy {
    /// Resolves a raw mask. Fails with the first exclusive pair that is fully set.
    pub fn from_flags(flags: PriorityCollectionFlags) -> Result<Self, FlagConflict> {
        type F = PriorityCollectionFlags;
        let flags = flags.normalize()?;

        let order = if flags.contains(F::DESC_ORDER) {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        let null_placement = match (
            flags.contains(F::NULL_VALUE_FIRST),
            flags.contains(F::NULL_VALUE_LAST),
        ) {
            (true, _) => NullPlacement::First,
            (false, true) => NullPlacement::Last,
            (false, false) => NullPlacement::Unconstrained,
        };
        let no_priority_placement = if flags.contains(F::NO_PRIORITY_FIRST) {
            NoPriorityPlacement::First
        } else {
            NoPriorityPlacement::Last
        };
        let null_admission = if flags.contains(F::NO_NULL) {
            NullAdmission::Forbidden
        } else {
            NullAdmission::Allowed
        };

        Ok(Self {
            order,
            null_placement,
            no_priority_placement,
            null_admission,
        })
    }

    /// The canonical mask for this policy. Always contains one order flag and one
    /// no-priority placement flag.
    pub fn flags(&self) -> PriorityCollectionFlags {
        type F = PriorityCollectionFlags;
        let mut flags = match self.order {
            SortOrder::Ascending => F::ASC_ORDER,
            SortOrder::Descending => F::DESC_ORDER,
        };
        flags |= match self.null_placement {
            NullPlacement::First => F::NULL_VALUE_FIRST,
            NullPlacement::Last => F::NULL_VALUE_LAST,
            NullPlacement::Unconstrained => F::empty(),
        };
        flags |= match self.no_priority_placement {
            NoPriorityPlacement::First => F::NO_PRIORITY_FIRST,
            NoPriorityPlacement::Last => F::NO_PRIORITY_LAST,
        };
        if self.null_admission == NullAdmission::Forbidden {
            flags |= F::NO_NULL;
        }
        flags
    }

    #[inline]
    pub fn accepts_null(&self) -> bool {
        self.null_admission == NullAdmission::Allowed
    }
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            order: SortOrder::Ascending,
            null_placement: NullPlacement::Unconstrained,
            no_priority_placement: NoPriorityPlacement::Last,
            null_admission: NullAdmission::Allowed,
        }
    }
}

impl TryFrom<PriorityCollectionFlags> for PriorityPolicy {
    type Error = FlagConflict;

    fn try_from(flags: PriorityCollectionFlags) -> Result<Self, Self::Error> {
        Self::from_flags(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type F = PriorityCollectionFlags;

    #[rstest]
    #[case(F::ASC_ORDER | F::DESC_ORDER, FlagConflict::Order)]
    #[case(F::NO_PRIORITY_FIRST | F::NO_PRIORITY_LAST, FlagConflict::NoPriorityPlacement)]
    #[case(F::NULL_VALUE_FIRST | F::NULL_VALUE_LAST, FlagConflict::NullPlacement)]
    #[case(F::all(), FlagConflict::Order)]
    #[case(F::NULL_VALUE_FIRST | F::NULL_VALUE_LAST | F::NO_PRIORITY_FIRST | F::NO_PRIORITY_LAST, FlagConflict::NoPriorityPlacement)]
    fn test_flags_exclusive_pairs_rejected(#[case] flags: F, #[case] expected: FlagConflict) {
        assert_eq!(flags.validate(), Err(expected));
        assert_eq!(PriorityPolicy::from_flags(flags), Err(expected));
    }

    #[test]
    fn test_flags_default_normalization() {
        assert_eq!(
            F::empty().normalize(),
            Ok(F::ASC_ORDER | F::NO_PRIORITY_LAST)
        );
        assert_eq!(
            PriorityPolicy::from_flags(F::empty()),
            PriorityPolicy::from_flags(F::ASC_ORDER | F::NO_PRIORITY_LAST)
        );
        assert_eq!(
            PriorityPolicy::from_flags(F::empty()),
            Ok(PriorityPolicy::default())
        );
    }

    #[test]
    fn test_flags_normalize_keeps_explicit_choices() {
        let flags = F::DESC_ORDER | F::NO_PRIORITY_FIRST | F::NO_NULL;
        assert_eq!(flags.normalize(), Ok(flags));
    }

    #[test]
    fn test_flags_policy_fields() {
        let policy = PriorityPolicy::from_flags(
            F::DESC_ORDER | F::NULL_VALUE_LAST | F::NO_NULL | F::NO_PRIORITY_FIRST,
        )
        .unwrap();
        assert_eq!(policy.order, SortOrder::Descending);
        assert_eq!(policy.null_placement, NullPlacement::Last);
        assert_eq!(policy.no_priority_placement, NoPriorityPlacement::First);
        assert_eq!(policy.null_admission, NullAdmission::Forbidden);
        assert!(!policy.accepts_null());
    }

    #[test]
    fn test_flags_policy_round_trip() {
        let flags = F::DESC_ORDER | F::NULL_VALUE_FIRST | F::NO_PRIORITY_LAST;
        let policy = PriorityPolicy::try_from(flags).unwrap();
        assert_eq!(policy.flags(), flags);
        assert_eq!(PriorityPolicy::default().flags(), F::ASC_ORDER | F::NO_PRIORITY_LAST);
    }

    #[test]
    fn test_flags_from_raw_bits() {
        let flags = F::from(1 | 16);
        assert_eq!(flags, F::ASC_ORDER | F::NO_NULL);
        assert_eq!(u32::from(F::NO_PRIORITY_LAST), 64);

        // Unknown bits survive normalization.
        let odd = F::from(1 << 10);
        assert_eq!(odd.normalize().map(|f| f.bits()), Ok((1 << 10) | 1 | 64));
    }
}
