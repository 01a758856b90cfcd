//! # Small Priority Collections
//!
//! Priority queues, stacks and deques whose ordering is chosen with a flag set, backed by
//! storage that lives on the stack for small sizes and spills to the heap when it grows.
//!
//! This crate provides `PriorityQueue`, `PriorityStack` and `PriorityDeque`. All three share
//! one engine, `PrioritisedCollection`, which keeps its entries fully sorted after every
//! insert.
//!
//! ## Key Features
//!
//! * **Optional Priorities:** Every element carries an optional `i64` priority. "No priority"
//!   is its own state, distinct from `0`, with its own placement rule.
//! * **Null Elements:** Elements are added as `Option<T>`; `None` is a null value that can be
//!   placed first, last, or rejected outright.
//! * **Stable Order:** Elements that compare equal keep their insertion order.
//! * **Stack Optimization:** The first `N` entries (default 8) are stored inline with no heap
//!   allocation.
//! * **Validated Flags:** Contradictory flag combinations are refused at construction time.
//!
//! ## Flags
//!
//! | Flag                | Effect                                        |
//! |---------------------|-----------------------------------------------|
//! | `ASC_ORDER`         | Lowest priority first (default)               |
//! | `DESC_ORDER`        | Highest priority first                        |
//! | `NULL_VALUE_FIRST`  | Null elements before everything else          |
//! | `NULL_VALUE_LAST`   | Null elements after everything else           |
//! | `NO_NULL`           | Adding a null element is an error             |
//! | `NO_PRIORITY_FIRST` | Elements without a priority first             |
//! | `NO_PRIORITY_LAST`  | Elements without a priority last (default)    |
//!
//! ## Examples
//!
//! ### PriorityQueue
//!
//! ```rust
//! use small_priority_collections::{PrioritisesElements, PriorityQueue};
//!
//! let mut queue: PriorityQueue<&str> = PriorityQueue::new();
//! queue.add("write report", 2).unwrap();
//! queue.add("fix outage", 0).unwrap();
//! queue.add("tidy desk", None).unwrap();
//!
//! assert_eq!(queue.poll_first(), Some(Some("fix outage")));
//! assert_eq!(queue.poll_first(), Some(Some("write report")));
//! assert_eq!(queue.poll_first(), Some(Some("tidy desk")));
//! ```
//!
//! ### PriorityDeque with flags
//!
//! ```rust
//! use small_priority_collections::{
//!     PrioritisesElements, Priority, PriorityCollectionFlags as F, PriorityDeque,
//! };
//!
//! let mut deque: PriorityDeque<i32> = PriorityDeque::with_flags(F::DESC_ORDER).unwrap();
//! deque.add(1, 3).unwrap();
//! deque.add(2, 0).unwrap();
//! deque.add(9, Priority::Unset).unwrap();
//! deque.add(None, 200).unwrap();
//!
//! assert_eq!(deque.to_vec(), vec![None, Some(1), Some(2), Some(9)]);
//! assert_eq!(deque.peek_last(), Some(Some(&9)));
//! ```
//!
//! ### Rejected flags
//!
//! ```rust
//! use small_priority_collections::{PriorityCollectionFlags as F, PriorityStack};
//!
//! let err = PriorityStack::<i32>::with_flags(F::ASC_ORDER | F::DESC_ORDER).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid PrioritisedCollection flags, cannot be ordered both descending as ascending"
//! );
//! ```

// --- Module Declarations ---

pub mod comparator;
pub mod deque;
pub mod element;
pub mod error;
pub mod flags;
pub mod prioritised;
pub mod queue;
pub mod stack;
pub mod store;

// --- Re-exports ---

pub use comparator::{AsRawElement, PrioritisedElementComparator, PriorityComparator, RawComparator};
pub use deque::PriorityDeque;
pub use element::{PrioritisedElement, Priority, PriorityLookup};
pub use error::{CollectionError, FlagConflict};
pub use flags::{
    NoPriorityPlacement, NullAdmission, NullPlacement, PriorityCollectionFlags, PriorityPolicy,
    SortOrder,
};
pub use prioritised::{PrioritisedCollection, PrioritisesElements};
pub use queue::PriorityQueue;
pub use stack::PriorityStack;
pub use store::PriorityStore;
