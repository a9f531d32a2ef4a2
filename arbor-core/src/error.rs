//! Error types for the arbor core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::FibonacciHeap`] operations on a
/// [`crate::HeapForest`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HeapError {
    /// `decrease_priority` was asked to move an entry further from the top.
    #[error("cannot increase the priority of heap entry {entry}")]
    PriorityIncrease {
        /// Arena slot of the offending entry.
        entry: usize,
    },
    /// The entry id does not refer to a live entry of this forest.
    #[error("heap entry {entry} is not live in this forest")]
    UnknownEntry {
        /// Arena slot that was requested.
        entry: usize,
    },
    /// The heap handle was produced by a different forest, whose ordering
    /// may differ from this one.
    #[error("heap belongs to forest {found}, expected forest {expected}")]
    ForeignHeap {
        /// Identifier of the forest the operation was invoked on.
        expected: u64,
        /// Identifier recorded in the heap handle.
        found: u64,
    },
    /// The forest already holds as many entries as it was allowed to.
    #[error("heap forest is at capacity ({capacity} entries)")]
    CapacityExhausted {
        /// Configured entry ceiling.
        capacity: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`HeapError`] variants.
    enum HeapErrorCode for HeapError {
        /// `decrease_priority` was asked to increase a priority.
        PriorityIncrease => PriorityIncrease { .. } => "HEAP_PRIORITY_INCREASE",
        /// The entry id does not refer to a live entry.
        UnknownEntry => UnknownEntry { .. } => "HEAP_UNKNOWN_ENTRY",
        /// The heap handle came from another forest.
        ForeignHeap => ForeignHeap { .. } => "HEAP_FOREIGN_HEAP",
        /// The forest is full.
        CapacityExhausted => CapacityExhausted { .. } => "HEAP_CAPACITY_EXHAUSTED",
    }
}

/// Error type produced when configuring or running [`crate::ArborescenceSolver`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArborError {
    /// An edge weight was NaN or positive infinity.
    #[error("edge {source_node} -> {destination} has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Debug rendering of the edge source.
        source_node: Arc<str>,
        /// Debug rendering of the edge destination.
        destination: Arc<str>,
        /// The rejected weight.
        weight: f64,
    },
    /// The tie tolerance must be finite and non-negative.
    #[error("tie tolerance must be finite and non-negative (got {got})")]
    InvalidTieTolerance {
        /// The rejected tolerance.
        got: f64,
    },
    /// Two required edges enter the same node.
    #[error("required edges {first} and {second} both enter {destination}")]
    ConflictingRequiredEdges {
        /// Debug rendering of the shared destination.
        destination: Arc<str>,
        /// Debug rendering of the first conflicting edge.
        first: Arc<str>,
        /// Debug rendering of the second conflicting edge.
        second: Arc<str>,
    },
    /// A required edge starts and ends at the same node.
    #[error("required edge {edge} is a self-loop")]
    RequiredSelfLoop {
        /// Debug rendering of the edge.
        edge: Arc<str>,
    },
    /// An edge was both required and banned.
    #[error("edge {edge} is both required and banned")]
    RequiredAndBanned {
        /// Debug rendering of the edge.
        edge: Arc<str>,
    },
    /// A required edge enters the node the tree is forced to be rooted at.
    #[error("required edge {edge} enters the designated root")]
    RequiredEdgeIntoRoot {
        /// Debug rendering of the edge.
        edge: Arc<str>,
    },
    /// A dense weight matrix was not square.
    #[error("weight matrix row {row} has {found} columns, expected {expected}")]
    NonSquareMatrix {
        /// Index of the offending row.
        row: usize,
        /// Number of rows (and therefore expected columns).
        expected: usize,
        /// Number of columns found on the row.
        found: usize,
    },
    /// A heap operation failed while running the algorithm.
    #[error("priority queue failure: {0}")]
    Heap(#[from] HeapError),
}

define_error_codes! {
    /// Stable codes describing [`ArborError`] variants.
    enum ArborErrorCode for ArborError {
        /// An edge weight was NaN or positive infinity.
        NonFiniteWeight => NonFiniteWeight { .. } => "ARBOR_NON_FINITE_WEIGHT",
        /// The tie tolerance must be finite and non-negative.
        InvalidTieTolerance => InvalidTieTolerance { .. } => "ARBOR_INVALID_TIE_TOLERANCE",
        /// Two required edges enter the same node.
        ConflictingRequiredEdges => ConflictingRequiredEdges { .. } => "ARBOR_CONFLICTING_REQUIRED_EDGES",
        /// A required edge is a self-loop.
        RequiredSelfLoop => RequiredSelfLoop { .. } => "ARBOR_REQUIRED_SELF_LOOP",
        /// An edge was both required and banned.
        RequiredAndBanned => RequiredAndBanned { .. } => "ARBOR_REQUIRED_AND_BANNED",
        /// A required edge enters the designated root.
        RequiredEdgeIntoRoot => RequiredEdgeIntoRoot { .. } => "ARBOR_REQUIRED_EDGE_INTO_ROOT",
        /// A dense weight matrix was not square.
        NonSquareMatrix => NonSquareMatrix { .. } => "ARBOR_NON_SQUARE_MATRIX",
        /// A heap operation failed while running the algorithm.
        HeapFailure => Heap { .. } => "ARBOR_HEAP_FAILURE",
    }
}

impl ArborError {
    /// Retrieve the inner [`HeapErrorCode`] when the error originated in the
    /// priority queues.
    pub const fn heap_code(&self) -> Option<HeapErrorCode> {
        match self {
            Self::Heap(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Renders a node or edge for inclusion in an error message.
pub(crate) fn render<T: fmt::Debug + ?Sized>(value: &T) -> Arc<str> {
    Arc::from(format!("{value:?}"))
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ArborError>;
