//! Error types for graph construction and the ordering engine.

/// Errors raised while building a graph or computing an ordering.
///
/// Input errors come first: the caller handed over something that is not a simple weighted
/// digraph, or whose weights do not fit the score range. `WeightUnderflow`, `BucketOutOfRange`,
/// `NotQueued`, `EmptyQueue` and `CorruptOrder` are invariant violations inside the engine; they indicate a
/// bug in the bookkeeping and never a bad input. `StepLimitExceeded` is the caller's own guard
/// tripping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FasError {
    /// An edge references a vertex outside `0..n`.
    #[error("edge ({from}, {to}) references a vertex outside 0..{n}")]
    VertexOutOfRange { from: usize, to: usize, n: usize },

    /// An edge starts and ends at the same vertex.
    #[error("self-loop at vertex {0}")]
    SelfLoop(usize),

    /// An edge carries a negative weight.
    #[error("edge ({from}, {to}) has negative weight {weight}")]
    NegativeWeight { from: usize, to: usize, weight: i64 },

    /// The same ordered pair occurs twice; parallel edges must be aggregated by the caller.
    #[error("duplicate edge ({from}, {to})")]
    DuplicateEdge { from: usize, to: usize },

    /// Summed incident weights do not fit the score range.
    #[error("incident weight of vertex {0} overflows")]
    WeightOverflow(usize),

    /// The score range `max_in + max_out + 2` exceeds the configured bucket limit.
    #[error("score range needs {max_in} + {max_out} + 2 buckets, limit is {limit}")]
    ScoreRangeTooLarge { max_in: u64, max_out: u64, limit: usize },

    /// The bucket arrays could not be allocated.
    #[error("cannot allocate a bucket queue of {buckets} buckets")]
    BucketAllocation { buckets: usize },

    /// A decrement would drive a remaining weight below zero.
    #[error("remaining {direction}-weight of vertex {vertex} is {remaining}, cannot subtract {by}")]
    WeightUnderflow {
        vertex: usize,
        direction: &'static str,
        remaining: u64,
        by: u64,
    },

    /// A vertex was filed under a bucket key the queue does not have.
    #[error("bucket {key} out of range (queue has {buckets} buckets)")]
    BucketOutOfRange { key: usize, buckets: usize },

    /// A vertex that should sit in a bucket is not queued.
    #[error("vertex {0} is not in any bucket")]
    NotQueued(usize),

    /// The bucket queue ran dry while vertices were still unordered.
    #[error("bucket queue empty with {remaining} vertices unordered")]
    EmptyQueue { remaining: usize },

    /// The assigned positions do not form a permutation.
    #[error("engine produced an order that is not a permutation")]
    CorruptOrder,

    /// The configured step limit was hit before every vertex was placed.
    #[error("step limit {limit} reached with {remaining} vertices unordered")]
    StepLimitExceeded { limit: usize, remaining: usize },
}

impl FasError {
    /// Returns true for errors that indicate a bug in the engine rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            FasError::WeightUnderflow { .. }
                | FasError::BucketOutOfRange { .. }
                | FasError::NotQueued(_)
                | FasError::EmptyQueue { .. }
                | FasError::CorruptOrder
        )
    }
}

pub type Result<T> = std::result::Result<T, FasError>;
