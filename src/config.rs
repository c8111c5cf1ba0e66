/// Which pending source the engine places next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePriority {
    /// Smallest remaining out-weight first; ties go to the smaller vertex index.
    #[default]
    LeastOutWeight,
    /// Largest remaining out-weight first; ties go to the larger vertex index.
    GreatestOutWeight,
}

/// Default cap on the number of buckets, about 1 GiB of bucket heads and tails.
pub const DEFAULT_MAX_BUCKETS: usize = 1 << 26;

/// Knobs for a single ordering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingConfig {
    pub source_priority: SourcePriority,
    /// Maximum number of placements before the engine gives up. `None` means unbounded.
    pub step_limit: Option<usize>,
    /// Order every strongly connected component on its own and glue the results in condensation
    /// order.
    pub decompose: bool,
    /// Largest bucket queue the engine will build. The queue needs `max_in + max_out + 2`
    /// buckets, so graphs with huge weighted degrees are rejected instead of exhausting memory.
    pub max_buckets: usize,
}

impl Default for OrderingConfig {
    fn default() -> OrderingConfig {
        OrderingConfig {
            source_priority: SourcePriority::default(),
            step_limit: None,
            decompose: false,
            max_buckets: DEFAULT_MAX_BUCKETS,
        }
    }
}

impl OrderingConfig {
    pub fn new() -> OrderingConfig {
        OrderingConfig::default()
    }

    pub fn with_source_priority(mut self, priority: SourcePriority) -> OrderingConfig {
        self.source_priority = priority;
        self
    }

    pub fn with_step_limit(mut self, limit: usize) -> OrderingConfig {
        self.step_limit = Some(limit);
        self
    }

    pub fn with_max_buckets(mut self, max_buckets: usize) -> OrderingConfig {
        self.max_buckets = max_buckets;
        self
    }

    pub fn with_decompose(mut self, decompose: bool) -> OrderingConfig {
        self.decompose = decompose;
        self
    }
}
