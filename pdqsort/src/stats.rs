use std::fmt;

/// Counters describing which paths a single sort call took.
///
/// Filled in by the `*_with_stats` entry points. Counting is unconditional, the plain entry
/// points simply throw the numbers away.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Calls of the ordering predicate made by the engine.
    pub comparisons: u64,
    /// Element exchanges of any kind, pivot placement and pattern breaking included.
    pub exchanges: u64,
    /// Exchanges made inside the partition loops, pivot placement excluded.
    ///
    /// This is the counter that stays at zero for input that is already sorted: the pivot is
    /// still moved to the front and back, which [`exchanges`](Self::exchanges) records.
    pub partition_exchanges: u64,
    /// Partitions that put elements ordering before the pivot on the left.
    pub partitions_right: u64,
    /// Partitions that put elements equal to the pivot on the left.
    pub partitions_left: u64,
    /// Right partitions whose first scans met without a single exchange.
    pub already_partitioned: u64,
    /// Partitions where one side got less than an eighth of the elements.
    pub unbalanced_partitions: u64,
    /// Sub-ranges scrambled after an unbalanced partition.
    pub pattern_breaks: u64,
    /// Ranges finished by the partial insertion sort probe.
    pub partial_insertion_sorts: u64,
    /// Sub-ranges handed to heapsort because the depth budget ran out.
    pub heapsort_fallbacks: u64,
}

impl SortStats {
    /// Adds the counters of `other` to `self`.
    pub fn accumulate(&mut self, other: &SortStats) {
        self.comparisons += other.comparisons;
        self.exchanges += other.exchanges;
        self.partition_exchanges += other.partition_exchanges;
        self.partitions_right += other.partitions_right;
        self.partitions_left += other.partitions_left;
        self.already_partitioned += other.already_partitioned;
        self.unbalanced_partitions += other.unbalanced_partitions;
        self.pattern_breaks += other.pattern_breaks;
        self.partial_insertion_sorts += other.partial_insertion_sorts;
        self.heapsort_fallbacks += other.heapsort_fallbacks;
    }
}

impl fmt::Display for SortStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "comparisons: {} exchanges: {} (partition: {}) partitions: {} right {} left \
             (already partitioned: {}, unbalanced: {}) pattern breaks: {} \
             partial insertion sorts: {} heapsort fallbacks: {}",
            self.comparisons,
            self.exchanges,
            self.partition_exchanges,
            self.partitions_right,
            self.partitions_left,
            self.already_partitioned,
            self.unbalanced_partitions,
            self.pattern_breaks,
            self.partial_insertion_sorts,
            self.heapsort_fallbacks,
        )
    }
}
