/// Capacity tuning and movement policy for an [AStar](crate::AStar) engine.
///
/// Everything except `allow_diagonal_movement` only affects allocation behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Initial capacity of the open heap and open map.
    pub open_set_capacity: usize,
    /// Initial capacity of the closed map.
    pub closed_set_capacity: usize,
    /// Nodes allocated up front by the pool.
    pub pool_initial_size: usize,
    /// Upper bound on nodes alive during one search. Reaching it aborts the search with
    /// [SearchError::PoolExhausted](crate::SearchError::PoolExhausted).
    pub pool_max_size: usize,
    /// Expand the four diagonal neighbours in addition to the orthogonal ones.
    pub allow_diagonal_movement: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            open_set_capacity: 32,
            closed_set_capacity: 32,
            pool_initial_size: 16,
            pool_max_size: usize::MAX,
            allow_diagonal_movement: false,
        }
    }
}

impl SearchConfig {
    /// Default capacities with diagonal movement switched on or off.
    pub fn with_diagonal(allow_diagonal_movement: bool) -> Self {
        Self {
            allow_diagonal_movement,
            ..Default::default()
        }
    }

    pub fn with_open_set_capacity(mut self, capacity: usize) -> Self {
        self.open_set_capacity = capacity;
        self
    }

    pub fn with_closed_set_capacity(mut self, capacity: usize) -> Self {
        self.closed_set_capacity = capacity;
        self
    }

    pub fn with_pool_initial_size(mut self, size: usize) -> Self {
        self.pool_initial_size = size;
        self
    }

    pub fn with_pool_max_size(mut self, size: usize) -> Self {
        self.pool_max_size = size;
        self
    }
}
