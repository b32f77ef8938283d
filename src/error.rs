use core::fmt;

/// Errors that abort a search. A search that simply finds no path is not an error; it yields
/// [None].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The node pool reached its configured maximum while the frontier was still growing.
    PoolExhausted {
        /// Configured maximum number of live nodes.
        capacity: usize,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::PoolExhausted { capacity } => {
                write!(f, "node pool exhausted ({} nodes in use)", capacity)
            }
        }
    }
}

impl std::error::Error for SearchError {}
