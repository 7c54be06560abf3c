//! Configuration for adjacency queries.

/// Configuration parameters for adjacency queries.
#[derive(Debug, Clone)]
pub struct AdjacencyConfig {
    /// Maximum number of lines whose trips are expanded concurrently.
    /// Larger batches finish sooner but burst more requests upstream.
    pub batch_size: usize,
}

impl AdjacencyConfig {
    /// Create a new configuration with the given batch size.
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Batch size, never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for AdjacencyConfig {
    fn default() -> Self {
        Self { batch_size: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(AdjacencyConfig::default().batch_size, 8);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let config = AdjacencyConfig::new(0);
        assert_eq!(config.batch_size, 0);
        assert_eq!(config.effective_batch_size(), 1);
    }
}
