//! Tabular records keyed by borough name.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Tree counts for one borough
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCounts {
    pub total: u64,
    pub remarkable: u64,
}

impl TreeCounts {
    pub fn record(&mut self, remarkable: bool) {
        self.total += 1;
        if remarkable {
            self.remarkable += 1;
        }
    }

    pub fn non_remarkable(&self) -> u64 {
        self.total.saturating_sub(self.remarkable)
    }
}

impl AddAssign for TreeCounts {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.remarkable += other.remarkable;
    }
}

/// One community garden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    pub name: String,
    pub borough: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_counts() {
        let mut counts = TreeCounts::default();
        counts.record(true);
        counts.record(false);
        counts.record(false);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.remarkable, 1);
        assert_eq!(counts.non_remarkable(), 2);

        counts += TreeCounts { total: 2, remarkable: 2 };
        assert_eq!(counts, TreeCounts { total: 5, remarkable: 3 });
    }
}
