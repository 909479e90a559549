//! Pane layout planning.
//!
//! The grid is built from a fixed sequence of splits: the first pane is split
//! vertically into rows, then each row is split horizontally once, giving two
//! columns. [`plan_splits`] computes how many of each split are needed and
//! [`SessionPlan`] bundles that with the session name and host order.

use crate::error::{Result, ScitsiError};
use crate::naming::session_name;

/// Minimum number of hosts a session is built for.
pub const MIN_HOSTS: usize = 2;

/// Compute `(vertical, horizontal)` split counts for the given hosts.
///
/// Zero or one host needs no splits. Otherwise the vertical count is
/// `ceil(n / 2) - 1` and the horizontal count is `floor(n / 2)`, so that
/// `1 + vertical + horizontal == n`.
pub fn plan_splits<S>(hosts: &[S]) -> (usize, usize) {
    let n = hosts.len();
    if n < 2 {
        return (0, 0);
    }
    (n.div_ceil(2) - 1, n / 2)
}

/// Everything needed to build one multi-ssh session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    name: String,
    vertical_splits: usize,
    horizontal_splits: usize,
    hosts: Vec<String>,
}

impl SessionPlan {
    /// Plan a session for `hosts`, naming it with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`ScitsiError::InvalidHostList`] for fewer than two hosts.
    pub fn new(hosts: Vec<String>, prefix: &str) -> Result<Self> {
        if hosts.len() < MIN_HOSTS {
            return Err(ScitsiError::InvalidHostList(hosts.len()));
        }
        let (vertical_splits, horizontal_splits) = plan_splits(&hosts);
        Ok(Self {
            name: session_name(&hosts, prefix),
            vertical_splits,
            horizontal_splits,
            hosts,
        })
    }

    /// The tmux session name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertical_splits(&self) -> usize {
        self.vertical_splits
    }

    pub fn horizontal_splits(&self) -> usize {
        self.horizontal_splits
    }

    /// Hosts in pane order: host `i` goes to pane `i`.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Number of panes the split sequence produces.
    pub fn pane_count(&self) -> usize {
        1 + self.vertical_splits + self.horizontal_splits
    }
}
