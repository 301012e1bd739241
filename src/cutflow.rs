//! Declaration of the sequential cuts of an analysis
//!
//! A cutflow is made of chains. A chain is a linear sequence of named
//! checkpoints, and every chain but the first one forks from a checkpoint of
//! an earlier chain. This expresses analyses whose selection splits into
//! several branches (one per channel, one per signal region...) while keeping
//! each branch a plain sequence of cuts.
//!
//! Within an event, a checkpoint may only be recorded right after the previous
//! checkpoint of its chain, and the first checkpoint of a forked chain only
//! after its fork point. This guarantees that counts never increase along a
//! chain. Any other recording order is a bug in the analysis code, and causes
//! a panic. This includes skipping forward over a checkpoint, since the later
//! checkpoint would then count an event that the earlier one did not.

use std::collections::HashMap;

/// A named checkpoint, located in the layout
#[derive(Clone, Debug, PartialEq, Eq)]
struct Checkpoint {
    name: String,
    chain: usize,
    position: usize,
}

/// Layout of the cutflow of an analysis
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutflowLayout {
    /// Checkpoints in declaration order
    checkpoints: Vec<Checkpoint>,

    /// Fork point of each chain (as a checkpoint index), None for the root
    forks: Vec<Option<usize>>,

    /// Checkpoint lookup by name
    index: HashMap<String, usize>,
}
//
impl CutflowLayout {
    /// Declare the root chain of the cutflow
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut layout = Self {
            checkpoints: Vec::new(),
            forks: Vec::new(),
            index: HashMap::new(),
        };
        layout.push_chain(None, names);
        layout
    }

    /// Declare a chain which forks after an existing checkpoint
    pub fn branch<S: Into<String>>(mut self, after: &str, names: impl IntoIterator<Item = S>) -> Self {
        let fork = self
            .position(after)
            .unwrap_or_else(|| panic!("Cannot branch after undeclared checkpoint {after:?}"));
        self.push_chain(Some(fork), names);
        self
    }

    fn push_chain<S: Into<String>>(&mut self, fork: Option<usize>, names: impl IntoIterator<Item = S>) {
        let chain = self.forks.len();
        self.forks.push(fork);
        let first = self.checkpoints.len();
        for (position, name) in names.into_iter().enumerate() {
            let name = name.into();
            let previous = self.index.insert(name.clone(), self.checkpoints.len());
            assert!(previous.is_none(), "Cutflow checkpoint {name:?} is declared twice");
            self.checkpoints.push(Checkpoint {
                name,
                chain,
                position,
            });
        }
        assert!(self.checkpoints.len() > first, "Cutflow chains cannot be empty");
    }

    /// Number of checkpoints
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Truth that no checkpoint is declared (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Number of chains
    pub fn num_chains(&self) -> usize {
        self.forks.len()
    }

    /// Declaration index of a checkpoint
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the checkpoint with a given declaration index
    pub fn name(&self, idx: usize) -> &str {
        &self.checkpoints[idx].name
    }

    /// Checkpoint names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checkpoints.iter().map(|cp| cp.name.as_str())
    }

    /// Declaration indices of the checkpoints of each chain, in chain order
    pub fn chains(&self) -> Vec<Vec<usize>> {
        let mut chains = vec![Vec::new(); self.num_chains()];
        for (idx, cp) in self.checkpoints.iter().enumerate() {
            chains[cp.chain].push(idx);
        }
        chains
    }

    /// Record that an event reached a checkpoint
    ///
    /// `cursors` holds, for each chain, how many of its checkpoints the event
    /// has already reached. Returns the declaration index of the checkpoint.
    ///
    pub(crate) fn advance(&self, cursors: &mut [usize], name: &str) -> usize {
        let idx = self
            .position(name)
            .unwrap_or_else(|| panic!("Cutflow checkpoint {name:?} was not declared"));
        let cp = &self.checkpoints[idx];
        assert_eq!(
            cursors[cp.chain], cp.position,
            "Cutflow checkpoint {name:?} recorded out of order"
        );
        if cp.position == 0 {
            if let Some(fork) = self.forks[cp.chain] {
                let fork_cp = &self.checkpoints[fork];
                assert!(
                    cursors[fork_cp.chain] > fork_cp.position,
                    "Cutflow checkpoint {name:?} recorded before its fork point {:?}",
                    fork_cp.name
                );
            }
        }
        cursors[cp.chain] += 1;
        idx
    }
}
