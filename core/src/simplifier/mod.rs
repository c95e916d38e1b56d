//! The stack simplifier.
//!
//! A single left-to-right pass over a program that folds every operator whose
//! operands are already known and leaves the rest on the stack as a residual,
//! still valid, postfix program.

mod aggregate;
mod clock;
mod operators;
mod simplify;


use hashbrown::HashMap;

use crate::stack::Stack;

pub use simplify::simplify;

/// Per-symbol count of occurrences that still need a binding.
///
/// Counts may dip below zero while a pass runs (a `TREND` fold releases its
/// series label), so only names with a positive count are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenBindings {
    counts: HashMap<String, i64>,
}

impl OpenBindings {
    pub fn open(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_string(), 1);
            }
        }
    }

    pub fn close(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count -= 1,
            None => {
                self.counts.insert(name.to_string(), -1);
            }
        }
    }

    pub fn count(&self, name: &str) -> i64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Names still unresolved, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|count| *count <= 0)
    }
}

/// What a pass leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub stack: Stack,
    pub open: OpenBindings,
}
