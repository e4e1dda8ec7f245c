use std::fmt::Display;

use itertools::Itertools;

use crate::containers::HashSet;
use crate::explanations::Deduction;

/// A set of deductions which together imply some other deduction, or a contradiction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Explanation {
    deductions: HashSet<Deduction>,
}

impl Explanation {
    pub fn new() -> Self {
        Explanation::default()
    }

    /// Adds `deduction`; returns false if it was already part of the explanation.
    pub fn add(&mut self, deduction: Deduction) -> bool {
        self.deductions.insert(deduction)
    }

    /// Removes `deduction`; returns whether it was part of the explanation.
    pub fn remove(&mut self, deduction: &Deduction) -> bool {
        self.deductions.remove(deduction)
    }

    pub fn contains(&self, deduction: &Deduction) -> bool {
        self.deductions.contains(deduction)
    }

    pub fn len(&self) -> usize {
        self.deductions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deduction> + '_ {
        self.deductions.iter()
    }

    /// The largest depth of a decision in this explanation, or 0 when no decision is involved.
    pub fn most_recent_decision_depth(&self) -> usize {
        self.deductions
            .iter()
            .filter_map(Deduction::decision_depth)
            .max()
            .unwrap_or(0)
    }
}

impl FromIterator<Deduction> for Explanation {
    fn from_iter<T: IntoIterator<Item = Deduction>>(iter: T) -> Self {
        Explanation {
            deductions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Deduction> for Explanation {
    fn extend<T: IntoIterator<Item = Deduction>>(&mut self, iter: T) {
        self.deductions.extend(iter)
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let deductions = self
            .deductions
            .iter()
            .map(|deduction| deduction.to_string())
            .sorted()
            .join(", ");
        write!(f, "<{deductions}>")
    }
}
