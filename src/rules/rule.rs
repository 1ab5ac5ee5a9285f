//! Rule traits and ordered rule sets.
//!
//! Hosts implement `SelectionRule` to decide which blocks may join a
//! selection, and `MergeRule` to decide whether a finished selection may
//! merge. Plain closures implement both traits.
//!
//! ## Implementation Notes
//!
//! - Rules must be pure: same inputs, same answer, no side effects
//! - Rules are evaluated in registration order; the first `false` wins
//! - Rules see the selection read-only and never the game itself

use tracing::trace;

use crate::core::{Block, Grid};

/// Gate on growing a selection.
pub trait SelectionRule {
    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "selection rule"
    }

    /// May `candidate` join `selection`?
    fn allows(&self, candidate: &Block, selection: &[Block], grid: &Grid) -> bool;
}

impl<F> SelectionRule for F
where
    F: Fn(&Block, &[Block], &Grid) -> bool,
{
    fn allows(&self, candidate: &Block, selection: &[Block], grid: &Grid) -> bool {
        self(candidate, selection, grid)
    }
}

/// Gate on merging a finished selection.
pub trait MergeRule {
    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "merge rule"
    }

    /// May `selection` merge?
    fn allows(&self, selection: &[Block], grid: &Grid) -> bool;
}

impl<F> MergeRule for F
where
    F: Fn(&[Block], &Grid) -> bool,
{
    fn allows(&self, selection: &[Block], grid: &Grid) -> bool {
        self(selection, grid)
    }
}

/// Ordered collection of rules with AND semantics.
pub struct RuleSet<R: ?Sized> {
    rules: Vec<Box<R>>,
}

impl<R: ?Sized> Default for RuleSet<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R: ?Sized> RuleSet<R> {
    /// Create an empty rule set. An empty set allows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a boxed rule.
    pub fn push(&mut self, rule: Box<R>) {
        self.rules.push(rule);
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

impl RuleSet<dyn SelectionRule> {
    /// Append a selection rule.
    pub fn add(&mut self, rule: impl SelectionRule + 'static) {
        self.push(Box::new(rule));
    }

    /// Evaluate every rule in order, stopping at the first rejection.
    #[must_use]
    pub fn evaluate(&self, candidate: &Block, selection: &[Block], grid: &Grid) -> bool {
        self.rules.iter().all(|rule| {
            let allowed = rule.allows(candidate, selection, grid);
            if !allowed {
                trace!(rule = rule.name(), block = %candidate.id, "selection rejected");
            }
            allowed
        })
    }
}

impl RuleSet<dyn MergeRule> {
    /// Append a merge rule.
    pub fn add(&mut self, rule: impl MergeRule + 'static) {
        self.push(Box::new(rule));
    }

    /// Evaluate every rule in order, stopping at the first rejection.
    #[must_use]
    pub fn evaluate(&self, selection: &[Block], grid: &Grid) -> bool {
        self.rules.iter().all(|rule| {
            let allowed = rule.allows(selection, grid);
            if !allowed {
                trace!(rule = rule.name(), len = selection.len(), "merge rejected");
            }
            allowed
        })
    }
}

impl<R: ?Sized> std::fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet").field("len", &self.rules.len()).finish()
    }
}

/// Selection rules, in registration order.
pub type SelectionRules = RuleSet<dyn SelectionRule>;

/// Merge rules, in registration order.
pub type MergeRules = RuleSet<dyn MergeRule>;
