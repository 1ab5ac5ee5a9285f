//! Pluggable rules gating selection and merging.
//!
//! The engine calls into rule sets but never hardcodes what a legal
//! selection or merge is. Hosts register [`SelectionRule`]s and
//! [`MergeRule`]s (or plain closures) at build time.

mod builtin;
mod rule;

pub use builtin::{Adjacent, Connected, MaxLength, MinLength, NoRevisit, SameValue, UniformValue};
pub use rule::{MergeRule, MergeRules, RuleSet, SelectionRule, SelectionRules};
