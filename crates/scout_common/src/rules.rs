//! Data-driven rule tables.
//!
//! A table is an ordered list of `(label, pattern, category, weight)` rows.
//! Intent classification and feedback detection both evaluate their tables
//! through the same code; adding a rule never touches control flow.
//!
//! Patterns may name capture groups `slot` and `org`; their text is handed
//! back as extracted parameters.

use regex::Regex;

/// One row as written in source
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec<C> {
    pub label: &'static str,
    pub pattern: &'static str,
    pub category: C,
    pub weight: f64,
}

impl<C> RuleSpec<C> {
    pub const fn new(label: &'static str, pattern: &'static str, category: C, weight: f64) -> Self {
        Self {
            label,
            pattern,
            category,
            weight,
        }
    }
}

/// Compiled row
#[derive(Debug, Clone)]
pub struct Rule<C> {
    pub label: &'static str,
    pub pattern: Regex,
    pub category: C,
    pub weight: f64,
}

/// A rule that fired on some text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'t, C> {
    pub label: &'static str,
    pub category: C,
    pub weight: f64,
    /// Text of the `slot` group, trimmed
    pub slot: Option<&'t str>,
    /// Text of the `org` group, trimmed
    pub org: Option<&'t str>,
}

#[derive(Debug, Clone)]
pub struct RuleTable<C> {
    rules: Vec<Rule<C>>,
}

impl<C: Copy + PartialEq> RuleTable<C> {
    /// Compile every row; patterns are case-insensitive
    pub fn compile(specs: &[RuleSpec<C>]) -> Result<Self, regex::Error> {
        let rules = specs
            .iter()
            .map(|s| {
                Ok(Rule {
                    label: s.label,
                    pattern: Regex::new(&format!("(?i){}", s.pattern))?,
                    category: s.category,
                    weight: s.weight,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// First row (in table order) that fires
    pub fn first_match<'t>(&self, text: &'t str) -> Option<RuleMatch<'t, C>> {
        self.rules.iter().find_map(|r| Self::try_rule(r, text))
    }

    /// First row of `category` that fires
    pub fn first_in<'t>(&self, text: &'t str, category: C) -> Option<RuleMatch<'t, C>> {
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .find_map(|r| Self::try_rule(r, text))
    }

    /// First row whose category satisfies `pred`
    pub fn first_where<'t, P>(&self, text: &'t str, pred: P) -> Option<RuleMatch<'t, C>>
    where
        P: Fn(C) -> bool,
    {
        self.rules
            .iter()
            .filter(|r| pred(r.category))
            .find_map(|r| Self::try_rule(r, text))
    }

    /// Every row that fires, in table order
    pub fn all_matches<'t>(&self, text: &'t str) -> Vec<RuleMatch<'t, C>> {
        self.rules
            .iter()
            .filter_map(|r| Self::try_rule(r, text))
            .collect()
    }

    pub fn any(&self, text: &str, category: C) -> bool {
        self.rules
            .iter()
            .any(|r| r.category == category && r.pattern.is_match(text))
    }

    pub fn rules(&self) -> &[Rule<C>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn try_rule<'t>(rule: &Rule<C>, text: &'t str) -> Option<RuleMatch<'t, C>> {
        let caps = rule.pattern.captures(text)?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
        };
        Some(RuleMatch {
            label: rule.label,
            category: rule.category,
            weight: rule.weight,
            slot: group("slot"),
            org: group("org"),
        })
    }
}
