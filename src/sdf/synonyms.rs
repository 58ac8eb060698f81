//! Synonym normalization for lipid names.
//!
//! Expands free-text synonyms into the canonical aliases used as lookup keys:
//! - headgroup abbreviations are substituted from a configurable table
//!   (`TG(...)` also becomes `TAG(...)`)
//! - two-chain shorthand drops per-chain annotations
//!   (`PC(16:0(9Z)/18:1(11Z))` becomes `PC(16:0/18:1)`), and each chain is
//!   also exposed as a fatty acid (`FA(16:0)`, `FA(18:1)`)
//! - fatty-acid shorthand becomes `FA(n:d)` (`C18:1n-9` and `18:1(9Z)` both
//!   become `FA(18:1)`)

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::sdf::types::error::Result;

/// Headgroup followed by a parenthesized remainder. Groups: headgroup, remainder.
pub const HEADGROUP_PATTERN: &str = r"^([A-Z]{2,4})(\(.*\))";
/// Two acyl chains with optional per-chain annotations. Groups: headgroup, chain 1, chain 2.
pub const TWO_CHAIN_PATTERN: &str =
    r"^([A-Z]{2,})\(([0-9]+:[0-9]+)(?:\([^)]*\))?/([0-9]+:[0-9]+)(?:\([^)]*\))?\)";
/// Carbon-prefixed fatty-acid shorthand, e.g. `C18:1n-9`. Group: `n:d`.
pub const FATTY_ACID_PATTERN: &str = r"^C([0-9]+:[0-9]+)n?-?[-0-9]*$";
/// Bare fatty-acid shorthand with optional stereo annotation, e.g. `18:1(9Z)`. Group: `n:d`.
pub const BARE_FATTY_ACID_PATTERN: &str = r"^([0-9]{1,2}:[0-9])\(?[0-9EZ]*\)?$";

/// Headgroup substitutions applied by default.
pub const DEFAULT_HEADGROUPS: &[(&str, &str)] = &[("TG", "TAG"), ("DG", "DAG")];

pub const DEFAULT_DELIMITER: char = ';';

/// Source text of the patterns a [`SynonymNormalizer`] compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymPatterns {
    pub headgroup: String,
    pub two_chain: String,
    pub fatty_acid: Vec<String>,
}

impl Default for SynonymPatterns {
    fn default() -> Self {
        Self {
            headgroup: HEADGROUP_PATTERN.to_string(),
            two_chain: TWO_CHAIN_PATTERN.to_string(),
            fatty_acid: vec![
                FATTY_ACID_PATTERN.to_string(),
                BARE_FATTY_ACID_PATTERN.to_string(),
            ],
        }
    }
}

/// Pure, total expansion of a raw synonym field into canonical aliases.
#[derive(Debug, Clone)]
pub struct SynonymNormalizer {
    headgroup: Regex,
    two_chain: Regex,
    fatty_acid: Vec<Regex>,
    headgroups: BTreeMap<String, String>,
    delimiter: char,
}

impl Default for SynonymNormalizer {
    fn default() -> Self {
        Self::new(&SynonymPatterns::default(), DEFAULT_HEADGROUPS.iter().copied())
            .expect("Invalid built-in synonym pattern")
    }
}

impl SynonymNormalizer {
    /// Compiles `patterns` and takes the headgroup substitution table.
    pub fn new<'a>(
        patterns: &SynonymPatterns,
        headgroups: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let fatty_acid = patterns
            .fatty_acid
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            headgroup: Regex::new(&patterns.headgroup)?,
            two_chain: Regex::new(&patterns.two_chain)?,
            fatty_acid,
            headgroups: headgroups
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            delimiter: DEFAULT_DELIMITER,
        })
    }

    /// Adds or replaces one headgroup substitution.
    pub fn with_headgroup(mut self, abbreviation: &str, substitute: &str) -> Self {
        self.headgroups.insert(abbreviation.to_string(), substitute.to_string());
        self
    }

    /// Adds or replaces several headgroup substitutions at once.
    pub fn with_headgroups<'t>(
        mut self,
        table: impl IntoIterator<Item = (&'t str, &'t str)>,
    ) -> Self {
        self.headgroups.extend(
            table
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string())),
        );
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn headgroups(&self) -> &BTreeMap<String, String> {
        &self.headgroups
    }

    /// Expands a delimiter-separated list of names into the set of lookup aliases.
    ///
    /// Every trimmed, non-empty input name is part of the result.
    pub fn normalize(&self, raw: &str) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = raw
            .split(self.delimiter)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let substituted: Vec<String> = names
            .iter()
            .filter_map(|name| self.substitute_headgroup(name))
            .collect();
        names.extend(substituted);

        let canonical: Vec<String> = names
            .iter()
            .flat_map(|name| self.canonical_forms(name))
            .collect();
        names.extend(canonical);

        names
    }

    fn substitute_headgroup(&self, name: &str) -> Option<String> {
        let caps = self.headgroup.captures(name)?;
        let substitute = self.headgroups.get(caps.get(1)?.as_str())?;
        Some(format!("{}{}", substitute, caps.get(2)?.as_str()))
    }

    fn canonical_forms(&self, name: &str) -> Vec<String> {
        let mut forms = Vec::new();

        if let Some(caps) = self.two_chain.captures(name) {
            if let (Some(hg), Some(c1), Some(c2)) = (caps.get(1), caps.get(2), caps.get(3)) {
                forms.push(format!("{}({}/{})", hg.as_str(), c1.as_str(), c2.as_str()));
                forms.push(format!("FA({})", c1.as_str()));
                forms.push(format!("FA({})", c2.as_str()));
            }
        }

        for pattern in &self.fatty_acid {
            if let Some(chain) = pattern.captures(name).and_then(|caps| caps.get(1)) {
                forms.push(format!("FA({})", chain.as_str()));
            }
        }

        forms
    }
}
