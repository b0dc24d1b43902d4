//! Version requirement expressions such as `~> 1.2.3` or `>= 1.0, < 2.0`.

use crate::domain::version::Version;
use crate::error::{GitImportError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

const CLAUSE_PATTERN: &str = r"^([^\d\s]*)\s*(\S*)$";

fn clause_regex() -> Result<Regex> {
    Regex::new(CLAUSE_PATTERN).map_err(|e| GitImportError::constraint(e.to_string()))
}

/// Comparison operator of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// `~>`: at least the given version, below the next incompatible one
    Pessimistic,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Pessimistic => "~>",
        }
    }
}

impl FromStr for Operator {
    type Err = GitImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "=" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            ">" => Ok(Operator::Greater),
            ">=" => Ok(Operator::GreaterOrEqual),
            "<" => Ok(Operator::Less),
            "<=" => Ok(Operator::LessOrEqual),
            "~>" => Ok(Operator::Pessimistic),
            other => Err(GitImportError::constraint(format!(
                "unsupported operator '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `(operator, version)` pair of a constraint
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub operator: Operator,
    pub version: Version,
    ceiling: Option<Version>,
}

impl Clause {
    /// Build a clause, validating operator-specific requirements
    pub fn new(operator: Operator, version: Version) -> Result<Self> {
        let ceiling = match operator {
            Operator::Pessimistic => Some(version.pessimistic_ceiling().ok_or_else(|| {
                GitImportError::constraint(format!(
                    "'~> {}' needs at least two version segments",
                    version
                ))
            })?),
            _ => None,
        };

        Ok(Clause {
            operator,
            version,
            ceiling,
        })
    }

    /// Parse a single clause like `">= 1.2"` or `"1.0.0"` (bare version means `=`)
    pub fn parse(clause: &str) -> Result<Self> {
        Clause::parse_with(&clause_regex()?, clause)
    }

    fn parse_with(re: &Regex, clause: &str) -> Result<Self> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err(GitImportError::constraint("empty clause"));
        }

        let captures = re.captures(clause).ok_or_else(|| {
            GitImportError::constraint(format!("cannot tokenize clause '{}'", clause))
        })?;

        let operator: Operator = captures[1].parse()?;
        let version = Version::parse(&captures[2]).ok_or_else(|| {
            GitImportError::constraint(format!("invalid version '{}' in '{}'", &captures[2], clause))
        })?;

        Clause::new(operator, version)
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self.operator {
            Operator::Equal => candidate == &self.version,
            Operator::NotEqual => candidate != &self.version,
            Operator::Greater => candidate > &self.version,
            Operator::GreaterOrEqual => candidate >= &self.version,
            Operator::Less => candidate < &self.version,
            Operator::LessOrEqual => candidate <= &self.version,
            // The upper bound ignores pre-release tags: `~> 1.0` rejects `2.0.0-rc.1`
            Operator::Pessimistic => {
                candidate >= &self.version
                    && self
                        .ceiling
                        .as_ref()
                        .is_some_and(|ceiling| &candidate.release() < ceiling)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

/// A set of clauses that must all hold.
///
/// Parsed once from a comma-separated expression and never mutated.
/// A constraint without clauses matches every version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionConstraint {
    expression: String,
    clauses: Vec<Clause>,
}

impl VersionConstraint {
    /// Parse a comma-separated requirement expression.
    ///
    /// # Arguments
    /// * `expression` - e.g. `"~> 1.0.0"`, `">= 1.2, < 2.0, != 1.5.0"`
    ///
    /// # Returns
    /// * `Ok(VersionConstraint)` - Parsed constraint (blank input yields the match-all constraint)
    /// * `Err(InvalidConstraint)` - If any clause has an unknown operator or malformed version
    pub fn parse(expression: &str) -> Result<Self> {
        let clauses = if expression.trim().is_empty() {
            Vec::new()
        } else {
            let re = clause_regex()?;
            expression
                .split(',')
                .map(|clause| Clause::parse_with(&re, clause))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(VersionConstraint {
            expression: expression.trim().to_string(),
            clauses,
        })
    }

    /// The constraint that accepts every version
    pub fn any() -> Self {
        VersionConstraint {
            expression: String::new(),
            clauses: Vec::new(),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The expression as the user wrote it
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// True iff every clause matches
    pub fn matches(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(version))
    }
}

impl FromStr for VersionConstraint {
    type Err = GitImportError;

    fn from_str(s: &str) -> Result<Self> {
        VersionConstraint::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", clauses.join(", "))
    }
}
