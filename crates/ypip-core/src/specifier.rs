//! PEP 440 version specifiers: a comma-separated conjunction of clauses.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use ypip_util::errors::{YpipError, YpipResult};

use crate::version::Version;

static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<op>===|~=|!=|==|<=|>=|<|>)\s*(?P<v>.+)$").expect("valid clause regex")
});

/// One of `===` `~=` `!=` `==` `<=` `>=` `<` `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `===`, structural equality against the parsed version only.
    Identical,
    /// `~=`
    Compatible,
    NotEqual,
    Equal,
    LessThanEqual,
    GreaterThanEqual,
    LessThan,
    GreaterThan,
}

impl Operator {
    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "===" => Self::Identical,
            "~=" => Self::Compatible,
            "!=" => Self::NotEqual,
            "==" => Self::Equal,
            "<=" => Self::LessThanEqual,
            ">=" => Self::GreaterThanEqual,
            "<" => Self::LessThan,
            ">" => Self::GreaterThan,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identical => "===",
            Self::Compatible => "~=",
            Self::NotEqual => "!=",
            Self::Equal => "==",
            Self::LessThanEqual => "<=",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single compiled predicate, e.g. `>= 1.0` or `!= 1.2.*`.
#[derive(Debug, Clone)]
pub struct Clause {
    operator: Operator,
    version: Version,
    wildcard: bool,
}

impl Clause {
    /// Parse one clause. Wildcards are only recognised for `==` and `!=`;
    /// elsewhere a trailing `*` fails the version parse.
    pub fn parse(clause: &str) -> YpipResult<Self> {
        let caps = CLAUSE_RE
            .captures(clause.trim())
            .ok_or_else(|| YpipError::parse(clause, "not a PEP 440 specifier clause"))?;
        let operator = Operator::from_token(&caps["op"])
            .ok_or_else(|| YpipError::parse(clause, "unknown operator"))?;
        let text = caps["v"].trim();

        let (text, wildcard) = match operator {
            Operator::Equal | Operator::NotEqual => match text.strip_suffix('*') {
                Some(stripped) => (stripped.strip_suffix('.').unwrap_or(stripped), true),
                None => (text, false),
            },
            _ => (text, false),
        };

        let version = Version::parse(text)?;

        if wildcard
            && (version.pre().is_some()
                || version.post().is_some()
                || version.dev().is_some()
                || version.local().is_some())
        {
            return Err(YpipError::parse(
                clause,
                "wildcards may only follow a release segment",
            ));
        }
        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(YpipError::parse(
                clause,
                "~= needs at least two release components",
            ));
        }

        Ok(Self {
            operator,
            version,
            wildcard,
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn wildcard(&self) -> bool {
        self.wildcard
    }

    /// Evaluate the predicate against a candidate version.
    pub fn contains(&self, candidate: &Version) -> bool {
        let rhs = &self.version;
        match self.operator {
            Operator::Equal => self.equals(candidate),
            Operator::NotEqual => !self.equals(candidate),
            Operator::Identical => candidate.is_identical(rhs),
            Operator::LessThan => candidate < rhs,
            Operator::LessThanEqual => candidate <= rhs,
            Operator::GreaterThan => candidate > rhs,
            Operator::GreaterThanEqual => candidate >= rhs,
            Operator::Compatible => {
                let prefix = &rhs.release()[..rhs.release().len() - 1];
                candidate.matches_release_prefix(rhs.epoch(), prefix) && candidate >= rhs
            }
        }
    }

    fn equals(&self, candidate: &Version) -> bool {
        if self.wildcard {
            candidate.matches_release_prefix(self.version.epoch(), self.version.release())
        } else {
            candidate == &self.version
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.wildcard {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

/// A parsed version specifier. A version satisfies it when every clause holds.
#[derive(Debug, Clone)]
pub struct Specifier {
    clauses: Vec<Clause>,
}

impl Specifier {
    /// Parse a comma-separated list of clauses.
    pub fn parse(spec: &str) -> YpipResult<Self> {
        let spec_trimmed = spec.trim();
        if spec_trimmed.is_empty() {
            return Err(YpipError::parse(spec, "specifier string is empty"));
        }
        let clauses = spec_trimmed
            .split(',')
            .map(Clause::parse)
            .collect::<YpipResult<Vec<_>>>()?;
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True iff `version` satisfies every clause.
    pub fn contains(&self, version: &Version) -> bool {
        self.clauses.iter().all(|c| c.contains(version))
    }

    /// The versions from `versions` that satisfy every clause, in order.
    pub fn filter<'a, I>(&'a self, versions: I) -> impl Iterator<Item = &'a Version> + 'a
    where
        I: IntoIterator<Item = &'a Version>,
        I::IntoIter: 'a,
    {
        versions.into_iter().filter(move |v| self.contains(v))
    }

    /// The single version this specifier admits, for `== X` (without
    /// wildcard) and `=== X`.
    pub fn pinned(&self) -> Option<&Version> {
        match self.clauses.as_slice() {
            [clause] if clause.operator == Operator::Identical => Some(&clause.version),
            [clause] if clause.operator == Operator::Equal && !clause.wildcard => {
                Some(&clause.version)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(Clause::to_string).collect();
        f.write_str(&clauses.join(", "))
    }
}

impl FromStr for Specifier {
    type Err = YpipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
