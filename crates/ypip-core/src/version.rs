//! PEP 440 version parsing, canonical formatting, and ordering.
//!
//! A version has one compulsory part (the release) and five optional ones:
//! `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`. Ordering compares, in
//! turn, the epoch, the zero-padded release, the pre-release, the
//! post-release, the dev release and finally the local segments.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use ypip_util::errors::{YpipError, YpipResult};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^
        v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:
            [-_.]?
            (?P<pre>alpha|a|beta|b|rc|preview|pre)
            [-_.]?
            (?P<pre_n>[0-9]+)?
        )?
        (?:
            (?:-(?P<post_implicit>[0-9]+))
            |
            (?:
                [-_.]?
                (?P<post>post|rev|r)
                [-_.]?
                (?P<post_n>[0-9]+)?
            )
        )?
        (?:
            [-_.]?
            (?P<dev>dev)
            [-_.]?
            (?P<dev_n>[0-9]+)?
        )?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .expect("valid version regex")
});

/// Pre-release phase, ordered `a < b < rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn from_marker(marker: &str) -> Self {
        match marker.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Self::Alpha,
            "b" | "beta" => Self::Beta,
            _ => Self::Rc,
        }
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::Rc => "rc",
        })
    }
}

/// One dot-separated piece of a local version label.
///
/// Purely decimal segments are numbers; anything else is kept as a lowercase
/// string. At the same position a number outranks a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalSegment {
    Number(u64),
    Text(String),
}

impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Greater,
            (Self::Text(_), Self::Number(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A parsed PEP 440 version.
///
/// Equality follows the total order, so `1.2 == 1.2.0`. Use
/// [`Version::is_identical`] for field-by-field comparison.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: Option<u64>,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

impl Version {
    /// Parse a version string, stripping surrounding whitespace and a leading `v`.
    pub fn parse(version: &str) -> YpipResult<Self> {
        let caps = VERSION_RE
            .captures(version.trim())
            .ok_or_else(|| YpipError::parse(version, "not a PEP 440 version"))?;

        let number = |name: &str| -> YpipResult<Option<u64>> {
            caps.name(name)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|e| YpipError::parse(version, format!("{name}: {e}")))
                })
                .transpose()
        };

        let release = caps["release"]
            .split('.')
            .map(|n| {
                n.parse::<u64>()
                    .map_err(|e| YpipError::parse(version, format!("release: {e}")))
            })
            .collect::<YpipResult<Vec<_>>>()?;

        let pre = match caps.name("pre") {
            Some(m) => Some((
                PreRelease::from_marker(m.as_str()),
                number("pre_n")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if caps.name("post_implicit").is_some() {
            number("post_implicit")?
        } else if caps.name("post").is_some() {
            Some(number("post_n")?.unwrap_or(0))
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number("dev_n")?.unwrap_or(0))
        } else {
            None
        };

        Ok(Self {
            epoch: number("epoch")?,
            release,
            pre,
            post,
            dev,
            local: parse_local(&caps),
        })
    }

    /// The declared epoch, `None` when the version string had no `N!`.
    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn pre(&self) -> Option<(PreRelease, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&[LocalSegment]> {
        self.local.as_deref()
    }

    /// True for pre-releases and dev releases.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    pub fn is_devrelease(&self) -> bool {
        self.dev.is_some()
    }

    /// The version without its local label.
    pub fn public(&self) -> Self {
        Self {
            local: None,
            ..self.clone()
        }
    }

    /// Epoch and release only, e.g. `1!2.0` for `1!2.0rc1.post2`.
    pub fn base_version(&self) -> Self {
        Self {
            epoch: self.epoch,
            release: self.release.clone(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Field-by-field equality: the release is compared without zero
    /// padding and an absent epoch differs from an explicit `0!`.
    pub fn is_identical(&self, other: &Self) -> bool {
        self.epoch == other.epoch
            && self.release == other.release
            && self.pre == other.pre
            && self.post == other.post
            && self.dev == other.dev
            && self.local == other.local
    }

    /// Whether the epoch and zero-padded release start with `prefix`.
    ///
    /// Used by wildcard equality (`== 1.2.*`) and compatible release (`~=`).
    pub fn matches_release_prefix(&self, epoch: Option<u64>, prefix: &[u64]) -> bool {
        self.epoch.unwrap_or(0) == epoch.unwrap_or(0)
            && prefix
                .iter()
                .enumerate()
                .all(|(i, p)| self.release.get(i).copied().unwrap_or(0) == *p)
    }

    /// Sort key for the pre-release field. A version carrying only a dev
    /// marker ranks below every pre-release of the same release.
    fn pre_key(&self) -> (u8, u64) {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => (0, 0),
            (Some((phase, n)), _, _) => (phase as u8 + 1, n),
            (None, _, _) => (4, 0),
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        }
    }

    fn trimmed_release(&self) -> &[u64] {
        let len = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);
        &self.release[..len]
    }
}

fn parse_local(caps: &Captures<'_>) -> Option<Vec<LocalSegment>> {
    let local = caps.name("local")?;
    Some(
        local
            .as_str()
            .split(['-', '_', '.'])
            .map(|seg| match seg.parse::<u64>() {
                Ok(n) if seg.bytes().all(|b| b.is_ascii_digit()) => LocalSegment::Number(n),
                _ => LocalSegment::Text(seg.to_ascii_lowercase()),
            })
            .collect(),
    )
}

/// Compare release sequences, padding the shorter one with zeros.
pub fn compare_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .unwrap_or(0)
            .cmp(&other.epoch.unwrap_or(0))
            .then_with(|| compare_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.unwrap_or(0).hash(state);
        self.trimmed_release().hash(state);
        self.pre_key().hash(state);
        self.post.hash(state);
        self.dev_key().hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = self.epoch {
            write!(f, "{epoch}!")?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        f.write_str(&release.join("."))?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{phase}{n}")?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(ref local) = self.local {
            let segments: Vec<String> = local.iter().map(LocalSegment::to_string).collect();
            write!(f, "+{}", segments.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = YpipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
