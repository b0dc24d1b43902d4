use semver::Prerelease;
use std::cmp::Ordering;
use std::fmt;

/// A dot-separated numeric version with an optional trailing pre-release.
///
/// Unlike semver, any number of numeric segments is accepted ("1", "1.2",
/// "1.2.3.4"). Comparison is segment-wise and numeric, with the shorter
/// sequence zero-padded, so `1.2` and `1.2.0` are equal. A pre-release sorts
/// before the release it belongs to (`1.0.0-beta < 1.0.0`).
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    pre: Option<Prerelease>,
}

impl Version {
    /// Create a release version from its numeric segments
    pub fn new(segments: impl Into<Vec<u64>>) -> Self {
        Version {
            segments: segments.into(),
            pre: None,
        }
    }

    /// Parse a version string that starts with a digit (e.g. "1.2.3", "2.0-rc.1").
    ///
    /// A pre-release may follow the numeric part, separated by `-` or `.`
    /// ("1.2.3-beta.1", "1.2.3.rc1").
    ///
    /// # Returns
    /// * `Some(Version)` - Successfully parsed version
    /// * `None` - If the string is not a version
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let numeric_end = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(input.len());
        let (numeric, rest) = input.split_at(numeric_end);

        let (numeric, pre) = match numeric.strip_suffix('.') {
            Some(stripped) if !rest.is_empty() => (stripped, Some(rest)),
            Some(_) => return None,
            None if rest.is_empty() => (numeric, None),
            None => (numeric, Some(rest.strip_prefix('-')?)),
        };

        let segments = numeric
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;

        let pre = match pre {
            Some(text) if text.is_empty() => return None,
            Some(text) => Some(Prerelease::new(text).ok()?),
            None => None,
        };

        Some(Version { segments, pre })
    }

    /// Parse a version from a tag name, ignoring any non-numeric prefix
    /// ("v1.2.3", "release-1.2" -> "1.2")
    pub fn from_tag(tag: &str) -> Option<Self> {
        Version::parse(tag.trim_start_matches(|c: char| !c.is_ascii_digit()))
    }

    /// Numeric segments as written
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Pre-release part, if any
    pub fn prerelease(&self) -> Option<&Prerelease> {
        self.pre.as_ref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// The same version with any pre-release dropped (`2.0.0-rc.1` -> `2.0.0`)
    pub fn release(&self) -> Version {
        Version::new(self.segments.clone())
    }

    /// Upper bound of the pessimistic range starting at this version.
    ///
    /// Drops the last segment and increments the one before it:
    /// `1.2.3` -> `1.3`, `1.2` -> `2`. Returns `None` for single-segment versions.
    pub fn pessimistic_ceiling(&self) -> Option<Version> {
        if self.segments.len() < 2 {
            return None;
        }

        let mut segments = self.segments[..self.segments.len() - 1].to_vec();
        if let Some(last) = segments.last_mut() {
            *last = last.saturating_add(1);
        }

        Some(Version::new(segments))
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        for index in 0..width {
            match self.segment(index).cmp(&other.segment(index)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
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

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", numeric.join("."))?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let version = v("1.2.3");
        assert_eq!(version.segments(), &[1, 2, 3]);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_version_parse_any_segment_count() {
        assert_eq!(v("7").segments(), &[7]);
        assert_eq!(v("1.2.3.4").segments(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_version_parse_prerelease() {
        let dashed = v("1.2.3-beta.1");
        assert_eq!(dashed.segments(), &[1, 2, 3]);
        assert_eq!(dashed.prerelease().unwrap().as_str(), "beta.1");

        let dotted = v("1.2.3.rc1");
        assert_eq!(dotted.segments(), &[1, 2, 3]);
        assert_eq!(dotted.prerelease().unwrap().as_str(), "rc1");
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in ["", "v1.2.3", "1..2", "1.2.", "1.2.3-", "1.2x", "latest", "1.2.3-be ta"] {
            assert!(Version::parse(input).is_none(), "{:?} should not parse", input);
        }
    }

    #[test]
    fn test_version_from_tag_strips_prefix() {
        assert_eq!(Version::from_tag("v1.2.3").unwrap(), v("1.2.3"));
        assert_eq!(Version::from_tag("V0.1.0").unwrap(), v("0.1.0"));
        assert_eq!(Version::from_tag("release-2.0").unwrap(), v("2.0"));
        assert!(Version::from_tag("nightly").is_none());
    }

    #[test]
    fn test_version_release_drops_prerelease() {
        let release = v("2.0.0-rc.1").release();
        assert!(!release.is_prerelease());
        assert_eq!(release, v("2.0.0"));
        assert_eq!(v("1.4").release(), v("1.4"));
    }

    #[test]
    fn test_version_comparison_is_numeric() {
        assert!(v("1.10.0") > v("1.9.0"));
        assert!(v("2") > v("1.99.99"));
        assert!(v("0.9.0") < v("1.0.0"));
    }

    #[test]
    fn test_version_zero_padding() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert!(v("1.2") < v("1.2.0.1"));
    }

    #[test]
    fn test_prerelease_sorts_before_release() {
        assert!(v("1.0.0-beta") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-rc.1") > v("0.9.9"));
    }

    #[test]
    fn test_pessimistic_ceiling() {
        assert_eq!(v("1.2.3").pessimistic_ceiling().unwrap(), v("1.3.0"));
        assert_eq!(v("1.2").pessimistic_ceiling().unwrap(), v("2.0"));
        assert!(v("1").pessimistic_ceiling().is_none());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("1.2.3.rc1").to_string(), "1.2.3-rc1");
    }
}
