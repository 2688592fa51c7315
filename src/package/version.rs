//! APK version ordering.
//!
//! Versions look like `1.2.3a_rc1-r4`: dot separated numeric components, an
//! optional lowercase letter, any number of `_suffix[N]` parts and an optional
//! `-rN` package revision.

use std::cmp::Ordering;

/// Known version suffixes, oldest first. Everything up to `Rc` marks a
/// pre-release and sorts before the bare version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Suffix {
    Alpha,
    Beta,
    Pre,
    Rc,
    Cvs,
    Svn,
    Git,
    Hg,
    P,
}

impl Suffix {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "alpha" => Some(Suffix::Alpha),
            "beta" => Some(Suffix::Beta),
            "pre" => Some(Suffix::Pre),
            "rc" => Some(Suffix::Rc),
            "cvs" => Some(Suffix::Cvs),
            "svn" => Some(Suffix::Svn),
            "git" => Some(Suffix::Git),
            "hg" => Some(Suffix::Hg),
            "p" => Some(Suffix::P),
            _ => None,
        }
    }

    fn is_pre_release(self) -> bool {
        self <= Suffix::Rc
    }
}

/// A parsed APK version borrowing from the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version<'a> {
    numbers: Vec<&'a str>,
    letter: Option<u8>,
    suffixes: Vec<(Suffix, &'a str)>,
    revision: Option<&'a str>,
}

impl<'a> Version<'a> {
    /// Parse a version string. Returns `None` if it is not well formed.
    pub fn parse(s: &'a str) -> Option<Self> {
        let (main, revision) = match s.rsplit_once("-r") {
            Some((main, rev)) => (main, Some(digits(rev)?)),
            None => (s, None),
        };

        let mut parts = main.split('_');
        let head = parts.next()?;
        let (numbers, letter) = match head.as_bytes().last() {
            Some(c) if c.is_ascii_lowercase() => (&head[..head.len() - 1], Some(*c)),
            _ => (head, None),
        };
        let numbers = numbers
            .split('.')
            .map(digits)
            .collect::<Option<Vec<_>>>()?;

        let suffixes = parts
            .map(|part| {
                let split = part
                    .find(|c: char| !c.is_ascii_lowercase())
                    .unwrap_or(part.len());
                let (name, number) = part.split_at(split);
                let suffix = Suffix::from_name(name)?;
                let number = if number.is_empty() { "0" } else { digits(number)? };
                Some((suffix, number))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            numbers,
            letter,
            suffixes,
            revision,
        })
    }

    pub fn compare(&self, other: &Version<'_>) -> Ordering {
        for (idx, (a, b)) in self.numbers.iter().zip(&other.numbers).enumerate() {
            let ord = compare_component(idx == 0, a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        let ord = self
            .numbers
            .len()
            .cmp(&other.numbers.len())
            .then(self.letter.cmp(&other.letter));
        if ord != Ordering::Equal {
            return ord;
        }

        for ((sa, na), (sb, nb)) in self.suffixes.iter().zip(&other.suffixes) {
            let ord = sa.cmp(sb).then_with(|| compare_numeric(na, nb));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        let common = self.suffixes.len().min(other.suffixes.len());
        match (self.suffixes.get(common), other.suffixes.get(common)) {
            (Some((s, _)), None) if s.is_pre_release() => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, Some((s, _))) if s.is_pre_release() => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            _ => {}
        }

        match (self.revision, other.revision) {
            (Some(a), Some(b)) => compare_numeric(a, b),
            (a, b) => a.is_some().cmp(&b.is_some()),
        }
    }
}

fn digits(s: &str) -> Option<&str> {
    (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())).then_some(s)
}

/// Integer comparison on digit strings of any length.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Components after the first with a leading zero compare as decimal fractions.
fn compare_component(first: bool, a: &str, b: &str) -> Ordering {
    if !first && (a.starts_with('0') || b.starts_with('0')) {
        a.trim_end_matches('0').cmp(b.trim_end_matches('0'))
    } else {
        compare_numeric(a, b)
    }
}

/// Total order over version strings.
///
/// Invalid versions act as a zero value: equal to each other and older than
/// every valid version.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Some(va), Some(vb)) => va.compare(&vb),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_less(a: &str, b: &str) {
        assert_eq!(compare(a, b), Ordering::Less, "{} < {}", a, b);
        assert_eq!(compare(b, a), Ordering::Greater, "{} > {}", b, a);
    }

    #[test]
    fn test_parse_validity() {
        for v in ["1", "1.0", "3.13.0-r1", "1.2.3a", "1.0_rc1", "1.0_p2-r3", "2024.01.02-r0"] {
            assert!(Version::parse(v).is_some(), "{} should be valid", v);
        }
        for v in ["", "abc", "1..0", "1.0-x", "1.0_foo", "-r1", "1.0a.1", "1.0-r"] {
            assert!(Version::parse(v).is_none(), "{} should be invalid", v);
        }
    }

    #[test]
    fn test_numeric_components() {
        assert_eq!(compare("1.0", "1.0"), Ordering::Equal);
        assert_less("1.2", "1.10");
        assert_less("3.12.9", "3.13.0");
        assert_less("1.0", "1.0.1");
        assert_less("9", "10");
        assert_less("99999999999999999999999", "100000000000000000000000");
    }

    #[test]
    fn test_revisions() {
        assert_less("3.13.0", "3.13.0-r0");
        assert_less("3.13.0-r1", "3.13.0-r2");
        assert_less("3.13.0-r9", "3.13.0-r10");
        assert_less("3.13.0-r10", "3.13.1-r0");
    }

    #[test]
    fn test_suffixes() {
        assert_less("1.0_alpha", "1.0_beta");
        assert_less("1.0_beta", "1.0_pre");
        assert_less("1.0_pre", "1.0_rc");
        assert_less("1.0_rc1", "1.0_rc2");
        assert_less("1.0_rc2", "1.0");
        assert_less("1.0", "1.0_p1");
        assert_less("1.0_git", "1.0_p");
        assert_less("1.0_rc1-r5", "1.0-r0");
    }

    #[test]
    fn test_letters_and_leading_zeros() {
        assert_less("1.0", "1.0a");
        assert_less("1.0a", "1.0b");
        assert_less("1.0b", "1.1");
        assert_less("1.01", "1.1");
        assert_less("1.001", "1.01");
        assert_eq!(compare("1.0", "1.00"), Ordering::Equal);
    }

    #[test]
    fn test_invalid_versions_sort_first() {
        assert_less("not-a-version", "0.1");
        assert_eq!(compare("", "garbage"), Ordering::Equal);
    }

    #[test]
    fn test_sorting_is_stable_and_idempotent() {
        let mut versions = vec!["3.13.0-r2", "bogus", "3.12.1-r0", "3.13.0-r10", "3.13.0_rc1-r0"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(
            versions,
            vec!["bogus", "3.12.1-r0", "3.13.0_rc1-r0", "3.13.0-r2", "3.13.0-r10"]
        );
        let mut again = versions.clone();
        again.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, again);
    }
}
