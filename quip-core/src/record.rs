//! Parsed command record and its typed accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fully parsed form of a single command line.
///
/// A record is constructed once, by [`CommandRecord::parse`] or
/// [`CommandRecord::from_args`], and never mutated afterwards. Identity is
/// defined solely over the trimmed source text: two records compare equal
/// and hash the same whenever their `text` matches.
///
/// Named parameters are kept in lexicographic name order, so iteration over
/// [`CommandRecord::params`] is deterministic. A repeated parameter name
/// fully replaces the earlier occurrence's value list.
///
/// [`CommandRecord::parse`]: struct.CommandRecord.html#method.parse
/// [`CommandRecord::from_args`]: struct.CommandRecord.html#method.from_args
/// [`CommandRecord::params`]: struct.CommandRecord.html#method.params
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandRecord {
    pub(crate) command: String,
    pub(crate) text: String,
    pub(crate) dir_params: Vec<String>,
    pub(crate) params: BTreeMap<String, Vec<String>>,
}

impl CommandRecord {
    /// Command name, the first bare token on the line. Empty string when no
    /// bare token precedes the first parameter-name marker.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Trimmed source text the record was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Direct parameters, the value tokens preceding the first
    /// parameter-name marker.
    pub fn dir_params(&self) -> &[String] {
        &self.dir_params
    }

    /// Named parameters in lexicographic name order.
    pub fn params(&self) -> &BTreeMap<String, Vec<String>> {
        &self.params
    }

    /// Value list of a named parameter, empty for unknown names.
    pub fn values(&self, name: &str) -> &[String] {
        self.params
            .get(name)
            .map(|values| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_param(&self, name: &str) -> bool {
        !name.is_empty() && self.params.contains_key(name)
    }

    /// Named-parameter value as `i32`. Recognizes `0x`, `0c` and `0b`
    /// radix prefixes. Returns the default on a missing or unparsable value.
    pub fn int(&self, name: &str, idx: usize, default: i32) -> i32 {
        match self.values(name).get(idx) {
            Some(value) => parse_i32(value).unwrap_or(default),
            None => default,
        }
    }

    /// Direct-parameter value as `i32`.
    pub fn dir_int(&self, idx: usize, default: i32) -> i32 {
        match self.dir_params.get(idx) {
            Some(value) => parse_i32(value).unwrap_or(default),
            None => default,
        }
    }

    /// Named-parameter value as `i64`. Recognizes `0x`, `0c` and `0b`
    /// radix prefixes.
    pub fn long(&self, name: &str, idx: usize, default: i64) -> i64 {
        match self.values(name).get(idx) {
            Some(value) => parse_i64(value).unwrap_or(default),
            None => default,
        }
    }

    /// Direct-parameter value as `i64`.
    pub fn dir_long(&self, idx: usize, default: i64) -> i64 {
        match self.dir_params.get(idx) {
            Some(value) => parse_i64(value).unwrap_or(default),
            None => default,
        }
    }

    /// Named-parameter value as `f32`.
    pub fn float(&self, name: &str, idx: usize, default: f32) -> f32 {
        match self.values(name).get(idx) {
            Some(value) => value.parse().unwrap_or(default),
            None => default,
        }
    }

    /// Direct-parameter value as `f32`.
    pub fn dir_float(&self, idx: usize, default: f32) -> f32 {
        match self.dir_params.get(idx) {
            Some(value) => value.parse().unwrap_or(default),
            None => default,
        }
    }

    /// Named-parameter value as `f64`.
    pub fn double(&self, name: &str, idx: usize, default: f64) -> f64 {
        match self.values(name).get(idx) {
            Some(value) => value.parse().unwrap_or(default),
            None => default,
        }
    }

    /// Direct-parameter value as `f64`.
    pub fn dir_double(&self, idx: usize, default: f64) -> f64 {
        match self.dir_params.get(idx) {
            Some(value) => value.parse().unwrap_or(default),
            None => default,
        }
    }

    /// Named-parameter value as `&str`.
    pub fn str<'a>(&'a self, name: &str, idx: usize, default: &'a str) -> &'a str {
        match self.values(name).get(idx) {
            Some(value) => value.as_str(),
            None => default,
        }
    }

    /// Direct-parameter value as `&str`.
    pub fn dir_str<'a>(&'a self, idx: usize, default: &'a str) -> &'a str {
        match self.dir_params.get(idx) {
            Some(value) => value.as_str(),
            None => default,
        }
    }
}

impl PartialEq for CommandRecord {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for CommandRecord {}

impl Hash for CommandRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for CommandRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        write!(formatter, "{}", self.text)
    }
}

fn parse_i32(s: &str) -> Option<i32> {
    if s.starts_with("0x") {
        return i32::from_str_radix(&s[2..], 16).ok();
    }
    if s.starts_with("0c") {
        return i32::from_str_radix(&s[2..], 8).ok();
    }
    if s.starts_with("0b") {
        return i32::from_str_radix(&s[2..], 2).ok();
    }
    s.parse().ok()
}

fn parse_i64(s: &str) -> Option<i64> {
    if s.starts_with("0x") {
        return i64::from_str_radix(&s[2..], 16).ok();
    }
    if s.starts_with("0c") {
        return i64::from_str_radix(&s[2..], 8).ok();
    }
    if s.starts_with("0b") {
        return i64::from_str_radix(&s[2..], 2).ok();
    }
    s.parse().ok()
}

#[test]
fn test_int_radix_prefixes() {
    let record = CommandRecord::parse("cmd #t 0x1F 0c17 0b101 42 notanum").unwrap();
    assert_eq!(record.int("t", 0, -1), 31);
    assert_eq!(record.int("t", 1, -1), 15);
    assert_eq!(record.int("t", 2, -1), 5);
    assert_eq!(record.int("t", 3, -1), 42);
    assert_eq!(record.int("t", 4, 9), 9);
    // out of range index falls back to the default
    assert_eq!(record.int("t", 5, 9), 9);
    assert_eq!(record.int("missing", 0, 7), 7);
    assert_eq!(record.long("t", 0, -1), 31);
}

#[test]
fn test_float_and_str_accessors() {
    let record = CommandRecord::parse("cmd 1 2.5 #t 3.14 pi").unwrap();
    assert_eq!(record.dir_int(0, -1), 1);
    assert_eq!(record.dir_float(1, 0.0), 2.5);
    assert_eq!(record.dir_double(1, 0.0), 2.5);
    assert_eq!(record.float("t", 0, 0.0), 3.14);
    assert_eq!(record.str("t", 1, "default"), "pi");
    assert_eq!(record.str("t", 2, "default"), "default");
    assert_eq!(record.dir_str(5, "none"), "none");
}

#[test]
fn test_identity_over_text() {
    use std::collections::hash_map::DefaultHasher;

    let a = CommandRecord::parse("cmd 1 #t x").unwrap();
    let b = CommandRecord::parse("  cmd 1 #t x  ").unwrap();
    assert_eq!(a, b);

    let mut hasher_a = DefaultHasher::new();
    let mut hasher_b = DefaultHasher::new();
    a.hash(&mut hasher_a);
    b.hash(&mut hasher_b);
    assert_eq!(hasher_a.finish(), hasher_b.finish());

    assert_ne!(a, CommandRecord::parse("cmd 1 #t y").unwrap());
}

#[test]
fn test_contains_param() {
    let record = CommandRecord::parse("cmd #t 1 #other").unwrap();
    assert!(record.contains_param("t"));
    assert!(record.contains_param("other"));
    assert!(!record.contains_param("missing"));
    assert!(!record.contains_param(""));
    assert_eq!(record.values("other"), &[] as &[String]);
}
