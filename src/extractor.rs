//! Escaping-aware field extraction from a located text window.
//!
//! A field may show up as plain JSON (`"score":99`) or escaped one or more
//! levels deep inside a string literal (`\"score\":99`, `\\\"score\\\":99`).
//! Each [`FieldPattern`] holds an ordered list of tiers: the escaped form
//! first, then the plain form. The first tier that matches wins; when none
//! does the kind's default (`0` or `""`) is returned.

use regex::Regex;

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Quoted string. `allow_empty` accepts `"key":""` as a match.
    Text { allow_empty: bool },
    /// Unquoted run of digits.
    Integer,
}

/// Extracted value, or the kind's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(u64),
}

impl FieldValue {
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text { .. } => FieldValue::Text(String::new()),
            FieldKind::Integer => FieldValue::Integer(0),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Integer(n) => n.to_string(),
        }
    }

    pub fn as_integer(&self) -> u64 {
        match self {
            FieldValue::Integer(n) => *n,
            FieldValue::Text(text) => text.parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
struct Tier {
    pattern: Regex,
    unescape: bool,
}

/// Compiled tiers for one field key.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    kind: FieldKind,
    tiers: Vec<Tier>,
}

impl FieldPattern {
    pub fn text(key: &'static str) -> Self {
        Self::new(key, FieldKind::Text { allow_empty: false })
    }

    /// Text field where an explicit empty string counts as found.
    pub fn optional_text(key: &'static str) -> Self {
        Self::new(key, FieldKind::Text { allow_empty: true })
    }

    pub fn integer(key: &'static str) -> Self {
        Self::new(key, FieldKind::Integer)
    }

    pub fn new(key: &'static str, kind: FieldKind) -> Self {
        let tiers = vec![
            Tier {
                pattern: compile(&escaped_pattern(key, kind)),
                unescape: matches!(kind, FieldKind::Text { .. }),
            },
            Tier {
                pattern: compile(&plain_pattern(key, kind)),
                unescape: false,
            },
        ];
        Self { kind, tiers }
    }

    /// Best value across all tiers, or `None` when no tier matched.
    pub fn find(&self, window: &str) -> Option<FieldValue> {
        self.tiers
            .iter()
            .find_map(|tier| self.capture(tier, window))
    }

    /// Plain-JSON tier only. Used for the last-chance pass over the window.
    pub fn find_plain(&self, document: &str) -> Option<FieldValue> {
        self.tiers
            .last()
            .and_then(|tier| self.capture(tier, document))
    }

    pub fn extract(&self, window: &str) -> FieldValue {
        self.find(window)
            .unwrap_or_else(|| FieldValue::default_for(self.kind))
    }

    pub fn extract_text(&self, window: &str) -> String {
        self.extract(window).into_text()
    }

    pub fn extract_int(&self, window: &str) -> u64 {
        self.extract(window).as_integer()
    }

    fn capture(&self, tier: &Tier, text: &str) -> Option<FieldValue> {
        let raw = tier.pattern.captures(text)?.get(1)?.as_str();
        match self.kind {
            // Digit runs too long for u64 fall through to the next tier.
            FieldKind::Integer => raw.parse().ok().map(FieldValue::Integer),
            FieldKind::Text { .. } if tier.unescape => Some(FieldValue::Text(unescape(raw))),
            FieldKind::Text { .. } => Some(FieldValue::Text(raw.to_string())),
        }
    }
}

/// Presence test for `"key":true`, plain or escaped to any depth.
pub fn has_true_flag(window: &str, key: &str) -> bool {
    let pattern = format!(r#"\\*"{}\\*":true"#, regex::escape(key));
    Regex::new(&pattern)
        .map(|re| re.is_match(window))
        .unwrap_or(false)
}

/// Collapses `\\` to `\` and `\"` to `"`.
pub fn unescape(raw: &str) -> String {
    raw.replace(r"\\", r"\").replace(r#"\""#, r#"""#)
}

// One or more backslashes before each quote covers single and nested escaping.
fn escaped_pattern(key: &str, kind: FieldKind) -> String {
    let key = regex::escape(key);
    match kind {
        FieldKind::Text { allow_empty } => format!(
            r#"\\+"{key}\\+":\\+"([^\\"]{repeat})\\+""#,
            repeat = if allow_empty { "*" } else { "+" }
        ),
        FieldKind::Integer => format!(r#"\\+"{key}\\+":(\d+)"#),
    }
}

fn plain_pattern(key: &str, kind: FieldKind) -> String {
    let key = regex::escape(key);
    match kind {
        FieldKind::Text { allow_empty } => format!(
            r#""{key}":"([^"]{repeat})""#,
            repeat = if allow_empty { "*" } else { "+" }
        ),
        FieldKind::Integer => format!(r#""{key}":(\d+)"#),
    }
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // Keys are regex-escaped, so the generated pattern is always valid.
    Regex::new(pattern).expect("generated field pattern is valid")
}
