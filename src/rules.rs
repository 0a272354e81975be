//! Declarative rewrite rules.
//!
//! Two kinds of rule exist, each with a fixed scope:
//!
//! - [`Substitution`]: placeholder text → jurisdiction text. Applies to every
//!   file in the transform set. Built per invocation from the two names.
//! - [`MetadataReset`]: policy resets (version, maturity). Static data,
//!   applied to the designated metadata file only.
//!
//! Substitutions are evaluated together in one left-to-right pass over the
//! original content. When several patterns match at the same position the
//! earlier rule wins, and replacement text is never scanned again, so a
//! target that happens to contain a pattern cannot be rewritten twice.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::bytes::{Captures, Regex as BytesRegex};
use regex::Regex;
use serde::Serialize;

use crate::identifier::{JurisdictionName, PROJECT_PREFIX};

/// A literal, case-sensitive, whole-occurrence replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub pattern: String,
    pub replacement: String,
}

/// Ordered substitutions turning `placeholder` into `target`.
///
/// Order matters: the path-qualified form contains the bare form.
pub fn substitutions(placeholder: &JurisdictionName, target: &JurisdictionName) -> Vec<Substitution> {
    vec![
        Substitution {
            pattern: format!("{}{}", PROJECT_PREFIX, placeholder.snake_case()),
            replacement: format!("{}{}", PROJECT_PREFIX, target.space_joined()),
        },
        Substitution {
            pattern: placeholder.snake_case().to_string(),
            replacement: target.snake_case().to_string(),
        },
        Substitution {
            pattern: placeholder.display().to_string(),
            replacement: target.display().to_string(),
        },
    ]
}

/// Patterns that must not survive a transform.
pub fn placeholder_patterns(placeholder: &JurisdictionName) -> Vec<String> {
    vec![
        format!("{}{}", PROJECT_PREFIX, placeholder.snake_case()),
        placeholder.snake_case().to_string(),
        placeholder.display().to_string(),
    ]
}

/// A compiled set of substitutions.
///
/// The patterns become one alternation in rule order, matched over raw bytes
/// so files need not be UTF-8. Leftmost-first matching gives the rule
/// precedence described above.
#[derive(Debug, Clone)]
pub struct Rewriter {
    matcher: Option<BytesRegex>,
    replacements: Vec<Vec<u8>>,
}

impl Rewriter {
    pub fn new(rules: &[Substitution]) -> Result<Self, regex::Error> {
        let rules: Vec<&Substitution> = rules.iter().filter(|r| !r.pattern.is_empty()).collect();
        if rules.is_empty() {
            return Ok(Self {
                matcher: None,
                replacements: Vec::new(),
            });
        }

        let alternation = rules
            .iter()
            .map(|r| format!("({})", regex::escape(&r.pattern)))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            matcher: Some(BytesRegex::new(&alternation)?),
            replacements: rules.iter().map(|r| r.replacement.as_bytes().to_vec()).collect(),
        })
    }

    /// A rewriter that only finds `patterns`.
    pub fn detector(patterns: &[String]) -> Result<Self, regex::Error> {
        let rules: Vec<Substitution> = patterns
            .iter()
            .map(|p| Substitution {
                pattern: p.clone(),
                replacement: String::new(),
            })
            .collect();
        Self::new(&rules)
    }

    /// Rewrite `content` in one pass. Returns the result and the number of
    /// replacements made.
    pub fn rewrite<'a>(&self, content: &'a [u8]) -> (Cow<'a, [u8]>, usize) {
        let Some(matcher) = &self.matcher else {
            return (Cow::Borrowed(content), 0);
        };

        let mut count = 0;
        let out = matcher.replace_all(content, |caps: &Captures<'_>| {
            count += 1;
            // Group i+1 belongs to rule i.
            caps.iter()
                .skip(1)
                .position(|group| group.is_some())
                .map_or(&[][..], |rule| self.replacements[rule].as_slice())
        });
        (out, count)
    }

    /// Number of pattern occurrences in `content`.
    pub fn count(&self, content: &[u8]) -> usize {
        self.matcher
            .as_ref()
            .map_or(0, |matcher| matcher.find_iter(content).count())
    }
}

/// A policy reset applied to the metadata file.
#[derive(Debug, Clone, Copy)]
pub struct MetadataReset {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Version reported by a freshly bootstrapped package.
pub const INITIAL_VERSION: &str = "0.0.1";

/// Trove classifier a freshly bootstrapped package declares.
pub const INITIAL_MATURITY: &str = "Development Status :: 1 - Planning";

pub const METADATA_RESETS: &[MetadataReset] = &[
    MetadataReset {
        name: "version",
        pattern: r#"\bversion(\s*)=(\s*)(["'])[^"'\n]*["']"#,
        replacement: "version${1}=${2}${3}0.0.1${3}",
    },
    MetadataReset {
        name: "maturity",
        pattern: r#"Development Status :: \d+ - [^"'\n]+"#,
        replacement: INITIAL_MATURITY,
    },
];

static COMPILED_RESETS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    METADATA_RESETS
        .iter()
        .map(|reset| Regex::new(reset.pattern).expect("metadata reset patterns are valid"))
        .collect()
});

/// Apply every metadata reset to `content`.
///
/// Returns the new content and the names of the resets that matched.
pub fn apply_resets(content: &str) -> (String, Vec<&'static str>) {
    let mut current = content.to_string();
    let mut applied = Vec::new();

    for (reset, regex) in METADATA_RESETS.iter().zip(COMPILED_RESETS.iter()) {
        if regex.is_match(&current) {
            current = regex.replace_all(&current, reset.replacement).into_owned();
            applied.push(reset.name);
        }
    }

    (current, applied)
}
