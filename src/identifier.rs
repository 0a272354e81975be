//! Jurisdiction identifiers and their derived forms.
//!
//! A jurisdiction identifier is what a human types ("My Jurisdiction",
//! "Café-Rules"). Every form used in the transformed tree is derived from it
//! here, in one place, so the forms cannot drift apart:
//!
//! ```text
//! display        My-Test Jurisdiction      titles, README, setup.py name
//! lowercase      my-test jurisdiction      folded + transliterated to ASCII
//! space_joined   my-test_jurisdiction      spaces collapsed, hyphens kept
//! snake_case     my_test_jurisdiction      valid Python module name
//! package_name   openfisca_my_test_jurisdiction
//! ```

use serde::Serialize;

use crate::error::{Result, TransformError};

/// Prefix of every OpenFisca package name.
pub const PACKAGE_PREFIX: &str = "openfisca_";

/// Prefix of the outer project directory (hyphenated).
pub const PROJECT_PREFIX: &str = "openfisca-";

/// Identifier the upstream country template is published under.
pub const TEMPLATE_IDENTIFIER: &str = "Country-Template";

/// Accented letters folded to plain ASCII. Applied after lowercasing.
const TRANSLITERATION: &[(char, &str)] = &[
    ('à', "a"), ('á', "a"), ('â', "a"), ('ã', "a"), ('ä', "a"), ('å', "a"), ('ā', "a"), ('ǎ', "a"),
    ('æ', "ae"),
    ('ç', "c"),
    ('è', "e"), ('é', "e"), ('ê', "e"), ('ë', "e"), ('ē', "e"), ('ě', "e"),
    ('ì', "i"), ('í', "i"), ('î', "i"), ('ï', "i"), ('ī', "i"), ('ǐ', "i"),
    ('ñ', "n"),
    ('ò', "o"), ('ó', "o"), ('ô', "o"), ('õ', "o"), ('ö', "o"), ('ø', "o"), ('ō', "o"), ('ǒ', "o"),
    ('œ', "oe"),
    ('ß', "ss"),
    ('ù', "u"), ('ú', "u"), ('û', "u"), ('ü', "u"), ('ū', "u"), ('ǔ', "u"),
    ('ǖ', "u"), ('ǘ', "u"), ('ǚ', "u"), ('ǜ', "u"),
    ('ý', "y"), ('ÿ', "y"),
];

/// A validated jurisdiction identifier with all derived forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionName {
    display: String,
    lowercase: String,
    space_joined: String,
    snake_case: String,
}

impl JurisdictionName {
    /// Validate `input` and derive every form.
    ///
    /// Surrounding whitespace is dropped. Allowed characters are letters,
    /// ASCII digits, spaces and hyphens; letters must fold to ASCII through
    /// the transliteration table.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TransformError::invalid(input, "identifier is empty"));
        }

        if let Some(bad) = trimmed.chars().find(|c| !is_allowed(*c)) {
            return Err(TransformError::invalid(
                input,
                format!("character {bad:?} is not a letter, digit, space or hyphen"),
            ));
        }

        if !trimmed.chars().any(char::is_alphanumeric) {
            return Err(TransformError::invalid(
                input,
                "identifier needs at least one letter or digit",
            ));
        }

        let lowercase = fold_to_ascii(trimmed).map_err(|c| {
            TransformError::invalid(input, format!("letter {c:?} has no ASCII transliteration"))
        })?;
        let space_joined = collapse_runs(&lowercase, ' ');
        let snake_case = collapse_runs(&space_joined, '-');

        Ok(Self {
            display: trimmed.to_string(),
            lowercase,
            space_joined,
            snake_case,
        })
    }

    /// Parse `input` as the replacement for `placeholder`.
    ///
    /// Also rejects identifiers whose derived forms would reintroduce the
    /// placeholder.
    pub fn parse_target(input: &str, placeholder: &JurisdictionName) -> Result<Self> {
        let target = Self::parse(input)?;
        if target.collides_with(placeholder) {
            return Err(TransformError::invalid(
                input,
                format!(
                    "derived names contain the template placeholder {:?}",
                    placeholder.display()
                ),
            ));
        }
        Ok(target)
    }

    /// The identifier of the upstream country template.
    pub fn template() -> Self {
        Self {
            display: TEMPLATE_IDENTIFIER.to_string(),
            lowercase: "country-template".to_string(),
            space_joined: "country-template".to_string(),
            snake_case: "country_template".to_string(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    pub fn space_joined(&self) -> &str {
        &self.space_joined
    }

    pub fn snake_case(&self) -> &str {
        &self.snake_case
    }

    /// `openfisca_<snake_case>`: the Python package directory.
    pub fn package_name(&self) -> String {
        format!("{}{}", PACKAGE_PREFIX, self.snake_case)
    }

    /// `openfisca-<space_joined>`: the outer project directory.
    pub fn project_dir_name(&self) -> String {
        format!("{}{}", PROJECT_PREFIX, self.space_joined)
    }

    /// True if substituting `self` for `placeholder` would leave a
    /// placeholder occurrence behind.
    pub fn collides_with(&self, placeholder: &JurisdictionName) -> bool {
        self.display.contains(&placeholder.display)
            || self.snake_case.contains(&placeholder.snake_case)
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == ' ' || c == '-'
}

/// Lowercase and transliterate. Returns the first letter with no ASCII form.
fn fold_to_ascii(input: &str) -> std::result::Result<String, char> {
    let mut out = String::with_capacity(input.len());
    for original in input.chars() {
        for c in original.to_lowercase() {
            if c.is_ascii() {
                out.push(c);
            } else if let Some((_, ascii)) = TRANSLITERATION.iter().find(|(from, _)| *from == c) {
                out.push_str(ascii);
            } else {
                return Err(original);
            }
        }
    }
    Ok(out)
}

/// Replace every run of `sep` with a single underscore.
fn collapse_runs(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c == sep {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_identifier() {
        let name = JurisdictionName::parse("Rules").unwrap();
        assert_eq!(name.display(), "Rules");
        assert_eq!(name.lowercase(), "rules");
        assert_eq!(name.space_joined(), "rules");
        assert_eq!(name.snake_case(), "rules");
        assert_eq!(name.package_name(), "openfisca_rules");
        assert_eq!(name.project_dir_name(), "openfisca-rules");
    }

    #[test]
    fn test_spaces_and_hyphens() {
        let name = JurisdictionName::parse("My-Test Jurisdiction").unwrap();
        assert_eq!(name.space_joined(), "my-test_jurisdiction");
        assert_eq!(name.snake_case(), "my_test_jurisdiction");
        assert_eq!(name.project_dir_name(), "openfisca-my-test_jurisdiction");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let name = JurisdictionName::parse("  New   South  Wales ").unwrap();
        assert_eq!(name.display(), "New   South  Wales");
        assert_eq!(name.snake_case(), "new_south_wales");
    }

    #[test]
    fn test_hyphen_runs_collapse() {
        let name = JurisdictionName::parse("a--b").unwrap();
        assert_eq!(name.space_joined(), "a--b");
        assert_eq!(name.snake_case(), "a_b");
    }

    #[test]
    fn test_accents_transliterate() {
        let name = JurisdictionName::parse("Café Template").unwrap();
        assert_eq!(name.snake_case(), "cafe_template");
        assert!(name.snake_case().is_ascii());
        assert_eq!(name.display(), "Café Template");
    }

    #[test]
    fn test_uppercase_accents_transliterate() {
        let name = JurisdictionName::parse("ÉTAT Ǖ").unwrap();
        assert_eq!(name.snake_case(), "etat_u");
    }

    #[test]
    fn test_template_matches_derivation() {
        let derived = JurisdictionName::parse(TEMPLATE_IDENTIFIER).unwrap();
        assert_eq!(derived, JurisdictionName::template());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(JurisdictionName::parse("").is_err());
        assert!(JurisdictionName::parse("   ").is_err());
    }

    #[test]
    fn test_rejects_punctuation() {
        for input in ["Rules!", "a_b", "a.b", "a/b", "tab\there"] {
            let err = JurisdictionName::parse(input).unwrap_err();
            assert!(
                matches!(err, TransformError::InvalidIdentifier { .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_separators_only() {
        assert!(JurisdictionName::parse("- -").is_err());
    }

    #[test]
    fn test_rejects_untransliterable_letter() {
        let err = JurisdictionName::parse("Ελλάδα").unwrap_err();
        assert!(err.to_string().contains("no ASCII transliteration"));
    }

    #[test]
    fn test_collision_with_template() {
        let template = JurisdictionName::template();
        assert!(JurisdictionName::parse("Country-Template")
            .unwrap()
            .collides_with(&template));
        assert!(JurisdictionName::parse("country template")
            .unwrap()
            .collides_with(&template));
        assert!(!JurisdictionName::parse("Rules").unwrap().collides_with(&template));
    }

    #[test]
    fn test_parse_target_rejects_collision() {
        let template = JurisdictionName::template();
        let err = JurisdictionName::parse_target("Big Country-Template", &template).unwrap_err();
        assert!(matches!(err, TransformError::InvalidIdentifier { .. }));
        assert!(err.to_string().contains("placeholder"));
        assert_eq!(
            JurisdictionName::parse_target(" Rules ", &template).unwrap().display(),
            "Rules"
        );
    }
}
