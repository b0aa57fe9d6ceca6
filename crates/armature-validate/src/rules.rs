//! Declarative per-field rule sets.

use std::collections::HashMap;

use regex::Regex;
use sqlx::{Row, SqlitePool};

use crate::checks;
use crate::error::Result;

/// A single validation rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present and non-empty.
    Required,
    /// Minimum length in characters.
    MinLength(usize),
    /// Set membership.
    OneOf(Vec<String>),
    /// Email address shape.
    Email,
    /// Letters and digits only.
    AlphaNumeric,
    /// Letters, digits, and spaces.
    AlphaNumericSpace,
    /// Letters, digits, underscores, and dashes.
    AlphaDash,
    /// Letters and spaces.
    AlphaSpace,
    /// Letters, digits, and a fixed punctuation set.
    AlphaNumericPunct,
    /// Parseable JSON document.
    ValidJson,
    /// http/https URL.
    ValidUrl,
    /// IPv4 or IPv6 address.
    ValidIp,
    /// Matches the given pattern.
    RegexMatch(Regex),
    /// Calendar date in `YYYY-MM-DD`.
    ValidDate,
    /// Luhn-valid card number.
    ValidCcNumber,
    /// No other row in `table.column` carries the value.
    ///
    /// The only rule needing a database round trip; evaluated by
    /// [`RuleSet::check_with_db`] and skipped by the sync check.
    Unique {
        /// Table probed for duplicates.
        table: String,
        /// Column probed for duplicates.
        column: String,
    },
}

/// The rules attached to one field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub(crate) rules: Vec<Rule>,
}

impl FieldRules {
    /// Creates an empty rule list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a non-empty value.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    /// Requires at least `n` characters.
    #[must_use]
    pub fn min_length(mut self, n: usize) -> Self {
        self.rules.push(Rule::MinLength(n));
        self
    }

    /// Requires membership in the given set.
    #[must_use]
    pub fn one_of(mut self, options: &[&str]) -> Self {
        self.rules
            .push(Rule::OneOf(options.iter().map(|s| String::from(*s)).collect()));
        self
    }

    /// Requires an email-shaped value.
    #[must_use]
    pub fn email(mut self) -> Self {
        self.rules.push(Rule::Email);
        self
    }

    /// Requires letters and digits only.
    #[must_use]
    pub fn alpha_numeric(mut self) -> Self {
        self.rules.push(Rule::AlphaNumeric);
        self
    }

    /// Requires letters, digits, and spaces only.
    #[must_use]
    pub fn alpha_numeric_space(mut self) -> Self {
        self.rules.push(Rule::AlphaNumericSpace);
        self
    }

    /// Requires letters, digits, underscores, and dashes only.
    #[must_use]
    pub fn alpha_dash(mut self) -> Self {
        self.rules.push(Rule::AlphaDash);
        self
    }

    /// Requires letters and spaces only.
    #[must_use]
    pub fn alpha_space(mut self) -> Self {
        self.rules.push(Rule::AlphaSpace);
        self
    }

    /// Requires letters, digits, and basic punctuation only.
    #[must_use]
    pub fn alpha_numeric_punct(mut self) -> Self {
        self.rules.push(Rule::AlphaNumericPunct);
        self
    }

    /// Requires a parseable JSON document.
    #[must_use]
    pub fn valid_json(mut self) -> Self {
        self.rules.push(Rule::ValidJson);
        self
    }

    /// Requires an http/https URL.
    #[must_use]
    pub fn valid_url(mut self) -> Self {
        self.rules.push(Rule::ValidUrl);
        self
    }

    /// Requires an IP address.
    #[must_use]
    pub fn valid_ip(mut self) -> Self {
        self.rules.push(Rule::ValidIp);
        self
    }

    /// Requires a match against the given pattern.
    #[must_use]
    pub fn regex_match(mut self, pattern: Regex) -> Self {
        self.rules.push(Rule::RegexMatch(pattern));
        self
    }

    /// Requires a `YYYY-MM-DD` date.
    #[must_use]
    pub fn valid_date(mut self) -> Self {
        self.rules.push(Rule::ValidDate);
        self
    }

    /// Requires a Luhn-valid card number.
    #[must_use]
    pub fn valid_cc_number(mut self) -> Self {
        self.rules.push(Rule::ValidCcNumber);
        self
    }

    /// Requires the value to be absent from `table.column`.
    #[must_use]
    pub fn unique(mut self, table: &str, column: &str) -> Self {
        self.rules.push(Rule::Unique {
            table: String::from(table),
            column: String::from(column),
        });
        self
    }
}

/// Rules for a whole request payload, in declaration order.
///
/// Fields evaluate independently and every applicable violation is
/// collected; a field with no rules never produces an error, and a
/// missing (or empty) value skips every rule except `required`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    fields: Vec<(String, FieldRules)>,
    id_field: String,
}

impl RuleSet {
    /// Creates an empty rule set. The current record's id, when present
    /// in the data under `id`, is excluded from uniqueness probes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            id_field: String::from("id"),
        }
    }

    /// Attaches rules to a field.
    #[must_use]
    pub fn field(mut self, name: &str, rules: FieldRules) -> Self {
        self.fields.push((String::from(name), rules));
        self
    }

    /// Changes the data key naming the current record's id.
    #[must_use]
    pub fn id_field(mut self, name: &str) -> Self {
        self.id_field = String::from(name);
        self
    }

    /// Runs every rule except `unique` and returns the violations.
    ///
    /// An empty vector means the payload passed.
    #[must_use]
    pub fn check(&self, data: &HashMap<String, String>) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, rules) in &self.fields {
            let value = data.get(field).map(String::as_str).filter(|v| !v.is_empty());

            match value {
                None => {
                    if rules.rules.iter().any(|r| matches!(r, Rule::Required)) {
                        errors.push(format!("{field} is required"));
                    }
                }
                Some(value) => {
                    for rule in &rules.rules {
                        if let Some(message) = violation(field, value, rule) {
                            errors.push(message);
                        }
                    }
                }
            }
        }

        errors
    }

    /// Runs every rule including `unique`, which probes the database.
    ///
    /// Fails only when a probe itself fails; rule violations come back as
    /// data like in [`check`](Self::check).
    pub async fn check_with_db(
        &self,
        data: &HashMap<String, String>,
        pool: &SqlitePool,
    ) -> Result<Vec<String>> {
        let mut errors = self.check(data);
        let current_id = data.get(&self.id_field).filter(|v| !v.is_empty());

        for (field, rules) in &self.fields {
            let Some(value) = data.get(field).filter(|v| !v.is_empty()) else {
                continue;
            };

            for rule in &rules.rules {
                let Rule::Unique { table, column } = rule else {
                    continue;
                };

                // Table and column come from rule declarations, never
                // from request data; the probed value is bound.
                let taken = match current_id {
                    Some(id) => {
                        let sql = format!(
                            "SELECT COUNT(*) FROM {table} WHERE {column} = ? AND {id} != ?",
                            id = self.id_field
                        );
                        let row = sqlx::query(&sql)
                            .bind(value.as_str())
                            .bind(id.as_str())
                            .fetch_one(pool)
                            .await?;
                        row.try_get::<i64, _>(0)? > 0
                    }
                    None => {
                        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?");
                        let row = sqlx::query(&sql)
                            .bind(value.as_str())
                            .fetch_one(pool)
                            .await?;
                        row.try_get::<i64, _>(0)? > 0
                    }
                };

                if taken {
                    errors.push(format!("{field} is already in use"));
                }
            }
        }

        Ok(errors)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The violation message for one rule against a present value, if any.
fn violation(field: &str, value: &str, rule: &Rule) -> Option<String> {
    let message = match rule {
        Rule::Required | Rule::Unique { .. } => return None,
        Rule::MinLength(n) => {
            if value.chars().count() >= *n {
                return None;
            }
            format!("{field} must be at least {n} characters long")
        }
        Rule::OneOf(options) => {
            if options.iter().any(|o| o == value) {
                return None;
            }
            format!("{field} must be one of: {}", options.join(", "))
        }
        Rule::Email => {
            if checks::is_email(value) {
                return None;
            }
            format!("{field} must be a valid email address")
        }
        Rule::AlphaNumeric => {
            if checks::is_alpha_numeric(value) {
                return None;
            }
            format!("{field} must contain only letters and numbers")
        }
        Rule::AlphaNumericSpace => {
            if checks::is_alpha_numeric_space(value) {
                return None;
            }
            format!("{field} must contain only letters, numbers, and spaces")
        }
        Rule::AlphaDash => {
            if checks::is_alpha_dash(value) {
                return None;
            }
            format!("{field} must contain only letters, numbers, underscores, and dashes")
        }
        Rule::AlphaSpace => {
            if checks::is_alpha_space(value) {
                return None;
            }
            format!("{field} must contain only letters and spaces")
        }
        Rule::AlphaNumericPunct => {
            if checks::is_alpha_numeric_punct(value) {
                return None;
            }
            format!("{field} contains disallowed characters")
        }
        Rule::ValidJson => {
            if checks::is_valid_json(value) {
                return None;
            }
            format!("{field} must be valid JSON")
        }
        Rule::ValidUrl => {
            if checks::is_valid_url(value) {
                return None;
            }
            format!("{field} must be a valid URL")
        }
        Rule::ValidIp => {
            if checks::is_valid_ip(value) {
                return None;
            }
            format!("{field} must be a valid IP address")
        }
        Rule::RegexMatch(pattern) => {
            if pattern.is_match(value) {
                return None;
            }
            format!("{field} has an invalid format")
        }
        Rule::ValidDate => {
            if checks::is_valid_date(value) {
                return None;
            }
            format!("{field} must be a valid date (YYYY-MM-DD)")
        }
        Rule::ValidCcNumber => {
            if checks::is_valid_cc_number(value) {
                return None;
            }
            format!("{field} must be a valid card number")
        }
    };

    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect()
    }

    fn username_rules() -> RuleSet {
        RuleSet::new().field("username", FieldRules::new().required().alpha_numeric())
    }

    #[test]
    fn test_passing_payload() {
        let errors = username_rules().check(&data(&[("username", "ab1")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let errors = username_rules().check(&data(&[]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("username"));
        assert!(errors[0].contains("required"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let errors = username_rules().check(&data(&[("username", "")]));
        assert_eq!(errors, vec!["username is required"]);
    }

    #[test]
    fn test_alpha_numeric_violation() {
        let errors = username_rules().check(&data(&[("username", "a b!")]));
        assert_eq!(
            errors,
            vec!["username must contain only letters and numbers"]
        );
    }

    #[test]
    fn test_all_violations_collected_per_field() {
        let rules = RuleSet::new().field(
            "username",
            FieldRules::new().required().min_length(5).alpha_numeric(),
        );
        let errors = rules.check(&data(&[("username", "a b")]));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("at least 5 characters"));
        assert!(errors[1].contains("only letters and numbers"));
    }

    #[test]
    fn test_missing_optional_field_skips_rules() {
        let rules = RuleSet::new().field("website", FieldRules::new().valid_url());
        assert!(rules.check(&data(&[])).is_empty());
    }

    #[test]
    fn test_field_without_matching_rules_never_errors() {
        let rules = RuleSet::new().field("note", FieldRules::new());
        assert!(rules.check(&data(&[("note", "anything at all !!")])).is_empty());
    }

    #[test]
    fn test_error_order_follows_declaration_order() {
        let rules = RuleSet::new()
            .field("email", FieldRules::new().required())
            .field("username", FieldRules::new().required());
        let errors = rules.check(&data(&[]));
        assert_eq!(errors, vec!["email is required", "username is required"]);
    }

    #[test]
    fn test_one_of() {
        let rules = RuleSet::new().field("role", FieldRules::new().one_of(&["admin", "user"]));
        assert!(rules.check(&data(&[("role", "admin")])).is_empty());
        let errors = rules.check(&data(&[("role", "root")]));
        assert_eq!(errors, vec!["role must be one of: admin, user"]);
    }

    #[test]
    fn test_regex_match() {
        let pattern = Regex::new(r"^\d{4}-\d{2}$").unwrap();
        let rules = RuleSet::new().field("period", FieldRules::new().regex_match(pattern));
        assert!(rules.check(&data(&[("period", "2024-06")])).is_empty());
        assert_eq!(
            rules.check(&data(&[("period", "June 2024")])),
            vec!["period has an invalid format"]
        );
    }

    #[test]
    fn test_unique_is_skipped_by_sync_check() {
        let rules = RuleSet::new().field(
            "email",
            FieldRules::new().required().unique("users", "email"),
        );
        assert!(rules.check(&data(&[("email", "dup@example.com")])).is_empty());
    }
}
