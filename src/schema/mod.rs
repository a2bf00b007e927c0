//! # Service Schemas
//!
//! A [`ServiceSchema`] is the static description of one kind of service
//! (database, cache, web server, runtime): which questions to ask, how raw
//! answer keys are renamed into environment variables, which defaults sit
//! underneath the answers, and which values are copied from other services.
//!
//! Schemas are YAML documents. Prompt behaviour that would otherwise need
//! callbacks is declarative: display conditions are [`Condition`]s and input
//! checks are [`Validation`]s, both evaluated against plain answer maps.
//!
//! ```yaml
//! name: php
//! path: images/php/php
//! prompt:
//!   development:
//!     - name: HOSTNAME
//!       message: Hostname
//!       default: localhost
//!       required: true
//! map:
//!   HOSTNAME: [HOSTNAME, HTTP_HOST]
//! defaults:
//!   dev: { TZ: Europe/Rome }
//! dependencies:
//!   - { target: DB_NAME, service: mysql, key: MYSQL_DATABASE }
//! ```

pub mod registry;

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub use registry::Registry;

/// Raw answers of one prompt batch, keyed by question name.
pub type Answers = BTreeMap<String, Value>;

/// Static definition of a service kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSchema {
    pub name: String,
    /// Output path prefix of the env files; `None` means nothing is written.
    #[serde(default)]
    pub path: Option<String>,
    /// Service key in the compose file, when it differs from `name`.
    #[serde(default)]
    pub compose: Option<String>,
    #[serde(default)]
    pub prompt: Option<Prompts>,
    #[serde(default)]
    pub map: BTreeMap<String, RenameTarget>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub dependencies: Vec<DependencyPointer>,
    #[serde(default)]
    pub generate: Vec<GenerateRule>,
}

impl ServiceSchema {
    /// Parse and check a schema document. `origin` names it in errors.
    pub fn from_yaml(origin: &str, text: &str) -> Result<Self> {
        let schema: ServiceSchema = serde_yaml::from_str(text).map_err(|e| Error::Schema {
            schema: origin.to_string(),
            message: e.to_string(),
        })?;
        schema.check()?;
        Ok(schema)
    }

    /// Compile every pattern once so broken regexes surface at load time.
    pub fn check(&self) -> Result<()> {
        for question in self.questions() {
            if let Some(Validation::Pattern { regex, .. }) = &question.validate {
                Regex::new(regex).map_err(|e| Error::Schema {
                    schema: self.name.clone(),
                    message: format!("question {}: {}", question.name, e),
                })?;
            }
            let is_choice = matches!(
                question.kind,
                QuestionKind::Select | QuestionKind::MultiSelect
            );
            if is_choice && question.choices.is_empty() {
                return Err(Error::Schema {
                    schema: self.name.clone(),
                    message: format!("question {} has no choices", question.name),
                });
            }
        }
        Ok(())
    }

    /// Compose service key of this schema.
    pub fn compose_key(&self) -> &str {
        self.compose.as_deref().unwrap_or(&self.name)
    }

    /// The environment targets this schema produces.
    pub fn target_kind(&self) -> TargetKind {
        match &self.prompt {
            Some(Prompts::Split { .. }) => TargetKind::Service,
            Some(Prompts::Flat(_)) => TargetKind::Main,
            None if self.defaults.main.is_empty()
                && (!self.defaults.dev.is_empty() || !self.defaults.prod.is_empty()) =>
            {
                TargetKind::Service
            }
            None => TargetKind::Main,
        }
    }

    fn questions(&self) -> impl Iterator<Item = &Question> {
        let (first, second): (&[Question], &[Question]) = match &self.prompt {
            Some(Prompts::Flat(questions)) => (questions.as_slice(), &[][..]),
            Some(Prompts::Split {
                development,
                production,
            }) => (
                development.as_slice(),
                production.as_deref().unwrap_or(&[]),
            ),
            None => (&[][..], &[][..]),
        };
        first.iter().chain(second.iter())
    }
}

/// Question sets of a schema.
///
/// A plain list is global configuration; a mapping is split into a
/// development set and an optional production set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompts {
    Flat(Vec<Question>),
    Split {
        development: Vec<Question>,
        #[serde(default)]
        production: Option<Vec<Question>>,
    },
}

/// Whether a schema resolves to a single `main` bucket or `dev` + `prod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Main,
    Service,
}

/// One environment target of a resolved service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Target {
    Main,
    Dev,
    Prod,
}

impl Target {
    pub fn label(self) -> &'static str {
        match self {
            Target::Main => "main",
            Target::Dev => "development",
            Target::Prod => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Input,
    Password,
    Select,
    MultiSelect,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validate: Option<Validation>,
    #[serde(default)]
    pub when: Condition,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Display predicate over the answers already given in the same batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    Never,
    Equals {
        key: String,
        value: Value,
    },
    NotEquals {
        key: String,
        value: Value,
    },
    Present(String),
    Absent(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn holds(&self, answers: &Answers) -> bool {
        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Equals { key, value } => answers.get(key) == Some(value),
            Condition::NotEquals { key, value } => answers.get(key) != Some(value),
            Condition::Present(key) => answers.get(key).is_some_and(|v| !is_blank(v)),
            Condition::Absent(key) => answers.get(key).is_none_or(is_blank),
            Condition::All(conditions) => conditions.iter().all(|c| c.holds(answers)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.holds(answers)),
        }
    }
}

/// A set of mutually exclusive choices of a multi-select question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub label: String,
    pub members: Vec<String>,
}

/// Input check; a failing check carries the message shown to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    Pattern {
        regex: String,
        message: String,
    },
    MinLength {
        min: usize,
        message: String,
    },
    /// `{label}` in the message is replaced by the offending group's label.
    Exclusive {
        groups: Vec<ExclusiveGroup>,
        message: String,
    },
}

impl Validation {
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Validation::Pattern { regex, message } => {
                let re = Regex::new(regex).map_err(|e| e.to_string())?;
                if re.is_match(&value_to_string(value)) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Validation::MinLength { min, message } => {
                if value_to_string(value).chars().count() >= *min {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Validation::Exclusive { groups, message } => {
                let selected: Vec<String> = match value {
                    Value::Array(items) => items.iter().map(value_to_string).collect(),
                    other => vec![value_to_string(other)],
                };
                for group in groups {
                    let hits = group
                        .members
                        .iter()
                        .filter(|m| selected.contains(m))
                        .count();
                    if hits > 1 {
                        return Err(message.replace("{label}", &group.label));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Rename target of a raw answer key: one key or a fan-out to many.
///
/// An empty list drops the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenameTarget {
    One(String),
    Many(Vec<String>),
}

impl RenameTarget {
    pub fn keys(&self) -> Vec<&str> {
        match self {
            RenameTarget::One(key) => vec![key.as_str()],
            RenameTarget::Many(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

/// Default values per target, merged underneath the renamed answers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub main: BTreeMap<String, Value>,
    #[serde(default)]
    pub dev: BTreeMap<String, Value>,
    #[serde(default)]
    pub prod: BTreeMap<String, Value>,
}

impl Defaults {
    pub fn for_target(&self, target: Target) -> &BTreeMap<String, Value> {
        match target {
            Target::Main => &self.main,
            Target::Dev => &self.dev,
            Target::Prod => &self.prod,
        }
    }
}

/// `target` in this service is copied from `key` of `service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPointer {
    pub target: String,
    pub service: String,
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    Lower,
    Alnum,
    Mixed,
}

impl Charset {
    fn alphabet(self) -> &'static [u8] {
        match self {
            Charset::Lower => b"abcdefghijklmnopqrstuvwxyz",
            Charset::Alnum => b"abcdefghijklmnopqrstuvwxyz0123456789",
            Charset::Mixed => {
                b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedValue {
    pub length: usize,
    pub charset: Charset,
}

impl GeneratedValue {
    /// A fresh random string drawn from the v4 UUID generator.
    pub fn generate(&self) -> String {
        let alphabet = self.charset.alphabet();
        // largest multiple of the alphabet size that fits in a byte
        let limit = 256 - 256 % alphabet.len();
        random_bytes()
            .filter(|byte| usize::from(*byte) < limit)
            .take(self.length)
            .map(|byte| alphabet[usize::from(byte) % alphabet.len()] as char)
            .collect()
    }
}

/// Endless random bytes from v4 UUIDs, minus the bytes holding the fixed
/// version (6) and variant (8) bits.
fn random_bytes() -> impl Iterator<Item = u8> {
    std::iter::repeat_with(|| uuid::Uuid::new_v4().into_bytes())
        .flat_map(|bytes| {
            bytes
                .into_iter()
                .enumerate()
                .filter(|(index, _)| *index != 6 && *index != 8)
                .map(|(_, byte)| byte)
        })
}

/// Fills blank keys with random values once a batch is answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRule {
    #[serde(default)]
    pub when: Condition,
    pub values: BTreeMap<String, GeneratedValue>,
}

/// True for null, empty strings and empty lists.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Environment-file representation of an answer or default.
///
/// Returns `None` for null, which means "leave the key out".
pub fn env_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(value_to_string(other)),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
