//! # Interactive Configuration Collector
//!
//! Walks the selected services in order and asks each schema's questions,
//! producing one [`RawAnswer`] per service. The flow rules live here and not
//! in the terminal backend:
//!
//! - a service without a schema yields a placeholder answer (no schema, no
//!   batches); unknown services are tolerated
//! - a schema without prompts yields an answer with no batches
//! - split schemas ask development questions first, then production ones if
//!   there are any
//! - a question whose `when` condition fails is skipped and contributes no key
//! - blank input falls back to the question default
//! - required and validated questions are asked again until they pass
//!
//! Where the answers come from is a [`Prompter`]: [`DialoguerPrompter`] for a
//! terminal, [`AnswerFilePrompter`] for a pre-filled YAML file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::output::OutputConfig;
use crate::schema::{
    env_value, is_blank, Answers, Prompts, Question, QuestionKind, Registry, ServiceSchema,
    Target,
};

/// Answers collected for one selected service.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnswer<'a> {
    /// The name the operator selected, e.g. `php7`.
    pub service: String,
    /// `None` when no schema matches the selected name.
    pub schema: Option<&'a ServiceSchema>,
    /// One answer batch per prompted target.
    pub batches: BTreeMap<Target, Answers>,
}

impl<'a> RawAnswer<'a> {
    pub fn placeholder(service: &str) -> Self {
        Self {
            service: service.to_string(),
            schema: None,
            batches: BTreeMap::new(),
        }
    }
}

/// Source of answers for individual questions.
pub trait Prompter {
    /// Called before the questions of one service target are asked.
    fn section(&mut self, _service: &str, _schema: &ServiceSchema, _target: Target) {}

    /// Ask one question. A blank reply (null or empty) means "use the default".
    fn ask(&mut self, question: &Question) -> Result<Value>;

    /// The last reply was not accepted. Returning an error aborts collection.
    fn reject(&mut self, question: &Question, message: &str) -> Result<()>;
}

/// Ask every selected service's questions, strictly one service at a time.
pub fn collect<'a>(
    registry: &'a Registry,
    selected: &[String],
    prompter: &mut dyn Prompter,
) -> Result<Vec<RawAnswer<'a>>> {
    let mut collected = Vec::with_capacity(selected.len());
    for service in selected {
        collected.push(collect_service(registry, service, prompter)?);
    }
    Ok(collected)
}

/// Ask the questions of a single service.
pub fn collect_service<'a>(
    registry: &'a Registry,
    service: &str,
    prompter: &mut dyn Prompter,
) -> Result<RawAnswer<'a>> {
    let Some(schema) = registry.get(service) else {
        debug!("No schema for '{}', using a placeholder", service);
        return Ok(RawAnswer::placeholder(service));
    };

    let mut batches = BTreeMap::new();
    match &schema.prompt {
        None => {}
        Some(Prompts::Flat(questions)) => {
            prompter.section(service, schema, Target::Main);
            let answers = ask_batch(schema, questions, prompter)?;
            batches.insert(Target::Main, answers);
        }
        Some(Prompts::Split {
            development,
            production,
        }) => {
            prompter.section(service, schema, Target::Dev);
            let dev = ask_batch(schema, development, prompter)?;
            batches.insert(Target::Dev, dev);

            if let Some(production) = production.as_ref().filter(|p| !p.is_empty()) {
                prompter.section(service, schema, Target::Prod);
                let prod = ask_batch(schema, production, prompter)?;
                batches.insert(Target::Prod, prod);
            }
        }
    }

    Ok(RawAnswer {
        service: service.to_string(),
        schema: Some(schema),
        batches,
    })
}

fn ask_batch(
    schema: &ServiceSchema,
    questions: &[Question],
    prompter: &mut dyn Prompter,
) -> Result<Answers> {
    let mut answers = Answers::new();
    for question in questions {
        if !question.when.holds(&answers) {
            continue;
        }
        let value = ask_until_valid(question, prompter)?;
        answers.insert(question.name.clone(), value);
    }

    for rule in &schema.generate {
        if !rule.when.holds(&answers) {
            continue;
        }
        for (key, generated) in &rule.values {
            if answers.get(key).is_none_or(is_blank) {
                answers.insert(key.clone(), Value::String(generated.generate()));
            }
        }
    }
    Ok(answers)
}

fn ask_until_valid(question: &Question, prompter: &mut dyn Prompter) -> Result<Value> {
    loop {
        let reply = prompter.ask(question)?;
        let value = match (&question.default, is_blank(&reply)) {
            (Some(default), true) => default.clone(),
            (None, true) => Value::String(String::new()),
            _ => reply,
        };

        if question.required && is_blank(&value) {
            prompter.reject(question, "A value is required")?;
            continue;
        }
        if let Some(validation) = &question.validate {
            if let Err(message) = validation.check(&value) {
                prompter.reject(question, &message)?;
                continue;
            }
        }
        return Ok(value);
    }
}

/// Terminal prompts through `dialoguer`.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
    out: OutputConfig,
}

impl DialoguerPrompter {
    pub fn new(out: OutputConfig) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            out,
        }
    }
}

impl Prompter for DialoguerPrompter {
    fn section(&mut self, service: &str, _schema: &ServiceSchema, target: Target) {
        println!();
        match target {
            Target::Main => println!("{}", self.out.step(&format!("Configuring {}", service))),
            other => println!(
                "{}",
                self.out
                    .step(&format!("Configuring {} ({})", service, other.label()))
            ),
        }
    }

    fn ask(&mut self, question: &Question) -> Result<Value> {
        let items: Vec<&str> = question.choices.iter().map(|c| c.name.as_str()).collect();
        match question.kind {
            QuestionKind::Input => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(question.message.as_str())
                    .allow_empty(true);
                if let Some(default) = question.default.as_ref().and_then(env_value) {
                    input = input.default(default);
                }
                Ok(Value::String(input.interact_text()?))
            }
            QuestionKind::Password => {
                let password = Password::with_theme(&self.theme)
                    .with_prompt(question.message.as_str())
                    .allow_empty_password(true)
                    .interact()?;
                Ok(Value::String(password))
            }
            QuestionKind::Select => {
                let default = question
                    .default
                    .as_ref()
                    .and_then(|d| question.choices.iter().position(|c| &c.value == d))
                    .unwrap_or(0);
                let index = Select::with_theme(&self.theme)
                    .with_prompt(question.message.as_str())
                    .items(&items)
                    .default(default)
                    .interact()?;
                Ok(question.choices[index].value.clone())
            }
            QuestionKind::MultiSelect => {
                let indexes = MultiSelect::with_theme(&self.theme)
                    .with_prompt(question.message.as_str())
                    .items(&items)
                    .interact()?;
                Ok(Value::Array(
                    indexes
                        .into_iter()
                        .map(|i| question.choices[i].value.clone())
                        .collect(),
                ))
            }
            QuestionKind::Confirm => {
                let default = question
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let confirmed = Confirm::with_theme(&self.theme)
                    .with_prompt(question.message.as_str())
                    .default(default)
                    .interact()?;
                Ok(Value::Bool(confirmed))
            }
        }
    }

    fn reject(&mut self, _question: &Question, message: &str) -> Result<()> {
        eprintln!("{}", self.out.failure(message));
        Ok(())
    }
}

/// Answers read from a YAML document instead of a terminal.
///
/// ```yaml
/// services:
///   services: [nginx, mysql, php]
/// main:
///   PROJECT_NAME: shop
/// mysql:
///   development:
///     MYSQL_DATABASE: shop
///     GEN_UP: "no"
/// ```
///
/// Flat schemas are keyed `service → question`, split schemas
/// `service → development|production → question`. Select answers may name a
/// choice by value or by label. A missing answer takes the question default;
/// an answer that is still invalid aborts with [`Error::InvalidAnswer`].
pub struct AnswerFilePrompter {
    document: Value,
    service: String,
    schema_name: String,
    target: Target,
}

impl AnswerFilePrompter {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_value(serde_yaml::from_str(&text)?))
    }

    pub fn from_value(document: Value) -> Self {
        Self {
            document,
            service: String::new(),
            schema_name: String::new(),
            target: Target::Main,
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        [&self.service, &self.schema_name]
            .into_iter()
            .filter_map(|name| self.document.get(name.as_str()))
            .find_map(|section| match self.target {
                Target::Main => section.get(key),
                other => section.get(other.label()).and_then(|t| t.get(key)),
            })
    }
}

impl Prompter for AnswerFilePrompter {
    fn section(&mut self, service: &str, schema: &ServiceSchema, target: Target) {
        self.service = service.to_string();
        self.schema_name = schema.name.clone();
        self.target = target;
    }

    fn ask(&mut self, question: &Question) -> Result<Value> {
        let Some(given) = self.lookup(&question.name).cloned() else {
            return Ok(Value::Null);
        };
        let to_choice = |item: Value| -> Value {
            if question.choices.iter().any(|c| c.value == item) {
                return item;
            }
            question
                .choices
                .iter()
                .find(|c| item.as_str() == Some(c.name.as_str()))
                .map(|c| c.value.clone())
                .unwrap_or(item)
        };
        Ok(match question.kind {
            QuestionKind::Select => to_choice(given),
            QuestionKind::MultiSelect => match given {
                Value::Array(items) => Value::Array(items.into_iter().map(to_choice).collect()),
                single => Value::Array(vec![to_choice(single)]),
            },
            _ => given,
        })
    }

    fn reject(&mut self, question: &Question, message: &str) -> Result<()> {
        Err(Error::InvalidAnswer {
            service: self.service.clone(),
            question: question.name.clone(),
            message: message.to_string(),
        })
    }
}
