//! Join the lines of a file into one decorated, wrapped string

use async_trait::async_trait;
use std::path::PathBuf;
use toybox_application::{NoResources, Toy, ToyError};
use toybox_domain::{Constraint, ParameterError, Requisites, ReturnCode, StringParameter};
use tracing::info;

pub const NAME: &str = "lines_to_string";

/// Turns
///
/// ```text
/// a
/// b
/// ```
///
/// into `['a','b']` with decorator `'`, separator `,` and wrappers `[]`.
#[derive(Debug)]
pub struct LinesToString {
    lines: StringParameter,
    separator: StringParameter,
    decorator: StringParameter,
    wrappers: StringParameter,

    file: Option<PathBuf>,
    outcome: Option<String>,
}

impl LinesToString {
    pub fn new() -> Result<Self, ParameterError> {
        Ok(Self {
            lines: StringParameter::builder("lts.lines")
                .required()
                .description("A file contains lines to be dealt with")
                .build()?,
            separator: StringParameter::builder("lts.separator")
                .required()
                .description("Separator between lines")
                .build()?,
            decorator: StringParameter::builder("lts.decorator")
                .default_value(String::new())
                .description("Decorator for a line, e.g., 'line'")
                .build()?,
            wrappers: StringParameter::builder("lts.wrappers")
                .default_value(String::new())
                .description("Wrapper for the generated string, e.g., [] in ['a','b']")
                .with_constraint(Constraint::length_in(&[0, 2]))
                .build()?,
            file: None,
            outcome: None,
        })
    }

    /// The joined string of the last run
    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }
}

/// Join `lines`, each surrounded by `decorator`, then wrap with the two
/// characters of `wrappers`
pub fn join_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    separator: &str,
    decorator: &str,
    wrappers: &str,
) -> String {
    let mut chars = wrappers.chars();
    let (left, right) = match (chars.next(), chars.next()) {
        (Some(left), Some(right)) => (left.to_string(), right.to_string()),
        _ => (String::new(), String::new()),
    };

    let body = lines
        .into_iter()
        .map(|line| format!("{decorator}{line}{decorator}"))
        .collect::<Vec<_>>()
        .join(separator);
    format!("{left}{body}{right}")
}

#[async_trait]
impl Toy for LinesToString {
    type Provider = NoResources;

    fn name(&self) -> &str {
        NAME
    }

    fn parameter_prefix(&self) -> &str {
        "lts"
    }

    fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
        requisites
            .add(&mut self.lines)
            .add(&mut self.separator)
            .add(&mut self.decorator)
            .add(&mut self.wrappers);
    }

    fn example_configuration(&self) -> Vec<(String, String)> {
        vec![
            (self.lines.key().to_string(), "/path/to/file".to_string()),
            (self.separator.key().to_string(), ",".to_string()),
            (self.decorator.key().to_string(), "'".to_string()),
            (self.wrappers.key().to_string(), "[]".to_string()),
        ]
    }

    fn cross_validate(&mut self) -> Result<(), ToyError> {
        let file = PathBuf::from(self.lines.require()?);
        if !file.is_file() {
            return Err(ToyError::msg(format!(
                "{} doesn't exist or is not a file",
                file.display()
            )));
        }
        self.file = Some(file);
        Ok(())
    }

    fn provider(&self) -> Result<NoResources, ToyError> {
        Ok(NoResources)
    }

    async fn have_fun(&mut self, _resource: &()) -> Result<ReturnCode, ToyError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| ToyError::msg("no input file was validated"))?;
        let content = tokio::fs::read_to_string(file).await?;

        let outcome = join_lines(
            content.lines(),
            self.separator.require()?,
            self.decorator.require()?,
            self.wrappers.require()?,
        );
        info!("Processed outcome: {}", outcome);
        self.outcome = Some(outcome);
        Ok(ReturnCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toybox_application::{InMemorySource, PlayError, PlayToyUseCase};

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(["a", "b", "c"], ",", "'", "[]"), "['a','b','c']");
        assert_eq!(join_lines(["a", "b"], " | ", "", ""), "a | b");
        assert_eq!(join_lines(Vec::<&str>::new(), ",", "'", "()"), "()");
    }

    #[tokio::test]
    async fn test_plays_against_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lines.txt");
        std::fs::write(&file, "a\nb\nc\n").unwrap();

        let source = InMemorySource::new("test")
            .with("lts.lines", file.to_string_lossy())
            .with("lts.separator", ",")
            .with("lts.decorator", "'")
            .with("lts.wrappers", "[]");
        let mut toy = LinesToString::new().unwrap();
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert_eq!(report.return_code(), ReturnCode::Success);
        assert_eq!(toy.outcome(), Some("['a','b','c']"));
    }

    #[tokio::test]
    async fn test_wrappers_must_be_two_characters() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lines.txt");
        std::fs::write(&file, "a\n").unwrap();

        let source = InMemorySource::new("test")
            .with("lts.lines", file.to_string_lossy())
            .with("lts.separator", ",")
            .with("lts.wrappers", "[");
        let mut toy = LinesToString::new().unwrap();
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert!(matches!(report.outcome, Err(PlayError::Parameter(_))));
    }

    #[tokio::test]
    async fn test_missing_file_fails_cross_validation() {
        let source = InMemorySource::new("test")
            .with("lts.lines", "/definitely/not/here.txt")
            .with("lts.separator", ",");
        let mut toy = LinesToString::new().unwrap();
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert!(matches!(report.outcome, Err(PlayError::CrossValidation(_))));
    }
}
