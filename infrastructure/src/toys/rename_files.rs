//! Rename a batch of files inside one directory

use crate::providers::{DirectoryLease, DirectoryProvider};
use async_trait::async_trait;
use std::collections::HashSet;
use toybox_application::{Toy, ToyError};
use toybox_domain::{
    BoolParameter, Constraint, ParameterError, Requisites, ReturnCode, StringListParameter,
    StringParameter,
};
use tracing::info;

pub const NAME: &str = "rename_files";

/// Renames `old_names[i]` to `new_names[i]` inside `base_dir`
#[derive(Debug)]
pub struct RenameFiles {
    base_dir: StringParameter,
    old_names: StringListParameter,
    new_names: StringListParameter,
    overwrite: BoolParameter,

    renamed: usize,
}

impl RenameFiles {
    pub fn new() -> Result<Self, ParameterError> {
        Ok(Self {
            base_dir: StringParameter::builder("rf.base_dir")
                .required()
                .description("Directory holding the files to rename")
                .build()?,
            old_names: StringListParameter::builder("rf.old_names")
                .required()
                .description("Files to rename, delimited by ','")
                .with_constraint(Constraint::non_empty())
                .build()?,
            new_names: StringListParameter::builder("rf.new_names")
                .required()
                .description("New names, one per old name, delimited by ','")
                .with_constraint(Constraint::non_empty())
                .build()?,
            overwrite: BoolParameter::builder("rf.overwrite")
                .default_value(false)
                .description("Replace a file already carrying a new name")
                .build()?,
            renamed: 0,
        })
    }

    pub fn renamed(&self) -> usize {
        self.renamed
    }

    fn pairs(&self) -> Result<Vec<(String, String)>, ToyError> {
        let old = self.old_names.require()?;
        let new = self.new_names.require()?;
        Ok(old.iter().cloned().zip(new.iter().cloned()).collect())
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

#[async_trait]
impl Toy for RenameFiles {
    type Provider = DirectoryProvider;

    fn name(&self) -> &str {
        NAME
    }

    fn parameter_prefix(&self) -> &str {
        "rf"
    }

    fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
        requisites
            .add(&mut self.base_dir)
            .add(&mut self.old_names)
            .add(&mut self.new_names)
            .add(&mut self.overwrite);
    }

    fn example_configuration(&self) -> Vec<(String, String)> {
        vec![
            (self.base_dir.key().to_string(), "/data/exports".to_string()),
            (self.old_names.key().to_string(), "a.csv,b.csv".to_string()),
            (self.new_names.key().to_string(), "2019-a.csv,2019-b.csv".to_string()),
            (self.overwrite.key().to_string(), "false".to_string()),
        ]
    }

    fn cross_validate(&mut self) -> Result<(), ToyError> {
        let old = self.old_names.require()?;
        let new = self.new_names.require()?;

        if old.len() != new.len() {
            return Err(ToyError::msg(format!(
                "{} has {} names but {} has {}",
                self.old_names.key(),
                old.len(),
                self.new_names.key(),
                new.len()
            )));
        }

        if let Some(name) = old.iter().chain(new.iter()).find(|n| !is_plain_name(n)) {
            return Err(ToyError::msg(format!("'{name}' is not a plain file name")));
        }

        let mut targets = HashSet::new();
        if let Some(duplicate) = new.iter().find(|name| !targets.insert(name.as_str())) {
            return Err(ToyError::msg(format!(
                "'{duplicate}' appears more than once in {}",
                self.new_names.key()
            )));
        }
        Ok(())
    }

    fn provider(&self) -> Result<DirectoryProvider, ToyError> {
        Ok(DirectoryProvider::new(self.base_dir.require()?))
    }

    async fn have_fun(&mut self, lease: &DirectoryLease) -> Result<ReturnCode, ToyError> {
        let overwrite = *self.overwrite.require()?;
        let pairs = self.pairs()?;

        // Check every pair before touching anything
        for (old, new) in &pairs {
            if !lease.join(old).is_file() {
                return Err(ToyError::msg(format!("{old} doesn't exist")));
            }
            if !overwrite && lease.join(new).exists() {
                return Err(ToyError::msg(format!("{new} already exists")));
            }
        }

        for (old, new) in &pairs {
            tokio::fs::rename(lease.join(old), lease.join(new)).await?;
            info!("Renamed {} to {}", old, new);
            self.renamed += 1;
        }
        Ok(ReturnCode::Success)
    }
}
