//! CLI command definitions

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;
use thiserror::Error;

/// CLI arguments for toybox
#[derive(Parser, Debug)]
#[command(name = "toybox")]
#[command(author, version, about = "Small operational toys driven by a configuration directory")]
#[command(disable_help_flag = true)]
#[command(long_about = r##"
toybox runs one toy per invocation. A toy declares typed parameters which are
read from the configuration directory, checked against their constraints and
the toy's own validation, and only then handed to the toy.

The configuration directory is searched for, in order:
1. toy-site.conf     key=value lines, first line must be "# toybox-site"
2. toy.properties    key=value lines
3. *.toml            merged in name order, TOYBOX_* variables on top

Example:
  toybox --toy lines_to_string --conf_dir ./conf
  toybox --toy mars_rover --conf_dir ./conf -- --mr.commands LMLMLMLMM
  toybox --toy rename_files --help
"##)]
pub struct Cli {
    /// Name of the toy to play
    #[arg(long, value_name = "NAME")]
    pub toy: Option<String>,

    /// Directory holding the toy configuration
    #[arg(long = "conf_dir", value_name = "PATH")]
    pub conf_dir: Option<PathBuf>,

    /// Print the parameters of --toy, or this help without it
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// List the available toys
    #[arg(long)]
    pub list: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Parameter overrides after `--`, as `--key value` or `--key=value`
    #[arg(last = true, value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
}

/// What the command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage; of one toy when named
    Help { toy: Option<String> },
    List,
    Play {
        toy: String,
        conf_dir: PathBuf,
        overrides: Vec<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("--toy is required, use --list to see the available toys")]
    MissingToy,

    #[error("--conf_dir is required to play '{0}'")]
    MissingConfDir(String),
}

impl Cli {
    /// Decide what to run. Help wins over everything and never needs
    /// `--conf_dir`.
    pub fn invocation(&self) -> Result<Invocation, CliError> {
        if self.help {
            return Ok(Invocation::Help {
                toy: self.toy.clone(),
            });
        }
        if self.list {
            return Ok(Invocation::List);
        }

        let toy = self.toy.clone().ok_or(CliError::MissingToy)?;
        let conf_dir = self
            .conf_dir
            .clone()
            .ok_or_else(|| CliError::MissingConfDir(toy.clone()))?;
        Ok(Invocation::Play {
            toy,
            conf_dir,
            overrides: self.overrides.clone(),
        })
    }

    /// Rendered long help
    pub fn help_text() -> String {
        Self::command().render_long_help().to_string()
    }
}
