//! Write generated rows into a directory from a pool of workers

use crate::providers::{DirectoryLease, DirectoryProvider};
use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use toybox_application::{StopSignal, Toy, ToyError, WorkerPool};
use toybox_domain::{
    Constraint, IntParameter, LongParameter, Parameter, ParameterError, Requisites, ReturnCode,
    StringParameter, ToyEnum, impl_enum_value,
};
use tracing::{debug, info, warn};

pub const NAME: &str = "load_writer";

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How values are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// One value per writer, repeated on every row
    Fixed,
    /// A new value for every row
    Random,
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIXED" => Ok(ValueKind::Fixed),
            "RANDOM" => Ok(ValueKind::Random),
            other => Err(format!("unknown value kind '{other}'")),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Fixed => "FIXED",
            ValueKind::Random => "RANDOM",
        })
    }
}

impl ToyEnum for ValueKind {
    const VARIANTS: &'static [&'static str] = &["FIXED", "RANDOM"];
}

impl_enum_value!(ValueKind);

/// What one writer produces, cloned into every worker
#[derive(Debug, Clone)]
struct RowShape {
    key_length: usize,
    value_length: usize,
    value_kind: ValueKind,
    buffer_size: usize,
    /// 0 means unlimited
    max_rows: u64,
}

/// Totals of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub writers: usize,
    pub rows: u64,
    pub bytes: u64,
}

#[derive(Debug, Default)]
struct WriterStats {
    rows: u64,
    bytes: u64,
}

fn random_text(rng: &mut impl Rng, length: usize) -> String {
    (0..length).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Write `key\tvalue` rows to `path` until the token is cancelled or
/// `max_rows` is reached
fn write_rows(
    path: &Path,
    shape: &RowShape,
    token: &CancellationToken,
) -> std::io::Result<WriterStats> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::with_capacity(shape.buffer_size, file);
    let mut rng = rand::rng();
    let fixed = random_text(&mut rng, shape.value_length);

    let mut stats = WriterStats::default();
    while !token.is_cancelled() && (shape.max_rows == 0 || stats.rows < shape.max_rows) {
        let key = random_text(&mut rng, shape.key_length);
        let random = match shape.value_kind {
            ValueKind::Fixed => None,
            ValueKind::Random => Some(random_text(&mut rng, shape.value_length)),
        };
        let value = random.as_deref().unwrap_or(&fixed);

        writeln!(out, "{key}\t{value}")?;
        stats.rows += 1;
        stats.bytes += (key.len() + value.len() + 2) as u64;
    }
    out.flush()?;

    debug!(path = %path.display(), rows = stats.rows, "Writer stopped");
    Ok(stats)
}

fn size_of(parameter: &IntParameter) -> Result<usize, ToyError> {
    let value = *parameter.require()?;
    usize::try_from(value)
        .map_err(|_| ToyError::msg(format!("{} must not be negative", parameter.key())))
}

/// Load generator: `workers` threads write random rows into
/// `output_dir/writer-<i>.dat` for `running_time` seconds, or until each has
/// written `max_rows` rows. Ctrl-C stops the run early.
#[derive(Debug)]
pub struct LoadWriter {
    output_dir: StringParameter,
    workers: IntParameter,
    running_time: LongParameter,
    key_length: IntParameter,
    value_length: IntParameter,
    value_kind: Parameter<ValueKind>,
    buffer_size: LongParameter,
    max_rows: LongParameter,

    stats: Option<LoadStats>,
}

impl LoadWriter {
    pub fn new() -> Result<Self, ParameterError> {
        Ok(Self {
            output_dir: StringParameter::builder("lw.output_dir")
                .required()
                .description("Directory receiving one file per writer")
                .build()?,
            workers: IntParameter::builder("lw.workers")
                .default_value(2)
                .description("Number of writers")
                .with_constraint(Constraint::positive())
                .build()?,
            running_time: LongParameter::builder("lw.running_time")
                .default_value(10)
                .description("How long to write, in seconds")
                .with_constraint(Constraint::positive())
                .build()?,
            key_length: IntParameter::builder("lw.key_length")
                .default_value(16)
                .description("Characters per key")
                .with_constraint(Constraint::positive())
                .build()?,
            value_length: IntParameter::builder("lw.value_length")
                .default_value(128)
                .description("Characters per value")
                .with_constraint(Constraint::positive())
                .build()?,
            value_kind: Parameter::builder("lw.value_kind")
                .default_value(ValueKind::Random)
                .description("FIXED repeats one value per writer, RANDOM makes a new one per row")
                .build()?,
            buffer_size: LongParameter::builder("lw.buffer_size")
                .default_value(1024 * 1024)
                .description("Write buffer per writer, in bytes")
                .with_constraint(Constraint::positive())
                .build()?,
            max_rows: LongParameter::builder("lw.max_rows")
                .default_value(0)
                .description("Rows per writer before it stops on its own, 0 for unlimited")
                .with_constraint(Constraint::at_least(0))
                .build()?,
            stats: None,
        })
    }

    /// Totals of the last run
    pub fn stats(&self) -> Option<LoadStats> {
        self.stats
    }

    fn shape(&self) -> Result<RowShape, ToyError> {
        let buffer_size = *self.buffer_size.require()?;
        Ok(RowShape {
            key_length: size_of(&self.key_length)?,
            value_length: size_of(&self.value_length)?,
            value_kind: *self.value_kind.require()?,
            buffer_size: usize::try_from(buffer_size)
                .map_err(|_| ToyError::msg(format!("{buffer_size} is not a buffer size")))?,
            max_rows: self.max_rows.require()?.unsigned_abs(),
        })
    }
}

#[async_trait]
impl Toy for LoadWriter {
    type Provider = DirectoryProvider;

    fn name(&self) -> &str {
        NAME
    }

    fn parameter_prefix(&self) -> &str {
        "lw"
    }

    fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
        requisites
            .add(&mut self.output_dir)
            .add(&mut self.workers)
            .add(&mut self.running_time)
            .add(&mut self.key_length)
            .add(&mut self.value_length)
            .add(&mut self.value_kind)
            .add(&mut self.buffer_size)
            .add(&mut self.max_rows);
    }

    fn example_configuration(&self) -> Vec<(String, String)> {
        vec![
            (self.output_dir.key().to_string(), "/tmp/load".to_string()),
            (self.workers.key().to_string(), "4".to_string()),
            (self.running_time.key().to_string(), "60".to_string()),
            (self.value_kind.key().to_string(), "RANDOM".to_string()),
        ]
    }

    fn provider(&self) -> Result<DirectoryProvider, ToyError> {
        Ok(DirectoryProvider::new(self.output_dir.require()?))
    }

    async fn have_fun(&mut self, lease: &DirectoryLease) -> Result<ReturnCode, ToyError> {
        let shape = self.shape()?;
        let workers = size_of(&self.workers)?;
        let running_time = Duration::from_secs(self.running_time.require()?.unsigned_abs());

        let mut pool = WorkerPool::new(NAME);
        for id in 0..workers {
            let path: PathBuf = lease.join(format!("writer-{id}.dat"));
            let shape = shape.clone();
            pool.spawn(move |token| write_rows(&path, &shape, &token));
        }
        info!(workers, seconds = running_time.as_secs(), "Writers started");

        let signal = StopSignal::new(pool.token()).after(running_time);
        tokio::select! {
            reason = signal.wait() => info!(reason = ?reason, "Stopping writers"),
            _ = pool.join_all() => info!("Every writer reached its row limit"),
        }

        let report = pool.shutdown(JOIN_TIMEOUT).await;
        let mut stats = LoadStats::default();
        let mut io_errors = 0;
        for outcome in report.finished {
            match outcome {
                Ok(writer) => {
                    stats.writers += 1;
                    stats.rows += writer.rows;
                    stats.bytes += writer.bytes;
                }
                Err(e) => {
                    warn!(error = %e, "Writer failed");
                    io_errors += 1;
                }
            }
        }
        info!(
            rows = stats.rows,
            bytes = stats.bytes,
            "Wrote {} rows from {} writers",
            stats.rows,
            stats.writers
        );
        self.stats = Some(stats);

        let failed = report.failed + report.abandoned + io_errors;
        if failed > 0 {
            return Err(ToyError::msg(format!("{failed} of {workers} writers failed")));
        }
        Ok(ReturnCode::Success)
    }
}
