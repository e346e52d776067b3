//! Play toy use case
//!
//! Drives one toy through its whole lifecycle: declare, resolve,
//! cross-validate, build, run, destroy. The orchestrator is sequential;
//! every stage is awaited before the next one starts.

use super::resolve_parameters::{ParameterResolver, ResolutionSummary};
use crate::ports::configuration_source::{ConfigurationSource, SourceError};
use crate::ports::resource_provider::ResourceProvider;
use crate::ports::toy::{ResourceOf, Toy, ToyError};
use crate::ports::usage_printer::{NoUsage, UsagePrinter};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use toybox_domain::{
    Lifecycle, LifecycleError, LifecycleState, ParameterError, Requisites, ReturnCode,
};
use tracing::{debug, info, warn};

const NOT_SET: &str = "NOT SET";

/// Errors that end a play
#[derive(Error, Debug)]
pub enum PlayError {
    #[error("Required parameter '{key}' is not configured")]
    MissingRequiredParameter { key: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Cross validation failed: {0}")]
    CrossValidation(ToyError),

    #[error("Resource acquisition failed: {0}")]
    ResourceAcquisition(ToyError),

    #[error("Toy failed: {0}")]
    DomainOperation(ToyError),

    #[error("Teardown failed: {0}")]
    Teardown(ToyError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl PlayError {
    /// Whether the error was raised before any resource was touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlayError::MissingRequiredParameter { .. }
                | PlayError::Parameter(_)
                | PlayError::Source(_)
                | PlayError::CrossValidation(_)
        )
    }
}

/// Everything that happened during one play
#[derive(Debug)]
pub struct PlayReport {
    pub toy: String,
    pub history: Vec<LifecycleState>,
    pub outcome: Result<ReturnCode, PlayError>,
    /// Failures while destroying the toy or releasing its resource.
    /// They never replace `outcome`.
    pub teardown_errors: Vec<PlayError>,
    pub resolution: Option<ResolutionSummary>,
    /// `key=value` pairs logged once the toy was built
    pub effective_parameters: Vec<(String, String)>,
}

impl PlayReport {
    pub fn return_code(&self) -> ReturnCode {
        match &self.outcome {
            Ok(code) => *code,
            Err(_) => ReturnCode::Failure,
        }
    }

    pub fn reached(&self, state: LifecycleState) -> bool {
        self.history.contains(&state)
    }
}

/// Use case for playing a toy
pub struct PlayToyUseCase {
    resolver: ParameterResolver,
    dump_parameters: bool,
}

impl PlayToyUseCase {
    pub fn new() -> Self {
        Self {
            resolver: ParameterResolver::new(),
            dump_parameters: true,
        }
    }

    /// Skip logging the effective parameters after build
    pub fn without_parameter_dump(mut self) -> Self {
        self.dump_parameters = false;
        self
    }

    /// Play with no usage output
    pub async fn execute<T: Toy>(
        &self,
        toy: &mut T,
        source: &dyn ConfigurationSource,
    ) -> PlayReport {
        self.execute_with_usage(toy, source, &NoUsage).await
    }

    /// Play, printing usage through `usage` when a required parameter is missing
    pub async fn execute_with_usage<T: Toy>(
        &self,
        toy: &mut T,
        source: &dyn ConfigurationSource,
        usage: &dyn UsagePrinter,
    ) -> PlayReport {
        let name = Toy::name(toy).to_string();
        info!(toy = %name, source = %source.describe(), "Playing toy");

        let mut lifecycle = Lifecycle::new();
        let mut report = PlayReport {
            toy: name.clone(),
            history: Vec::new(),
            outcome: Ok(ReturnCode::Success),
            teardown_errors: Vec::new(),
            resolution: None,
            effective_parameters: Vec::new(),
        };

        report.outcome = match self.validate(toy, &name, source, usage, &mut lifecycle) {
            Ok(summary) => {
                report.resolution = Some(summary);
                self.build_and_run(toy, source, &mut lifecycle, &mut report)
                    .await
            }
            Err(e) => {
                warn!(toy = %name, error = %e, "Validation failed");
                lifecycle.fail();
                Err(e)
            }
        };

        if let Err(e) = lifecycle.advance(LifecycleState::Destroyed) {
            warn!(toy = %name, error = %e, "Lifecycle did not end cleanly");
        }
        report.history = lifecycle.into_history();

        match &report.outcome {
            Ok(code) => info!(toy = %name, code = %code, "Toy finished"),
            Err(e) => warn!(toy = %name, error = %e, "Toy failed"),
        }
        report
    }

    /// Print the usage table and example configuration without touching any
    /// configuration source
    pub fn how_to_play<T: Toy>(
        &self,
        toy: &mut T,
        usage: &dyn UsagePrinter,
    ) -> Result<ReturnCode, PlayError> {
        let name = Toy::name(toy).to_string();
        let examples = toy.example_configuration();

        let mut requisites = Requisites::new();
        toy.requisite(&mut requisites);
        requisites.ensure_unique_keys()?;

        usage.print_usage(&name, &requisites.view());
        usage.print_examples(&name, &examples);
        Ok(ReturnCode::Help)
    }

    /// Declared → Resolved → CrossValidated
    fn validate<T: Toy>(
        &self,
        toy: &mut T,
        name: &str,
        source: &dyn ConfigurationSource,
        usage: &dyn UsagePrinter,
        lifecycle: &mut Lifecycle,
    ) -> Result<ResolutionSummary, PlayError> {
        let examples = toy.example_configuration();
        let summary = {
            let mut requisites = Requisites::new();
            toy.requisite(&mut requisites);
            requisites.ensure_unique_keys()?;
            lifecycle.advance(LifecycleState::Declared)?;
            debug!(toy = %name, parameters = requisites.len(), "Declared parameters");

            let summary = match self.resolver.resolve(name, &mut requisites, source, usage) {
                Ok(summary) => summary,
                Err(e) => {
                    if matches!(e, PlayError::MissingRequiredParameter { .. }) {
                        usage.print_examples(name, &examples);
                    }
                    return Err(e);
                }
            };
            lifecycle.advance(LifecycleState::Resolved)?;
            summary
        };

        toy.cross_validate().map_err(PlayError::CrossValidation)?;
        lifecycle.advance(LifecycleState::CrossValidated)?;
        Ok(summary)
    }

    /// Built → Running, then teardown.
    ///
    /// Once the Built stage is entered the toy is destroyed exactly once,
    /// and the resource is released if it was acquired.
    async fn build_and_run<T: Toy>(
        &self,
        toy: &mut T,
        source: &dyn ConfigurationSource,
        lifecycle: &mut Lifecycle,
        report: &mut PlayReport,
    ) -> Result<ReturnCode, PlayError> {
        lifecycle.advance(LifecycleState::Built)?;

        let provider = match toy.provider() {
            Ok(provider) => provider,
            Err(e) => {
                lifecycle.fail();
                teardown::<T>(toy, None, &mut report.teardown_errors).await;
                return Err(PlayError::ResourceAcquisition(e));
            }
        };

        debug!(toy = %report.toy, provider = provider.name(), "Acquiring resource");
        let resource = match provider.acquire(source).await {
            Ok(resource) => resource,
            Err(e) => {
                lifecycle.fail();
                teardown::<T>(toy, None, &mut report.teardown_errors).await;
                return Err(PlayError::ResourceAcquisition(e));
            }
        };

        let outcome = self.run(toy, &resource, source, lifecycle, report).await;
        if outcome.is_err() {
            lifecycle.fail();
        }

        teardown::<T>(
            toy,
            Some((&provider, resource)),
            &mut report.teardown_errors,
        )
        .await;
        outcome
    }

    async fn run<T: Toy>(
        &self,
        toy: &mut T,
        resource: &ResourceOf<T>,
        source: &dyn ConfigurationSource,
        lifecycle: &mut Lifecycle,
        report: &mut PlayReport,
    ) -> Result<ReturnCode, PlayError> {
        toy.build(resource)
            .await
            .map_err(PlayError::ResourceAcquisition)?;

        if self.dump_parameters {
            report.effective_parameters = effective_parameters(toy, source);
            for (key, value) in &report.effective_parameters {
                info!("{}={}", key, value);
            }
        }

        lifecycle.advance(LifecycleState::Running)?;
        info!(toy = %report.toy, "Having fun");

        match AssertUnwindSafe(toy.have_fun(resource)).catch_unwind().await {
            Ok(Ok(code)) => Ok(code),
            Ok(Err(e)) => Err(PlayError::DomainOperation(e)),
            Err(panic) => Err(PlayError::DomainOperation(ToyError::Panicked(
                panic_message(panic.as_ref()),
            ))),
        }
    }
}

impl Default for PlayToyUseCase {
    fn default() -> Self {
        Self::new()
    }
}

/// Destroy the toy, then release the resource when one was acquired
async fn teardown<T: Toy>(
    toy: &mut T,
    acquired: Option<(&T::Provider, ResourceOf<T>)>,
    errors: &mut Vec<PlayError>,
) {
    if let Err(e) = toy.destroy().await {
        warn!(toy = Toy::name(toy), error = %e, "Failed to destroy toy");
        errors.push(PlayError::Teardown(e));
    }

    if let Some((provider, resource)) = acquired {
        if let Err(e) = provider.release(resource).await {
            warn!(provider = provider.name(), error = %e, "Failed to release resource");
            errors.push(PlayError::Teardown(e));
        }
    }
}

/// Declared parameters with their effective values, followed by source keys
/// that carry the toy's prefix but were never declared
fn effective_parameters<T: Toy>(
    toy: &mut T,
    source: &dyn ConfigurationSource,
) -> Vec<(String, String)> {
    let prefix = format!("{}.", toy.parameter_prefix());

    let mut requisites = Requisites::new();
    toy.requisite(&mut requisites);

    let declared: HashSet<String> = requisites.keys().into_iter().collect();
    let mut parameters: Vec<(String, String)> = requisites
        .iter()
        .map(|r| {
            let value = r.value_display().unwrap_or_else(|| NOT_SET.to_string());
            (r.key().to_string(), value)
        })
        .collect();

    for key in source.keys() {
        if key.starts_with(&prefix) && !declared.contains(&key) {
            let value = source
                .get_string(&key)
                .ok()
                .flatten()
                .unwrap_or_else(|| NOT_SET.to_string());
            parameters.push((key, value));
        }
    }
    parameters
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Object-safe face of [`Toy`], so toys with different providers can sit in
/// one registry
#[async_trait]
pub trait DynToy: Send + Sync {
    fn name(&self) -> &str;

    async fn play(
        &mut self,
        use_case: &PlayToyUseCase,
        source: &dyn ConfigurationSource,
        usage: &dyn UsagePrinter,
    ) -> PlayReport;

    fn how_to_play(
        &mut self,
        use_case: &PlayToyUseCase,
        usage: &dyn UsagePrinter,
    ) -> Result<ReturnCode, PlayError>;
}

#[async_trait]
impl<T: Toy> DynToy for T {
    fn name(&self) -> &str {
        Toy::name(self)
    }

    async fn play(
        &mut self,
        use_case: &PlayToyUseCase,
        source: &dyn ConfigurationSource,
        usage: &dyn UsagePrinter,
    ) -> PlayReport {
        use_case.execute_with_usage(self, source, usage).await
    }

    fn how_to_play(
        &mut self,
        use_case: &PlayToyUseCase,
        usage: &dyn UsagePrinter,
    ) -> Result<ReturnCode, PlayError> {
        use_case.how_to_play(self, usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::configuration_source::InMemorySource;
    use crate::ports::resource_provider::NoResources;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use toybox_domain::{IntParameter, Requisite, StringListParameter, StringParameter};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Fail {
        Nothing,
        Provider,
        Acquire,
        Build,
        HaveFun,
        Panic,
        Destroy,
        Release,
    }

    /// Counts calls so tests can check which hooks ran
    #[derive(Default)]
    struct Calls {
        acquired: AtomicUsize,
        released: AtomicUsize,
        built: AtomicUsize,
        played: AtomicUsize,
        destroyed: AtomicUsize,
    }

    struct CountingProvider {
        calls: Arc<Calls>,
        fail: Fail,
    }

    #[async_trait]
    impl ResourceProvider for CountingProvider {
        type Resource = String;

        fn name(&self) -> &str {
            "counting"
        }

        async fn acquire(&self, _source: &dyn ConfigurationSource) -> Result<String, ToyError> {
            if self.fail == Fail::Acquire {
                return Err(ToyError::msg("cluster unreachable"));
            }
            self.calls.acquired.fetch_add(1, Ordering::SeqCst);
            Ok("connection".to_string())
        }

        async fn release(&self, _resource: String) -> Result<(), ToyError> {
            self.calls.released.fetch_add(1, Ordering::SeqCst);
            if self.fail == Fail::Release {
                return Err(ToyError::msg("release failed"));
            }
            Ok(())
        }
    }

    struct RenameToy {
        calls: Arc<Calls>,
        fail: Fail,
        old_names: StringListParameter,
        new_names: StringListParameter,
        k: IntParameter,
    }

    impl RenameToy {
        fn new(fail: Fail) -> Self {
            Self {
                calls: Arc::new(Calls::default()),
                fail,
                old_names: StringListParameter::builder("rt.old_names")
                    .required()
                    .build()
                    .unwrap(),
                new_names: StringListParameter::builder("rt.new_names")
                    .required()
                    .build()
                    .unwrap(),
                k: IntParameter::builder("rt.k")
                    .default_value(5)
                    .constraint("v > 1", |v| *v > 1)
                    .constraint("v <= 10", |v| *v <= 10)
                    .build()
                    .unwrap(),
            }
        }
    }

    #[async_trait]
    impl Toy for RenameToy {
        type Provider = CountingProvider;

        fn name(&self) -> &str {
            "rename_toy"
        }

        fn parameter_prefix(&self) -> &str {
            "rt"
        }

        fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
            requisites
                .add(&mut self.old_names)
                .add(&mut self.new_names)
                .add(&mut self.k);
        }

        fn example_configuration(&self) -> Vec<(String, String)> {
            vec![("rt.old_names".to_string(), "a,b".to_string())]
        }

        fn cross_validate(&mut self) -> Result<(), ToyError> {
            let old = self.old_names.require()?;
            let new = self.new_names.require()?;
            if old.len() != new.len() {
                return Err(ToyError::msg("old_names and new_names differ in length"));
            }
            Ok(())
        }

        fn provider(&self) -> Result<CountingProvider, ToyError> {
            if self.fail == Fail::Provider {
                return Err(ToyError::msg("no provider"));
            }
            Ok(CountingProvider {
                calls: Arc::clone(&self.calls),
                fail: self.fail,
            })
        }

        async fn build(&mut self, resource: &String) -> Result<(), ToyError> {
            assert_eq!(resource, "connection");
            self.calls.built.fetch_add(1, Ordering::SeqCst);
            if self.fail == Fail::Build {
                return Err(ToyError::msg("build failed"));
            }
            Ok(())
        }

        async fn have_fun(&mut self, _resource: &String) -> Result<ReturnCode, ToyError> {
            self.calls.played.fetch_add(1, Ordering::SeqCst);
            match self.fail {
                Fail::HaveFun => Err(ToyError::msg("table is gone")),
                Fail::Panic => panic!("boom"),
                _ => Ok(ReturnCode::Success),
            }
        }

        async fn destroy(&mut self) -> Result<(), ToyError> {
            self.calls.destroyed.fetch_add(1, Ordering::SeqCst);
            if self.fail == Fail::Destroy {
                return Err(ToyError::msg("destroy failed"));
            }
            Ok(())
        }
    }

    fn valid_source() -> InMemorySource {
        InMemorySource::new("test")
            .with("rt.old_names", "a,b")
            .with("rt.new_names", "c,d")
            .with("rt.extra", "undeclared")
            .with("other.key", "ignored")
    }

    fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_happy_path_walks_every_stage() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        assert_eq!(report.return_code(), ReturnCode::Success);
        assert_eq!(
            report.history,
            vec![
                LifecycleState::Uninitialized,
                LifecycleState::Declared,
                LifecycleState::Resolved,
                LifecycleState::CrossValidated,
                LifecycleState::Built,
                LifecycleState::Running,
                LifecycleState::Destroyed,
            ]
        );
        assert_eq!(count(&toy.calls.acquired), 1);
        assert_eq!(count(&toy.calls.released), 1);
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert!(report.teardown_errors.is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_never_builds() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let source = InMemorySource::new("test").with("rt.old_names", "a");
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert!(matches!(
            report.outcome,
            Err(PlayError::MissingRequiredParameter { ref key }) if key == "rt.new_names"
        ));
        assert_eq!(report.return_code(), ReturnCode::Failure);
        assert!(!report.reached(LifecycleState::Built));
        assert!(!report.reached(LifecycleState::Running));
        assert_eq!(count(&toy.calls.acquired), 0);
        assert_eq!(count(&toy.calls.destroyed), 0);
    }

    #[tokio::test]
    async fn test_missing_required_prints_usage_and_examples() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let usage = RecordingUsage::default();
        let source = InMemorySource::new("test").with("rt.old_names", "a");
        let report = PlayToyUseCase::new()
            .execute_with_usage(&mut toy, &source, &usage)
            .await;

        assert!(matches!(
            report.outcome,
            Err(PlayError::MissingRequiredParameter { .. })
        ));
        assert_eq!(usage.tables.lock().unwrap().as_slice(), ["rename_toy"]);
        assert_eq!(
            usage.examples.lock().unwrap().as_slice(),
            [("rt.old_names".to_string(), "a,b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_constraint_violation_prints_no_usage() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let usage = RecordingUsage::default();
        let source = valid_source().with("rt.k", "11");
        let report = PlayToyUseCase::new()
            .execute_with_usage(&mut toy, &source, &usage)
            .await;

        assert!(matches!(report.outcome, Err(PlayError::Parameter(_))));
        assert!(usage.tables.lock().unwrap().is_empty());
        assert!(usage.examples.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_k_upper_bound_is_inclusive() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let source = valid_source().with("rt.k", "10");
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert_eq!(report.return_code(), ReturnCode::Success);
        assert_eq!(toy.k.value(), Some(&10));
    }

    #[tokio::test]
    async fn test_cross_validation_runs_before_acquisition() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let source = InMemorySource::new("test")
            .with("rt.old_names", "a,b,c")
            .with("rt.new_names", "x,y");
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert!(matches!(report.outcome, Err(PlayError::CrossValidation(_))));
        assert!(report.outcome.as_ref().unwrap_err().is_validation());
        assert!(!report.reached(LifecycleState::Built));
        assert_eq!(count(&toy.calls.acquired), 0);
        assert_eq!(count(&toy.calls.destroyed), 0);
    }

    #[tokio::test]
    async fn test_constraint_violation_keeps_default() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let source = valid_source().with("rt.k", "20");
        let report = PlayToyUseCase::new().execute(&mut toy, &source).await;

        assert!(matches!(
            report.outcome,
            Err(PlayError::Parameter(ParameterError::ConstraintViolation { .. }))
        ));
        assert_eq!(toy.k.value(), Some(&5));
        assert!(report.reached(LifecycleState::Failed));
    }

    #[tokio::test]
    async fn test_failed_run_still_tears_down_once() {
        let mut toy = RenameToy::new(Fail::HaveFun);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        assert!(matches!(report.outcome, Err(PlayError::DomainOperation(_))));
        assert!(report.reached(LifecycleState::Running));
        assert!(report.reached(LifecycleState::Failed));
        assert_eq!(report.history.last(), Some(&LifecycleState::Destroyed));
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert_eq!(count(&toy.calls.released), 1);
    }

    #[tokio::test]
    async fn test_panic_is_captured_as_domain_failure() {
        let mut toy = RenameToy::new(Fail::Panic);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        match &report.outcome {
            Err(PlayError::DomainOperation(ToyError::Panicked(message))) => {
                assert_eq!(message, "boom");
            }
            other => panic!("expected a captured panic, got {other:?}"),
        }
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert_eq!(count(&toy.calls.released), 1);
    }

    #[tokio::test]
    async fn test_acquisition_failure_destroys_without_release() {
        let mut toy = RenameToy::new(Fail::Acquire);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        assert!(matches!(report.outcome, Err(PlayError::ResourceAcquisition(_))));
        assert!(!report.reached(LifecycleState::Running));
        assert_eq!(count(&toy.calls.built), 0);
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert_eq!(count(&toy.calls.released), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_still_destroys() {
        let mut toy = RenameToy::new(Fail::Provider);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        assert!(matches!(report.outcome, Err(PlayError::ResourceAcquisition(_))));
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert_eq!(count(&toy.calls.acquired), 0);
    }

    #[tokio::test]
    async fn test_build_failure_releases_resource() {
        let mut toy = RenameToy::new(Fail::Build);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        assert!(matches!(report.outcome, Err(PlayError::ResourceAcquisition(_))));
        assert_eq!(count(&toy.calls.played), 0);
        assert_eq!(count(&toy.calls.destroyed), 1);
        assert_eq!(count(&toy.calls.released), 1);
    }

    #[tokio::test]
    async fn test_teardown_errors_do_not_mask_outcome() {
        let mut toy = RenameToy::new(Fail::Destroy);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;
        assert_eq!(report.return_code(), ReturnCode::Success);
        assert_eq!(report.teardown_errors.len(), 1);
        assert_eq!(count(&toy.calls.released), 1);

        let mut toy = RenameToy::new(Fail::Release);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;
        assert_eq!(report.return_code(), ReturnCode::Success);
        assert!(matches!(
            report.teardown_errors.as_slice(),
            [PlayError::Teardown(_)]
        ));
    }

    #[tokio::test]
    async fn test_effective_parameters_include_prefixed_undeclared_keys() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let report = PlayToyUseCase::new().execute(&mut toy, &valid_source()).await;

        let params = &report.effective_parameters;
        assert!(params.contains(&("rt.old_names".to_string(), "a,b".to_string())));
        assert!(params.contains(&("rt.k".to_string(), "5".to_string())));
        assert!(params.contains(&("rt.extra".to_string(), "undeclared".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "other.key"));

        let mut toy = RenameToy::new(Fail::Nothing);
        let report = PlayToyUseCase::new()
            .without_parameter_dump()
            .execute(&mut toy, &valid_source())
            .await;
        assert!(report.effective_parameters.is_empty());
    }

    #[derive(Default)]
    struct RecordingUsage {
        tables: Mutex<Vec<String>>,
        examples: Mutex<Vec<(String, String)>>,
    }

    impl UsagePrinter for RecordingUsage {
        fn print_usage(&self, toy: &str, _requisites: &[&dyn Requisite]) {
            self.tables.lock().unwrap().push(toy.to_string());
        }

        fn print_examples(&self, _toy: &str, examples: &[(String, String)]) {
            self.examples.lock().unwrap().extend_from_slice(examples);
        }
    }

    #[test]
    fn test_how_to_play_prints_and_returns_help() {
        let mut toy = RenameToy::new(Fail::Nothing);
        let usage = RecordingUsage::default();
        let code = PlayToyUseCase::new().how_to_play(&mut toy, &usage).unwrap();

        assert_eq!(code, ReturnCode::Help);
        assert_eq!(usage.tables.lock().unwrap().as_slice(), ["rename_toy"]);
        assert_eq!(usage.examples.lock().unwrap().len(), 1);
        assert_eq!(count(&toy.calls.acquired), 0);
    }

    struct Duplicated {
        a: StringParameter,
        b: StringParameter,
    }

    #[async_trait]
    impl Toy for Duplicated {
        type Provider = NoResources;

        fn name(&self) -> &str {
            "duplicated"
        }

        fn parameter_prefix(&self) -> &str {
            "d"
        }

        fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
            requisites.add(&mut self.a).add(&mut self.b);
        }

        fn provider(&self) -> Result<NoResources, ToyError> {
            Ok(NoResources)
        }

        async fn have_fun(&mut self, _resource: &()) -> Result<ReturnCode, ToyError> {
            Ok(ReturnCode::Success)
        }
    }

    #[tokio::test]
    async fn test_duplicate_declaration_fails_before_declared() {
        let mut toy = Duplicated {
            a: StringParameter::builder("d.same").build().unwrap(),
            b: StringParameter::builder("d.same").build().unwrap(),
        };
        let report = PlayToyUseCase::new()
            .execute(&mut toy, &InMemorySource::new("empty"))
            .await;
        assert!(matches!(
            report.outcome,
            Err(PlayError::Parameter(ParameterError::DuplicateKey { .. }))
        ));
        assert!(!report.reached(LifecycleState::Declared));
    }

    #[tokio::test]
    async fn test_dyn_toy_plays_through_erased_handle() {
        let mut toy: Box<dyn DynToy> = Box::new(RenameToy::new(Fail::Nothing));
        let use_case = PlayToyUseCase::new();
        assert_eq!(toy.name(), "rename_toy");

        let report = toy.play(&use_case, &valid_source(), &NoUsage).await;
        assert!(report.return_code().is_success());
        assert_eq!(toy.how_to_play(&use_case, &NoUsage).unwrap(), ReturnCode::Help);
    }
}
