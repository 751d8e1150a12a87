//! Scripted command runner for testing.
//!
//! This module provides a runner that can be used for unit testing
//! without a Mac, `blueutil`, or any real radio hardware.
//!
//! The [`MockRunner`] implements the [`CommandRunner`] trait, allowing it to be
//! used interchangeably with [`crate::SystemRunner`] in generic code.
//!
//! # Features
//!
//! - **Scripted output**: Queue stdout, exit codes and stderr per command line
//! - **Failure injection**: Simulate missing programs and timeouts
//! - **Invocation recording**: Assert which commands ran and how often

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::commands::CommandSpec;
use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};

/// A scripted reply to one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The program ran and produced this output.
    Output(CommandOutput),
    /// The program could not be started.
    Unavailable,
    /// The program ran past its timeout.
    Timeout,
}

/// A command runner that replays scripted responses.
///
/// Responses are matched on the full command line (program and arguments).
/// Each command has a queue; the last queued response is reused once the
/// others are consumed. Commands with no script behave like a missing
/// program.
///
/// # Example
///
/// ```
/// use tinhat_core::{CommandRunner, CommandSpec, MockRunner};
///
/// #[tokio::main]
/// async fn main() {
///     let runner = MockRunner::new();
///     runner.on_success(&CommandSpec::discoverable_state(), "1\n");
///
///     let output = runner.run(&CommandSpec::discoverable_state()).await.unwrap();
///     assert_eq!(output.stdout.trim(), "1");
///     assert_eq!(runner.invocation_count(), 1);
/// }
/// ```
#[derive(Default)]
pub struct MockRunner {
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    invocations: Mutex<Vec<CommandSpec>>,
    run_count: AtomicU32,
    /// Simulated run latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("scripted", &lock(&self.responses).len())
            .field("run_count", &self.run_count.load(Ordering::Relaxed))
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(spec: &CommandSpec) -> String {
    spec.to_string()
}

impl MockRunner {
    /// Create a runner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a scripted runner.
    pub fn builder() -> MockRunnerBuilder {
        MockRunnerBuilder::new()
    }

    /// Queue a response for a command line.
    pub fn on(&self, spec: &CommandSpec, response: MockResponse) {
        lock(&self.responses)
            .entry(key(spec))
            .or_default()
            .push_back(response);
    }

    /// Queue a successful run with the given stdout.
    pub fn on_success(&self, spec: &CommandSpec, stdout: &str) {
        self.on(spec, MockResponse::Output(CommandOutput::success(stdout)));
    }

    /// Queue a non-zero exit.
    pub fn on_failure(&self, spec: &CommandSpec, code: i32, stderr: &str) {
        self.on(spec, MockResponse::Output(CommandOutput::failure(code, stderr)));
    }

    /// Queue a timeout.
    pub fn on_timeout(&self, spec: &CommandSpec) {
        self.on(spec, MockResponse::Timeout);
    }

    /// Queue a spawn failure.
    pub fn on_unavailable(&self, spec: &CommandSpec) {
        self.on(spec, MockResponse::Unavailable);
    }

    /// Drop all scripted responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    /// Every command run so far, in order.
    pub fn invocations(&self) -> Vec<CommandSpec> {
        lock(&self.invocations).clone()
    }

    /// Total number of runs.
    pub fn invocation_count(&self) -> u32 {
        self.run_count.load(Ordering::Relaxed)
    }

    /// Number of runs of one command line.
    pub fn count_for(&self, spec: &CommandSpec) -> usize {
        let wanted = key(spec);
        lock(&self.invocations)
            .iter()
            .filter(|s| key(s) == wanted)
            .count()
    }

    /// Number of runs of any command line starting with `program`.
    pub fn count_program(&self, program: &str) -> usize {
        lock(&self.invocations)
            .iter()
            .filter(|s| s.program == program || s.program_name() == program)
            .count()
    }

    /// Forget recorded invocations.
    pub fn reset_invocations(&self) {
        lock(&self.invocations).clear();
        self.run_count.store(0, Ordering::Relaxed);
    }

    /// Set simulated run latency.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    fn next_response(&self, spec: &CommandSpec) -> Option<MockResponse> {
        let mut responses = lock(&self.responses);
        let queue = responses.get_mut(&key(spec))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        lock(&self.invocations).push(spec.clone());
        self.run_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        match self.next_response(spec) {
            Some(MockResponse::Output(output)) => Ok(output),
            Some(MockResponse::Timeout) => Err(Error::timeout(spec.to_string(), spec.timeout)),
            Some(MockResponse::Unavailable) | None => Err(Error::unavailable(
                spec.program_name(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock: no scripted response"),
            )),
        }
    }
}

/// Builder for creating scripted runners.
#[derive(Debug, Default)]
pub struct MockRunnerBuilder {
    script: Vec<(CommandSpec, MockResponse)>,
    latency: Option<Duration>,
}

impl MockRunnerBuilder {
    /// Create a new builder with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run.
    #[must_use]
    pub fn success(mut self, spec: CommandSpec, stdout: &str) -> Self {
        self.script.push((
            spec,
            MockResponse::Output(CommandOutput::success(stdout)),
        ));
        self
    }

    /// Queue a non-zero exit.
    #[must_use]
    pub fn failure(mut self, spec: CommandSpec, code: i32, stderr: &str) -> Self {
        self.script.push((
            spec,
            MockResponse::Output(CommandOutput::failure(code, stderr)),
        ));
        self
    }

    /// Queue a timeout.
    #[must_use]
    pub fn timeout(mut self, spec: CommandSpec) -> Self {
        self.script.push((spec, MockResponse::Timeout));
        self
    }

    /// Queue a spawn failure.
    #[must_use]
    pub fn unavailable(mut self, spec: CommandSpec) -> Self {
        self.script.push((spec, MockResponse::Unavailable));
        self
    }

    /// Delay every run.
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Build the runner.
    #[must_use]
    pub fn build(self) -> MockRunner {
        let runner = MockRunner::new();
        for (spec, response) in &self.script {
            runner.on(spec, response.clone());
        }
        if let Some(latency) = self.latency {
            runner.set_latency(latency);
        }
        runner
    }
}
