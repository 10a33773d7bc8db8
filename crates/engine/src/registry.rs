// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline step registry.
//!
//! Steps are registered once at startup under their names; the executor
//! resolves a job's applicable step list against the registry before
//! anything runs, so an unregistered name fails the job at the context
//! stage instead of mid-pipeline.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use aqa_adapters::{QaToolkit, Tracker};
use aqa_core::AdmissionPolicy;
use aqa_storage::StepLogger;
use async_trait::async_trait;
use thiserror::Error;

use crate::context::JobContext;

/// A step's failure, recorded and reported but never fatal to the
/// remaining steps.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StepFailure(pub String);

impl StepFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<aqa_adapters::QaError> for StepFailure {
    fn from(e: aqa_adapters::QaError) -> Self {
        Self(e.to_string())
    }
}

impl From<aqa_adapters::TrackerError> for StepFailure {
    fn from(e: aqa_adapters::TrackerError) -> Self {
        Self(e.to_string())
    }
}

impl From<std::io::Error> for StepFailure {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}

/// Everything a step gets to work with for one run.
pub struct StepCtx<'a> {
    pub job: &'a JobContext,
    /// The step's date-stamped run directory.
    pub dir: &'a Path,
    /// Rotating per-step logs under `dir/logs/`.
    pub log: &'a StepLogger,
    pub tracker: &'a dyn Tracker,
    pub toolkit: &'a dyn QaToolkit,
    pub policy: &'a AdmissionPolicy,
}

/// One independent QA check.
#[async_trait]
pub trait Step: Send + Sync {
    /// The name steps are selected and registered by.
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &StepCtx<'_>) -> Result<(), StepFailure>;
}

/// Name → step mapping, fixed at startup.
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: HashMap<&'static str, Arc<dyn Step>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in pipeline steps.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::steps::PdfFlash));
        registry.register(Arc::new(crate::steps::Cla));
        registry.register(Arc::new(crate::steps::Diffex));
        registry
    }

    /// Register a step under its own name. Re-registering replaces.
    pub fn register(&mut self, step: Arc<dyn Step>) {
        self.steps.insert(step.name(), step);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Step>> {
        self.steps.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.steps.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
