//! End-to-end update run

use std::sync::Arc;

use tracing::info;

use crate::update::applier::{AppliedUpdate, UpdateApplier};
use crate::update::error::UpdateError;
use crate::update::manifest::ManifestSource;
use crate::update::planner::plan;
use crate::update::types::UpdateEntry;
use crate::update::version_store::VersionStore;

/// Installed version and the updates pending for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    pub current: String,
    /// Number of entries the manifest listed
    pub manifest_entries: usize,
    pub pending: Vec<UpdateEntry>,
}

/// How a run ended when nothing failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The manifest listed no versions at all
    NoUpdatesFound { current: String },
    /// Nothing follows the installed version in the manifest
    UpToDate { current: String },
    Updated {
        from: String,
        applied: Vec<AppliedUpdate>,
    },
}

impl UpdateCheck {
    /// How a run ends without applying anything, or `None` when updates are
    /// pending
    pub fn idle_outcome(&self) -> Option<RunOutcome> {
        let current = self.current.clone();
        if self.manifest_entries == 0 {
            Some(RunOutcome::NoUpdatesFound { current })
        } else if self.pending.is_empty() {
            Some(RunOutcome::UpToDate { current })
        } else {
            None
        }
    }
}

impl RunOutcome {
    /// Closing progress line for the outcome
    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::NoUpdatesFound { .. } => "No updates found in manifest.",
            RunOutcome::UpToDate { .. } => "Already up to date!",
            RunOutcome::Updated { .. } => "All updates applied successfully!",
        }
    }
}

pub struct Updater {
    store: VersionStore,
    source: Arc<dyn ManifestSource>,
    applier: UpdateApplier,
}

impl Updater {
    pub fn new(
        store: VersionStore,
        source: Arc<dyn ManifestSource>,
        applier: UpdateApplier,
    ) -> Self {
        Self {
            store,
            source,
            applier,
        }
    }

    /// Reads the installed version and plans pending updates without applying
    /// anything. Fails before any network access when the version file is
    /// missing.
    pub async fn check(&self) -> Result<UpdateCheck, UpdateError> {
        let current = self.store.read()?;
        info!("Current version: {}", current);

        info!("Fetching update info...");
        let manifest = self.source.fetch_manifest().await?;
        let pending = plan(&current, manifest.updates());

        Ok(UpdateCheck {
            current,
            manifest_entries: manifest.updates().len(),
            pending,
        })
    }

    /// Applies every pending update in manifest order.
    ///
    /// The first failure stops the run; updates applied before it stay in
    /// place.
    pub async fn run(&self) -> Result<RunOutcome, UpdateError> {
        let check = self.check().await?;

        if let Some(outcome) = check.idle_outcome() {
            info!("{}", outcome.message());
            return Ok(outcome);
        }

        info!("Found {} updates to apply.", check.pending.len());

        let mut applied = Vec::with_capacity(check.pending.len());
        for entry in &check.pending {
            info!("Updating to version {} ...", entry.version);
            applied.push(self.applier.apply(entry).await?);
        }

        let outcome = RunOutcome::Updated {
            from: check.current,
            applied,
        };
        info!("{}", outcome.message());

        Ok(outcome)
    }
}
