use std::{collections::BTreeSet, sync::Mutex};

use semver::Version;
use serde::Serialize;

/// Status of the current update offer. Transitions within a check cycle are
/// monotonic except `Available -> Idle` (remind-later).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateStatus {
    Idle,
    Available(Version),
    Skipped(Version),
    Downloading(Version),
    ReadyToInstall(Version),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOfferPayload {
    pub(crate) current_version: String,
    pub(crate) new_version: String,
}

/// The confirmation a user-initiated transition must acknowledge before the
/// transition is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfirmRequest {
    SkipVersion(Version),
    DownloadUpdate(Version),
}

/// Seam between the state machine and the dialog surface. `Ok(())` means the
/// single acknowledgment button was pressed; `Err` means the dialog failed to
/// resolve and the requested transition must be abandoned.
pub(crate) trait ConfirmPrompt {
    fn acknowledge(&self, request: &ConfirmRequest) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FoundOutcome {
    Offered,
    SuppressedSkipped,
    SuppressedNotNewer,
    SuppressedBusy,
}

#[derive(Debug)]
pub(crate) struct UpdateCoordinator {
    current_version: Version,
    status: Mutex<UpdateStatus>,
    skipped_versions: Mutex<BTreeSet<Version>>,
}

impl UpdateCoordinator {
    pub(crate) fn new(current_version: Version, skipped_versions: BTreeSet<Version>) -> Self {
        Self {
            current_version,
            status: Mutex::new(UpdateStatus::Idle),
            skipped_versions: Mutex::new(skipped_versions),
        }
    }

    pub(crate) fn status(&self) -> UpdateStatus {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or(UpdateStatus::Idle)
    }

    fn is_skipped(&self, version: &Version) -> bool {
        self.skipped_versions
            .lock()
            .map(|skipped| skipped.contains(version))
            .unwrap_or(false)
    }

    /// A check cycle reported `new_version`. Opens a fresh offer unless the
    /// version is skipped, not actually newer, or a decision is already in
    /// flight. A settled skip does not block later cycles: only the skipped
    /// version itself stays suppressed.
    pub(crate) fn handle_update_found(&self, new_version: Version) -> Result<FoundOutcome, String> {
        if self.is_skipped(&new_version) {
            return Ok(FoundOutcome::SuppressedSkipped);
        }
        if new_version <= self.current_version {
            return Ok(FoundOutcome::SuppressedNotNewer);
        }

        let mut status = self.lock_status()?;
        match *status {
            UpdateStatus::Idle | UpdateStatus::Skipped(_) => {
                *status = UpdateStatus::Available(new_version);
                Ok(FoundOutcome::Offered)
            }
            _ => Ok(FoundOutcome::SuppressedBusy),
        }
    }

    pub(crate) fn offer_payload(&self) -> Option<UpdateOfferPayload> {
        match self.status() {
            UpdateStatus::Available(new_version) => Some(UpdateOfferPayload {
                current_version: self.current_version.to_string(),
                new_version: new_version.to_string(),
            }),
            _ => None,
        }
    }

    /// Skip: confirmed, then sticky for the rest of the process's life (and
    /// persisted by the caller). Returns the skipped version.
    pub(crate) fn skip(&self, prompt: &dyn ConfirmPrompt) -> Result<Version, String> {
        let version = self.available_version()?;
        prompt.acknowledge(&ConfirmRequest::SkipVersion(version.clone()))?;

        let mut status = self.lock_status()?;
        if *status != UpdateStatus::Available(version.clone()) {
            return Err("update offer changed while awaiting confirmation".to_string());
        }
        *status = UpdateStatus::Skipped(version.clone());
        drop(status);

        if let Ok(mut skipped) = self.skipped_versions.lock() {
            skipped.insert(version.clone());
        }
        Ok(version)
    }

    /// Remind-later: immediate, no confirmation, not sticky. The offer is
    /// verified and cleared under one lock so a concurrent skip or install
    /// cannot be rolled back.
    pub(crate) fn remind_later(&self) -> Result<Version, String> {
        let mut status = self.lock_status()?;
        match status.clone() {
            UpdateStatus::Available(version) => {
                *status = UpdateStatus::Idle;
                Ok(version)
            }
            other => Err(format!("no update offer is open (status {other:?})")),
        }
    }

    /// Install: confirmed, then the external download begins.
    pub(crate) fn install(&self, prompt: &dyn ConfirmPrompt) -> Result<Version, String> {
        let version = self.available_version()?;
        prompt.acknowledge(&ConfirmRequest::DownloadUpdate(version.clone()))?;

        let mut status = self.lock_status()?;
        if *status != UpdateStatus::Available(version.clone()) {
            return Err("update offer changed while awaiting confirmation".to_string());
        }
        *status = UpdateStatus::Downloading(version.clone());
        Ok(version)
    }

    pub(crate) fn download_complete(&self) -> Result<Version, String> {
        let mut status = self.lock_status()?;
        match status.clone() {
            UpdateStatus::Downloading(version) => {
                *status = UpdateStatus::ReadyToInstall(version.clone());
                Ok(version)
            }
            other => Err(format!(
                "download completion reported while status was {other:?}"
            )),
        }
    }

    /// The external download or install was abandoned. The offer returns to
    /// idle so the next check cycle can re-offer.
    pub(crate) fn abandon_download(&self) -> Result<Version, String> {
        let mut status = self.lock_status()?;
        match status.clone() {
            UpdateStatus::Downloading(version) | UpdateStatus::ReadyToInstall(version) => {
                *status = UpdateStatus::Idle;
                Ok(version)
            }
            other => Err(format!(
                "download abandonment reported while status was {other:?}"
            )),
        }
    }

    fn available_version(&self) -> Result<Version, String> {
        match self.status() {
            UpdateStatus::Available(version) => Ok(version),
            other => Err(format!("no update offer is open (status {other:?})")),
        }
    }

    fn lock_status(&self) -> Result<std::sync::MutexGuard<'_, UpdateStatus>, String> {
        self.status
            .lock()
            .map_err(|_| "update offer lock poisoned".to_string())
    }
}
