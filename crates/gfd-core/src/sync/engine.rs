//! SyncEngine implementation
//!
//! The SyncEngine brings local files in line with the repository: each remote
//! file is fetched with its server digest, compared against the SHA-256 of the
//! local copy, and written only when the two differ.

use std::path::Path;

use gfd_api::{RepositoryClient, Transport};
use gfd_fs::io::{dir_exists, ensure_dir, parent_dir, write_atomic};
use gfd_fs::{digest_bytes, digest_of_existing_file, digests_match};

use super::report::{ItemReport, Outcome, SyncReport, WriteReason};
use crate::mode::Mode;
use crate::settings::{Settings, Target};
use crate::{Error, Result};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, decide what would change without modifying the filesystem.
    pub dry_run: bool,
}

/// Engine for reconciling remote files onto local disk
///
/// - **File mode**: one remote file to one local path; any error is fatal
/// - **Folder mode**: every direct child of a remote folder; a failing item
///   is recorded in the report and the remaining items still run
pub struct SyncEngine<T: Transport> {
    transport: T,
    options: SyncOptions,
}

impl<T: Transport> SyncEngine<T> {
    pub fn new(transport: T, options: SyncOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run the sync described by `settings`.
    ///
    /// # Errors
    ///
    /// Any failure in File mode. In Folder mode only a failure to prepare the
    /// output folder or to list the remote folder.
    pub fn run(&self, settings: &Settings) -> Result<SyncReport> {
        match settings.target() {
            Target::File { .. } => {
                let mut report = SyncReport::new(Mode::File, self.options.dry_run);
                report.push(self.reconcile_file(settings)?);
                Ok(report)
            }
            Target::Folder { .. } => self.reconcile_folder(settings),
        }
    }

    /// Reconcile the single file of a File-mode `settings`.
    ///
    /// # Errors
    ///
    /// - [`Error::ModeMismatch`] if `settings` targets a folder
    /// - [`Error::TargetMissing`] if the output directory does not exist,
    ///   before any request is made
    /// - [`Error::Api`] for fetch or decode failures
    /// - [`Error::IntegrityMismatch`] when verification is enabled and the
    ///   content does not match the server digest
    /// - [`Error::Fs`] if the local file cannot be read or written
    pub fn reconcile_file(&self, settings: &Settings) -> Result<ItemReport> {
        let client = RepositoryClient::new(&self.transport, settings.endpoint());
        let (remote_path, output_path) = file_target(settings)?;
        let outcome = self.reconcile_with(&client, settings, true)?;
        Ok(ItemReport {
            remote_path: remote_path.to_string(),
            local_path: output_path.to_path_buf(),
            outcome,
        })
    }

    /// Reconcile every direct child of a Folder-mode `settings`.
    ///
    /// The output folder is created if absent (one level only); a missing
    /// parent of it is [`Error::TargetMissing`] before any request, also in
    /// a dry run. Items are processed in listing order; entries that are not
    /// files are reported without being fetched.
    pub fn reconcile_folder(&self, settings: &Settings) -> Result<SyncReport> {
        let (remote_folder, output_folder) = match settings.target() {
            Target::Folder {
                remote_folder,
                output_folder,
            } => (remote_folder.as_str(), output_folder.as_path()),
            Target::File { .. } => {
                return Err(Error::ModeMismatch {
                    expected: Mode::Folder,
                    actual: Mode::File,
                });
            }
        };

        let folder_present = dir_exists(output_folder);
        if !folder_present {
            // Only the last level is ever created, dry run or not.
            let parent = parent_dir(output_folder);
            if !dir_exists(&parent) {
                return Err(Error::TargetMissing { dir: parent });
            }
            if !self.options.dry_run && ensure_dir(output_folder)? {
                tracing::info!(folder = %output_folder.display(), "Created output folder");
            }
        }
        // In a dry run a missing folder stays missing, so items must not
        // require it.
        let require_parent = folder_present || !self.options.dry_run;

        let client = RepositoryClient::new(&self.transport, settings.endpoint());
        let entries = client.list_folder(remote_folder, settings.branch())?;
        tracing::debug!(
            folder = remote_folder,
            entries = entries.len(),
            "Reconciling folder"
        );

        let mut report = SyncReport::new(Mode::Folder, self.options.dry_run);
        for entry in entries {
            let local_path = output_folder.join(entry.basename());

            let outcome = if !entry.is_file() {
                tracing::debug!(item = %entry.path, kind = ?entry.kind, "Skip: not a file");
                Outcome::SkippedNotAFile
            } else {
                let item = settings.for_entry(&entry.path, &local_path);
                match self.reconcile_with(&client, &item, require_parent) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!(item = %entry.path, error = %e, "Failed to sync item");
                        Outcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };

            report.push(ItemReport {
                remote_path: entry.path,
                local_path,
                outcome,
            });
        }

        Ok(report)
    }

    fn reconcile_with(
        &self,
        client: &RepositoryClient<&T>,
        settings: &Settings,
        require_parent: bool,
    ) -> Result<Outcome> {
        let (remote_path, output_path) = file_target(settings)?;

        let dir = parent_dir(output_path);
        if require_parent && !dir_exists(&dir) {
            return Err(Error::TargetMissing { dir });
        }

        let record = client.get_file(remote_path, settings.branch())?;
        let content = record.decode_content()?;

        if settings.verify_remote_digest() {
            let actual = digest_bytes(&content);
            if !digests_match(&actual, &record.content_sha256) {
                return Err(Error::IntegrityMismatch {
                    path: remote_path.to_string(),
                    expected: record.content_sha256,
                    actual,
                });
            }
        }

        let reason = match digest_of_existing_file(output_path)? {
            None => WriteReason::New,
            Some(local) if digests_match(&local, &record.content_sha256) => {
                tracing::info!(path = %output_path.display(), "Skip: content is equal");
                return Ok(Outcome::Skipped);
            }
            Some(_) => WriteReason::Changed,
        };

        if self.options.dry_run {
            tracing::info!(path = %output_path.display(), ?reason, "[dry-run] Would write file");
            return Ok(Outcome::WouldWrite { reason });
        }

        write_atomic(output_path, &content)?;
        tracing::info!(
            path = %output_path.display(),
            ?reason,
            bytes = content.len(),
            "Wrote file"
        );
        Ok(Outcome::Wrote { reason })
    }
}

fn file_target(settings: &Settings) -> Result<(&str, &Path)> {
    match settings.target() {
        Target::File {
            remote_path,
            output_path,
        } => Ok((remote_path.as_str(), output_path.as_path())),
        Target::Folder { .. } => Err(Error::ModeMismatch {
            expected: Mode::File,
            actual: Mode::Folder,
        }),
    }
}
