//! Unvalidated settings as read from files, environment and flags

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::mode::Mode;
use crate::settings::{ConfigError, Settings, Target, field};

/// One configuration layer. Every field is optional; later layers override
/// earlier ones field by field via [`RawSettings::merge`].
///
/// File keys use the same names as [`field`], e.g.
///
/// ```toml
/// token = "glpat-..."
/// url = "https://gitlab.com/api/v4/"
/// projectNumber = 16447351
/// repoFilePath = "settings.json"
/// outPath = "/etc/app/settings.json"
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawSettings {
    pub token: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "projectNumber", deserialize_with = "project_id")]
    pub project: Option<String>,
    pub branch: Option<String>,
    pub out_path: Option<PathBuf>,
    pub repo_file_path: Option<String>,
    pub out_folder: Option<PathBuf>,
    pub repo_folder: Option<String>,
    pub verify_remote_digest: Option<bool>,
}

impl fmt::Debug for RawSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSettings")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .field("project", &self.project)
            .field("branch", &self.branch)
            .field("out_path", &self.out_path)
            .field("repo_file_path", &self.repo_file_path)
            .field("out_folder", &self.out_folder)
            .field("repo_folder", &self.repo_folder)
            .field("verify_remote_digest", &self.verify_remote_digest)
            .finish()
    }
}

/// Accepts `projectNumber = 123` as well as `projectNumber = "group/project"`.
fn project_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ProjectId {
        Number(u64),
        Text(String),
    }

    Ok(
        Option::<ProjectId>::deserialize(deserializer)?.map(|id| match id {
            ProjectId::Number(n) => n.to_string(),
            ProjectId::Text(s) => s,
        }),
    )
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn path(value: &Option<PathBuf>) -> Option<&Path> {
    value.as_deref().filter(|p| !p.as_os_str().is_empty())
}

fn overlay_text(base: &mut Option<String>, value: &Option<String>) {
    if text(value).is_some() {
        base.clone_from(value);
    }
}

fn overlay_path(base: &mut Option<PathBuf>, value: &Option<PathBuf>) {
    if path(value).is_some() {
        base.clone_from(value);
    }
}

/// `0` was the unset value of the numeric project flag.
fn project_ref(value: &Option<String>) -> Option<&str> {
    text(value).filter(|p| *p != "0")
}

impl RawSettings {
    /// Parse one TOML layer.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay `other` onto `self`. Unset or empty values in `other` leave
    /// the current value in place.
    pub fn merge(&mut self, other: &RawSettings) {
        overlay_text(&mut self.token, &other.token);
        overlay_text(&mut self.url, &other.url);
        overlay_text(&mut self.project, &other.project);
        overlay_text(&mut self.branch, &other.branch);
        overlay_path(&mut self.out_path, &other.out_path);
        overlay_text(&mut self.repo_file_path, &other.repo_file_path);
        overlay_path(&mut self.out_folder, &other.out_folder);
        overlay_text(&mut self.repo_folder, &other.repo_folder);
        if other.verify_remote_digest.is_some() {
            self.verify_remote_digest = other.verify_remote_digest;
        }
    }

    /// Mode implied by the populated target fields.
    ///
    /// When both the file pair and the folder pair are complete this still
    /// answers [`Mode::File`]; [`RawSettings::validate`] rejects that case.
    pub fn mode(&self) -> Mode {
        if path(&self.out_path).is_some() && text(&self.repo_file_path).is_some() {
            Mode::File
        } else if path(&self.out_folder).is_some() && text(&self.repo_folder).is_some() {
            Mode::Folder
        } else {
            Mode::Undefined
        }
    }

    /// Check every field and build [`Settings`], or report all problems at once.
    pub fn validate(&self) -> std::result::Result<Settings, ConfigError> {
        let mut errors = ConfigError::default();

        let token = text(&self.token);
        let url = text(&self.url);
        let branch = text(&self.branch);
        let project = project_ref(&self.project);
        for (name, value) in [
            (field::TOKEN, token),
            (field::URL, url),
            (field::BRANCH, branch),
            (field::PROJECT, project),
        ] {
            if value.is_none() {
                errors.missing.push(name);
            }
        }

        let out_path = path(&self.out_path);
        let repo_file_path = text(&self.repo_file_path);
        let out_folder = path(&self.out_folder);
        let repo_folder = text(&self.repo_folder);

        let file_fields: Vec<&str> = [
            (field::OUT_PATH, out_path.is_some()),
            (field::REPO_FILE_PATH, repo_file_path.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();
        let folder_fields: Vec<&str> = [
            (field::OUT_FOLDER, out_folder.is_some()),
            (field::REPO_FOLDER, repo_folder.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();

        match (file_fields.is_empty(), folder_fields.is_empty()) {
            (false, false) => errors.conflicts.push(format!(
                "{} cannot be combined with {}",
                file_fields.join(", "),
                folder_fields.join(", ")
            )),
            (true, true) => errors.missing.extend([
                field::OUT_PATH,
                field::OUT_FOLDER,
                field::REPO_FILE_PATH,
                field::REPO_FOLDER,
            ]),
            (false, true) => {
                if out_path.is_none() {
                    errors.missing.push(field::OUT_PATH);
                }
                if repo_file_path.is_none() {
                    errors.missing.push(field::REPO_FILE_PATH);
                }
            }
            (true, false) => {
                if out_folder.is_none() {
                    errors.missing.push(field::OUT_FOLDER);
                }
                if repo_folder.is_none() {
                    errors.missing.push(field::REPO_FOLDER);
                }
            }
        }

        let target = match (out_path, repo_file_path, out_folder, repo_folder) {
            (Some(output_path), Some(remote_path), None, None) => Some(Target::File {
                remote_path: remote_path.to_string(),
                output_path: output_path.to_path_buf(),
            }),
            (None, None, Some(output_folder), Some(remote_folder)) => Some(Target::Folder {
                remote_folder: remote_folder.to_string(),
                output_folder: output_folder.to_path_buf(),
            }),
            _ => None,
        };

        match (token, url, branch, project, target) {
            (Some(token), Some(url), Some(branch), Some(project), Some(target))
                if errors.is_empty() =>
            {
                Ok(Settings::new(
                    SecretString::from(token.to_string()),
                    url.to_string(),
                    project.to_string(),
                    branch.to_string(),
                    target,
                    self.verify_remote_digest.unwrap_or(false),
                ))
            }
            _ => Err(errors),
        }
    }
}
