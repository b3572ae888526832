//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use gfd_core::RawSettings;

/// GitLab File Downloader - keep local files in sync with a GitLab repository
///
/// Downloads one file (--repo-file-path / --out-path) or every file directly
/// inside a folder (--repo-folder / --out-folder). A file is only written when
/// its SHA-256 differs from the local copy.
#[derive(Parser, Debug)]
#[command(name = "gitlab-file-downloader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Personal or project access token
    #[arg(long, env = "GFD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API v4 base URL, e.g. https://gitlab.com/api/v4/
    #[arg(long, env = "GFD_URL")]
    pub url: Option<String>,

    /// Project id or namespace/project path
    #[arg(long, env = "GFD_PROJECT_NUMBER", value_name = "ID")]
    pub project_number: Option<String>,

    /// Branch or ref to read from [default: master]
    #[arg(long, env = "GFD_BRANCH")]
    pub branch: Option<String>,

    /// Local file to write
    #[arg(long, value_name = "PATH")]
    pub out_path: Option<PathBuf>,

    /// Remote file to download
    #[arg(long, value_name = "PATH")]
    pub repo_file_path: Option<String>,

    /// Local folder to write into (created if absent, one level only)
    #[arg(long, value_name = "DIR")]
    pub out_folder: Option<PathBuf>,

    /// Remote folder whose direct children are downloaded
    #[arg(long, value_name = "DIR")]
    pub repo_folder: Option<String>,

    /// TOML file with any of the settings above
    #[arg(long, env = "GFD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Re-hash downloaded content and fail on a digest mismatch
    #[arg(long)]
    pub verify: bool,

    /// Show what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Output the report as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Exit with an error if any folder item failed
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given on the command line or through the environment.
    pub fn overrides(&self) -> RawSettings {
        RawSettings {
            token: self.token.clone(),
            url: self.url.clone(),
            project: self.project_number.clone(),
            branch: self.branch.clone(),
            out_path: self.out_path.clone(),
            repo_file_path: self.repo_file_path.clone(),
            out_folder: self.out_folder.clone(),
            repo_folder: self.repo_folder.clone(),
            verify_remote_digest: self.verify.then_some(true),
        }
    }
}
