//! Main workflow orchestration logic
//!
//! Keeps CLI argument parsing in main.rs apart from the changelog workflow, so the
//! workflow can be called programmatically without depending on clap.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::{error, info};

use crate::assembler::{Assembly, ChangelogAssembler};
use crate::config::Config;
use crate::git::{Git2Repository, Repository};
use crate::provider::{parse_remote_url, DescriptionFetcher, HostedProvider};
use crate::render::{render_markdown, write_changelog};
use crate::ui;

/// Remote whose URL identifies the hosted project
pub const ORIGIN: &str = "origin";

/// Arguments for the generate workflow
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    /// Repository to read, discovered upwards from this path
    pub repo_path: PathBuf,

    /// Explicit boundary tag (suffix match); latest version tag when `None`
    pub since_tag: Option<String>,

    /// Release label written at the top of the changelog
    pub release: String,

    /// Write to this file instead of returning the markdown
    pub file: Option<PathBuf>,

    /// Overwrite an existing output file without asking
    pub force: bool,
}

/// Result of a successful generate workflow
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Rendered markdown, to be printed
    Rendered(String),
    /// Changelog written to this file
    Written(PathBuf),
    /// User declined to overwrite the output file
    Cancelled,
}

/// Assemble the changelog from `repo` and `fetcher`.
///
/// Fatal failures are logged with their cause and reported as a single
/// "failed generation of changelog" error.
pub fn assemble_changelog<R: Repository, F: DescriptionFetcher>(
    repo: &R,
    fetcher: &F,
    args: &GenerateArgs,
) -> Result<Assembly> {
    let assembler = ChangelogAssembler::new(repo, fetcher).map_err(|e| {
        error!("{}", e);
        anyhow!("failed generation of changelog")
    })?;

    assembler
        .run(args.since_tag.as_deref(), &args.release)
        .map_err(|e| {
            error!("{}", e);
            anyhow!("failed generation of changelog")
        })
}

/// Render or write an assembled changelog according to `args`
pub fn emit_changelog(assembly: &Assembly, args: &GenerateArgs) -> Result<GenerateOutcome> {
    match &args.file {
        Some(path) => {
            if !args.force && !ui::confirm_overwrite(path)? {
                return Ok(GenerateOutcome::Cancelled);
            }
            write_changelog(&assembly.changelog, path).map_err(|e| {
                error!("{}", e);
                anyhow!("failed to write to the output file")
            })?;
            Ok(GenerateOutcome::Written(path.clone()))
        }
        None => {
            let markdown = render_markdown(&assembly.changelog).map_err(|e| {
                error!("{}", e);
                anyhow!("failed generation of changelog")
            })?;
            Ok(GenerateOutcome::Rendered(markdown))
        }
    }
}

/// Connect to the configured provider for the project behind `origin`.
///
/// Missing remotes, unrecognised remote URLs and missing tokens are logged and
/// reported as "failed generation of changelog".
pub fn connect_provider<R: Repository>(repo: &R, config: &Config) -> Result<HostedProvider> {
    let remote_url = match repo.remote_url(ORIGIN) {
        Ok(Some(url)) => url,
        Ok(None) => {
            error!("repository has no '{}' remote", ORIGIN);
            return Err(anyhow!("failed generation of changelog"));
        }
        Err(e) => {
            error!("{}", e);
            return Err(anyhow!("failed generation of changelog"));
        }
    };

    let project = parse_remote_url(&remote_url).ok_or_else(|| {
        error!("cannot determine owner/repository from '{}'", remote_url);
        anyhow!("failed generation of changelog")
    })?;
    info!("User/Org: {}, Repo: {}", project.owner, project.repo);

    let kind = config.git_provider;
    config
        .resolve_token(kind)
        .and_then(|token| HostedProvider::connect(kind, &config.host_for(kind), project, Some(token)))
        .map_err(|e| {
            error!("{}", e);
            anyhow!("failed generation of changelog")
        })
}

/// Main generate workflow
///
/// 1. Open the repository and identify the hosted project from `origin`
/// 2. Connect to the configured provider
/// 3. Assemble the changelog since the boundary tag
/// 4. Render it or write it to a file
pub fn run_generate(args: &GenerateArgs, config: &Config) -> Result<GenerateOutcome> {
    let repo = Git2Repository::open(&args.repo_path).map_err(|e| {
        error!("{}", e);
        anyhow!("failed generation of changelog")
    })?;

    let provider = connect_provider(&repo, config)?;
    let kind = provider.kind();

    ui::display_status(&format!("Collecting {}s from {}...", kind.request_label(), kind));
    let assembly = assemble_changelog(&repo, &provider, args)?;
    ui::display_assembly_summary(&assembly);
    for warning in &assembly.warnings {
        ui::display_boundary_warning(warning);
    }

    emit_changelog(&assembly, args)
}
