use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use changelog_pr::cli::orchestration::{run_generate, GenerateArgs, GenerateOutcome};
use changelog_pr::config::{self, ConfigOverrides};
use changelog_pr::parser::description_template;
use changelog_pr::provider::ProviderKind;
use changelog_pr::ui;

#[derive(Parser)]
#[command(
    name = "changelog-pr",
    about = "Generate a changelog from merge/pull request descriptions",
    long_about = "Given a previous git tag, locate all of the merge/pull requests merged since that tag, \
                  parse their descriptions for the '## Changelog Inclusions' sections and build a changelog.\n\n\
                  Use 'changelog-pr template' to display the description template."
)]
struct Args {
    #[arg(long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short = 'g', long, global = true, help = "Git source provider (github, gitlab)")]
    git_provider: Option<ProviderKind>,

    #[arg(short = 'l', long, global = true, help = "Append log output to this file")]
    log_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long,
        global = true,
        default_value = "warning",
        help = "Log level (trace, debug, info, warning, error)"
    )]
    log_level: String,

    #[arg(long, global = true, help = "GitHub personal access token")]
    github_token: Option<String>,

    #[arg(long, global = true, help = "GitHub host")]
    github_host: Option<String>,

    #[arg(long, global = true, help = "GitLab personal access token")]
    gitlab_token: Option<String>,

    #[arg(long, global = true, help = "GitLab host")]
    gitlab_host: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the changelog for a release
    Generate {
        #[arg(short, long, help = "Tag to start from (defaults to the highest v<semver> tag)")]
        since_tag: Option<String>,

        #[arg(short, long, help = "Release version label for the changelog")]
        release: String,

        #[arg(short, long, help = "Write the changelog to this file")]
        file: Option<PathBuf>,

        #[arg(long, default_value = ".", help = "Path inside the git repository")]
        path: PathBuf,

        #[arg(long, help = "Overwrite the output file without asking")]
        force: bool,
    },
    /// Print the merge/pull request description template
    Template,
    /// Print version information
    Version,
}

/// Map a log level name to a tracing filter directive
fn level_filter(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "error" | "fatal" => "error",
        _ => "warn",
    }
}

fn init_tracing(level: &str, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        Err(_) => EnvFilter::new(level_filter(level)),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            builder
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.log_file.as_ref()) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    match args.command {
        Command::Version => {
            println!("changelog-pr {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Template => {
            print!("{}", description_template());
            Ok(())
        }
        Command::Generate {
            since_tag,
            release,
            file,
            path,
            force,
        } => {
            let config_path = config::config_path(args.config.as_deref());
            let mut config = match config::load_config(config_path.as_deref()) {
                Ok(cfg) => cfg,
                Err(e) => {
                    ui::display_error(&format!("Error loading config: {}", e));
                    std::process::exit(1);
                }
            };

            let changed = config.apply(ConfigOverrides {
                git_provider: args.git_provider,
                github_host: args.github_host,
                github_token: args.github_token,
                gitlab_host: args.gitlab_host,
                gitlab_token: args.gitlab_token,
            });
            if changed {
                if let Some(path) = config_path.as_deref() {
                    if let Err(e) = config::save_config(&config, path) {
                        tracing::info!("Failed to write config: {}", e);
                    }
                }
            }

            let generate_args = GenerateArgs {
                repo_path: path,
                since_tag,
                release,
                file,
                force,
            };

            match run_generate(&generate_args, &config) {
                Ok(GenerateOutcome::Rendered(markdown)) => {
                    print!("{}", markdown);
                    Ok(())
                }
                Ok(GenerateOutcome::Written(path)) => {
                    ui::display_success(&format!(
                        "Changelog data has been saved to {}",
                        path.display()
                    ));
                    Ok(())
                }
                Ok(GenerateOutcome::Cancelled) => {
                    eprintln!("Operation cancelled by user.");
                    Ok(())
                }
                Err(e) => {
                    ui::display_error(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
    }
}
