use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use dist_publish::cli::{PipelineOutcome, ReleaseWorkflow};
use dist_publish::config;
use dist_publish::editor::CrosstermTerminal;
use dist_publish::error::ReleaseError;
use dist_publish::plan::{resolve_kind, ReleaseFlags, ReleasePlan};
use dist_publish::runner::ShellRunner;
use dist_publish::ui;

#[derive(clap::Parser)]
#[command(
    name = "dist-publish",
    about = "Bump, stage and publish a package from its build output directory"
)]
struct Args {
    #[arg(long, help = "Release a new major version")]
    major: bool,

    #[arg(long, help = "Release a new minor version")]
    minor: bool,

    #[arg(long, help = "Release a new patch version (default)")]
    patch: bool,

    #[arg(
        long = "type",
        value_name = "TAG",
        help = "Release a pre-release under this tag, e.g. beta"
    )]
    release_type: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory whose contents are published")]
    src: Option<String>,

    #[arg(long, help = "Publish the project root instead of a build directory")]
    root: bool,

    #[arg(long, value_name = "DIR", help = "Staging directory name")]
    dest: Option<String>,

    #[arg(long, help = "Stage and print planned commands without publishing")]
    dry_run: bool,

    #[arg(long, help = "Keep the staging directory afterwards")]
    no_cleanup: bool,

    #[arg(long, help = "Publish with public access")]
    public: bool,

    #[arg(long, help = "Create an annotated git tag for the release")]
    tag: bool,

    #[arg(long, help = "Push the release commit (and tag) to the remote")]
    push: bool,

    #[arg(long, help = "Skip the git commit, tag and push steps")]
    no_git: bool,

    #[arg(long, help = "Do not copy the license file into the package")]
    no_license: bool,

    #[arg(long, help = "Run the configured prepare commands first")]
    prepare: bool,

    #[arg(long, help = "Never prompt; use the default commit message")]
    silent: bool,

    #[arg(long, help = "Prompt for a one-time password before publishing")]
    otp: bool,

    #[arg(long, help = "Show command output and debug logging")]
    verbose: bool,

    #[arg(short, long, value_name = "PATH", help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Project root (defaults to the current directory)")]
    cwd: Option<PathBuf>,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("dist-publish {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let project_root = match args.cwd.clone() {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    let config = match config::load_config(args.config.as_deref(), &project_root) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let kind = match resolve_kind(
        args.major,
        args.minor,
        args.patch,
        args.release_type.as_deref(),
    ) {
        Ok(kind) => kind,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let source_dir = if args.root {
        ".".to_string()
    } else {
        args.src.clone().unwrap_or_else(|| config.staging.src.clone())
    };
    let staging_dir = args.dest.clone().unwrap_or_else(|| config.staging.dest.clone());

    let flags = ReleaseFlags {
        dry_run: args.dry_run,
        no_cleanup: args.no_cleanup,
        public_access: args.public,
        tag: args.tag,
        push: args.push,
        no_git: args.no_git,
        no_license: args.no_license,
        prepare: args.prepare,
        silent: args.silent,
        use_otp: args.otp,
        verbose: args.verbose,
    };
    let plan = ReleasePlan::new(kind, project_root, source_dir, staging_dir, flags);
    log::debug!("release plan: {:?}", plan);

    let runner = ShellRunner::new();
    let mut terminal = CrosstermTerminal::new();
    let outcome = ReleaseWorkflow::new(&plan, &config, &runner, &mut terminal).run();

    ui::display_outcome(&outcome);
    if let PipelineOutcome::Failure {
        cause: ReleaseError::ManifestUnreadable { .. },
        ..
    } = &outcome
    {
        if !plan.manifest_path().exists() {
            ui::display_status(&ui::format_missing_manifest_hint(
                &plan.project_root.display().to_string(),
            ));
        }
    }

    std::process::exit(outcome.exit_code());
}
