use std::process::ExitCode;

use clap::Parser;
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_patch::cli::{default_log_filter, resolve_config, Args, Command};
use site_patch::inspect::inspect_file;
use site_patch::{apply_named, PatchKind, Result};

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(args.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // variants already render their source in the message
            eprintln!("{} {}", "error:".red().bold(), e);
            if e.is_assumption_violated() {
                eprintln!(
                    "{}",
                    "the artifact no longer matches this patch; it was left untouched".yellow()
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = resolve_config(args)?;

    match &args.command {
        Command::Apply { patches } => {
            for report in apply_named(patches, &config, args.dry_run)? {
                let status = if report.written {
                    "patched".green().bold()
                } else {
                    "dry-run".yellow().bold()
                };
                println!(
                    "{} {} -> {} ({} -> {} bytes)",
                    status,
                    report.name.bold(),
                    report.target.display(),
                    report.bytes_before,
                    report.bytes_after
                );
            }
        }
        Command::List => {
            for kind in PatchKind::ALL {
                let patch = kind.build(&config)?;
                println!(
                    "{:<12} {}  {}",
                    kind.name().bold(),
                    patch.target().display().to_string().dimmed(),
                    kind.description()
                );
            }
        }
        Command::Check => {
            let path = config.content_path();
            let report = inspect_file(&path)?;
            println!("{} {}", "document:".bold(), path.display());
            println!("  sections:    {}", report.sections.join(", "));
            println!("  policy cap:  {}", site_patch::rules::format_number(report.policy_cap));
            if let Some(score) = report.s4_default_score {
                println!("  S4 default:  {}", site_patch::rules::format_number(score));
            }
            println!("  step badges: {}", report.step_badges.join(" "));
            if report.is_valid() {
                println!("  {}", "all invariants hold".green());
            } else {
                for problem in &report.problems {
                    println!("  {} {}", "✗".red(), problem);
                }
                return Err(site_patch::PatchError::InvalidDocument(report.problems));
            }
        }
    }
    Ok(())
}
