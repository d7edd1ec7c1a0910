use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use deepscan_core::{
    ExplorerOptions, ExternalAuditor, FeatureFlags, ReportFormat, ScanOptions, ScanOrchestrator, classify,
    render_report, resolve_scan_config,
};
use deepscan_scanner::{GotoOptions, HttpBrowser};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolved config for `name` as pretty JSON.
pub fn profile_json(name: &str, flags: FeatureFlags) -> Result<String> {
    let config = resolve_scan_config(name, flags)?;
    Ok(serde_json::to_string_pretty(&config)?)
}

/// Classification record for `rule_id` as pretty JSON.
pub fn rule_json(rule_id: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&classify(rule_id))?)
}

/// Write `contents` to `path` (tilde expanded), creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let target = PathBuf::from(expanded);

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&target, contents)
        .with_context(|| format!("Failed to write report to {}", target.display()))?;
    Ok(target)
}

/// Split `--audit-command` values into the program and its arguments.
pub fn split_audit_command(parts: &[String]) -> Result<(String, Vec<String>)> {
    match parts.split_first() {
        Some((program, args)) if !program.trim().is_empty() => Ok((program.clone(), args.to_vec())),
        _ => bail!("--audit-command needs a program to run"),
    }
}

fn flags_from_args(args: &ArgMatches) -> FeatureFlags {
    FeatureFlags {
        budgeted_profiles: args.get_flag("budgeted-profiles"),
    }
}

/// Timing and capture settings for `scan`, taken from the parsed flags.
pub fn scan_options_from_args(args: &ArgMatches) -> ScanOptions {
    let seconds = |id: &str, default: u64| Duration::from_secs(args.get_one::<u64>(id).copied().unwrap_or(default));
    let millis = |id: &str, default: u64| Duration::from_millis(args.get_one::<u64>(id).copied().unwrap_or(default));

    ScanOptions {
        goto: GotoOptions {
            timeout: seconds("timeout", 30),
            ..GotoOptions::default()
        },
        explorer: ExplorerOptions {
            action_timeout: millis("action-timeout", 3000),
            settle_delay: millis("settle-delay", 500),
        },
        audit_timeout: seconds("audit-timeout", 60),
        capture_screenshot: !args.get_flag("no-screenshot"),
        flags: flags_from_args(args),
    }
}

pub async fn handle_scan(args: &ArgMatches, quiet: bool) -> Result<()> {
    init_tracing(if quiet { "warn" } else { "info" });

    let url = args
        .get_one::<Url>("url")
        .context("--url is required")?;
    let profile = args
        .get_one::<String>("profile")
        .map(String::as_str)
        .unwrap_or("standard");
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<PathBuf>("output");
    let audit_command: Vec<String> = args
        .get_many::<String>("audit-command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let (program, program_args) = split_audit_command(&audit_command)?;
    let auditor = ExternalAuditor::new(program).with_args(program_args);

    let options = scan_options_from_args(args);

    if !quiet {
        println!("\n{} {}", "Scanning".bright_cyan().bold(), url);
        println!("Profile: {}", profile);
        println!("Navigation timeout: {}s\n", options.goto.timeout.as_secs());
    }

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let progress = spinner.clone();
    let orchestrator = ScanOrchestrator::with_options(
        Arc::new(HttpBrowser::with_timeout(options.goto.timeout.as_secs())),
        Arc::new(auditor),
        options,
    )
    .with_progress_callback(Arc::new(move |msg: String| progress.set_message(msg)));

    let result = orchestrator.scan(url.as_str(), profile).await;
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("Scan of {} failed", url))?;

    if !quiet {
        println!("{} Scan complete!\n", "✓".green().bold());
    }

    let report = render_report(&result, format)?;
    match output {
        Some(path) => {
            let written = write_report(path, &report)?;
            println!("Report saved to {}", written.display());
        }
        None => print!("{}", report),
    }

    Ok(())
}

pub fn handle_profile(args: &ArgMatches) -> Result<()> {
    let name = args
        .get_one::<String>("NAME")
        .context("profile name is required")?;
    println!("{}", profile_json(name, flags_from_args(args))?);
    Ok(())
}

pub fn handle_rule(args: &ArgMatches) -> Result<()> {
    let rule_id = args
        .get_one::<String>("RULE_ID")
        .context("rule id is required")?;
    println!("{}", rule_json(rule_id)?);
    Ok(())
}
