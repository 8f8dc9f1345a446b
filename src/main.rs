use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use primectl::cli::{Cli, Command};
use primectl::config::PrimectlConfig;
use primectl::detect::Capabilities;
use primectl::detect::pci::Inventory;
use primectl::error::Error;
use primectl::profile::Profile;
use primectl::system::{Host, RealSystemOps};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Usage errors exit 1, --help/--version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);
    let config = primectl::config::load(cli.config.as_ref());

    match cli.command {
        Command::Status => cmd_status(&config, cli.json)?,
        Command::Configure { profile, dry_run } => {
            cmd_configure(&config, profile, dry_run, cli.json)?
        }
        Command::Autoconfigure => cmd_autoconfigure(&config, cli.json)?,
        Command::Completions { shell } => primectl::cli::print_completions(shell),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Probe the machine once and refuse to continue on unsupported systems.
fn supported_host(config: &PrimectlConfig) -> Result<(Host<RealSystemOps>, Inventory)> {
    let mut host = Host::system(config.helper.helper());
    let inventory = Capabilities::detect(&mut host).check()?;
    tracing::debug!(functions = inventory.functions().len(), "environment supported");
    Ok((host, inventory))
}

fn ensure_root(operation: &str) -> Result<()> {
    if !nix::unistd::geteuid().is_root() {
        return Err(Error::NotRoot {
            operation: operation.to_string(),
        }
        .into());
    }
    Ok(())
}

fn cmd_status(config: &PrimectlConfig, json: bool) -> Result<()> {
    let (mut host, inventory) = supported_host(config)?;
    let report = primectl::status::report(&mut host, &inventory);

    if json {
        primectl::output::print_json(&report)?;
    } else {
        primectl::output::print_status(&report);
    }

    if !report.has_profile() {
        return Err(Error::NoProfile.into());
    }
    Ok(())
}

fn cmd_configure(config: &PrimectlConfig, profile: Profile, dry_run: bool, json: bool) -> Result<()> {
    let (mut host, inventory) = supported_host(config)?;

    if dry_run {
        match primectl::transition::plan_for(&mut host, &inventory, profile) {
            Some(plan) if json => primectl::output::print_json(&plan)?,
            Some(plan) => {
                primectl::output::print_plan(&plan);
                println!("{}", "Dry run complete. No changes applied.".yellow());
            }
            None => println!("Info: the {} profile is already set", profile),
        }
        return Ok(());
    }

    ensure_root(&format!("configure {}", profile))?;

    let transition = primectl::transition::apply(&mut host, &inventory, profile);

    if json {
        primectl::output::print_json(&transition)?;
    } else {
        primectl::output::print_transition(&transition);
    }

    if config.journal.enabled {
        let (priority, message) = primectl::journal::transition_entry(&transition);
        primectl::journal::log(priority, &message);
    }

    Ok(())
}

fn cmd_autoconfigure(config: &PrimectlConfig, json: bool) -> Result<()> {
    let (mut host, inventory) = supported_host(config)?;
    ensure_root("autoconfigure")?;

    let result = primectl::reconcile::reconcile(&mut host, &inventory);

    if json {
        primectl::output::print_json(&result)?;
    } else {
        primectl::output::print_reconciliation(&result);
    }

    if config.journal.enabled {
        let (priority, message) = primectl::journal::reconciliation_entry(&result);
        primectl::journal::log(priority, &message);
    }

    Ok(())
}
