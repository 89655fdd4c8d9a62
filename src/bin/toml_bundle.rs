use anyhow::Context;
use clap::Parser;
use require_bundler::core::ConfigProvider;
use require_bundler::utils::{logger, validation::Validate};
use require_bundler::{BuildReport, BundleEngine, FsWalker, LocalStorage, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-bundle")]
#[command(about = "Bundle require directives using a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bundle.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show the processing order without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitor());
    logger::init_cli_logger_with_level(args.verbose, monitor_enabled, config.log_level());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if args.dry_run {
        config.set_dry_run(true);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::new(config.out_dir().unwrap_or(config.root()));
    let engine = BundleEngine::new_with_monitoring(FsWalker::new(), storage, monitor_enabled)
        .with_dry_run(config.dry_run());

    let report = engine
        .run(Path::new(config.root()))
        .with_context(|| format!("bundle '{}' failed", config.name()))?;

    if report.dry_run {
        display_plan(&report);
    } else {
        println!(
            "✅ Bundled {} files ({} changed, {} failed)",
            report.written,
            report.changed_count(),
            report.write_failures.len()
        );
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Bundle: {}", config.name());
    println!("  Root: {}", config.root());
    println!(
        "  Output: {}",
        config.out_dir().unwrap_or("(in place)")
    );
    if config.dry_run() {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

fn display_plan(report: &BuildReport) {
    println!("🔍 Processing order:");
    for (position, module) in report.modules.iter().enumerate() {
        let marker = if module.changed { "*" } else { " " };
        println!(
            "  {:>3}. {} {} ({})",
            position + 1,
            marker,
            module.id,
            module.relative_path.display()
        );
    }
    println!();
    println!(
        "{} of {} files would change. Run without --dry-run to write them.",
        report.changed_count(),
        report.modules.len()
    );
}
