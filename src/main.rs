use clap::Parser;
use require_bundler::core::ConfigProvider;
use require_bundler::utils::error::ErrorSeverity;
use require_bundler::utils::{logger, validation::Validate};
use require_bundler::{BundleEngine, BundleError, CliConfig, FsWalker, LocalStorage};
use std::path::Path;

fn main() {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose, config.monitor);
    } else {
        logger::init_cli_logger(config.verbose, config.monitor);
    }

    tracing::info!("Starting require-bundler");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.resolve_root(std::io::stdin().lock()) {
        fail(&e);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let root = Path::new(config.root());
    let storage = LocalStorage::new(config.out_dir().unwrap_or(config.root()));
    let engine = BundleEngine::new_with_monitoring(FsWalker::new(), storage, config.monitor())
        .with_dry_run(config.dry_run());

    match engine.run(root) {
        Ok(report) => {
            if config.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(&BundleError::from(e)),
                }
            }
            if !report.write_failures.is_empty() {
                tracing::warn!("{} file(s) could not be written", report.write_failures.len());
            }
            tracing::info!("✅ Bundle completed for {}", root.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ Bundle failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            fail(&e);
        }
    }
}

fn fail(e: &BundleError) -> ! {
    eprintln!("[Error] {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
