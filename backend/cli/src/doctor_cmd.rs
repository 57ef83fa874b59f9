//! CLI Doctor Command
//!
//! Validates the loaded configuration and checks the persona documents exist.

use anyhow::Result;

use folio_config::FolioConfig;

/// Executes the full doctor diagnosis.
pub fn run(config: &FolioConfig) -> Result<()> {
    println!("\n🔍 Running Folio Doctor...\n");

    let report = folio_config::validate(config);
    println!("Configuration:");
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("  🟢 no findings");
    }

    println!("\nEffective config (secrets masked):");
    let view = folio_config::redact(&serde_json::to_value(config)?);
    println!("{}", serde_json::to_string_pretty(&view)?);

    println!();
    if report.is_valid() {
        println!("✅ Configuration is usable.");
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
    }

    Ok(())
}
