//! `askdesk doctor` — Diagnose configuration and history file.

use std::path::Path;

use askdesk_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Askdesk Doctor");
    println!("=================\n");

    let mut issues = 0;

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚠️  No config file at {}; using defaults (run `askdesk init`)", path.display());
    }

    let config = match AppConfig::load(Some(&path)) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and re-run doctor.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
        match askdesk_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider {} reachable", provider.name()),
                Ok(false) => {
                    println!("  ⚠️  Provider {} rejected the health check", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider {} unreachable: {e}", provider.name());
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Provider could not be built: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No API key: set ASKDESK_API_KEY, OPENROUTER_API_KEY or OPENAI_API_KEY");
        issues += 1;
    }

    println!(
        "  ✅ Knowledge base: {} entries, threshold {}",
        config.knowledge.len(),
        config.matching.threshold
    );

    match history_status(&config.history.path) {
        Ok(note) => println!("  ✅ History file {} ({note})", config.history.path.display()),
        Err(reason) => {
            println!(
                "  ❌ History file {} is not writable: {reason}",
                config.history.path.display()
            );
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Check that appends to `path` would succeed, without creating anything.
fn history_status(path: &Path) -> Result<&'static str, String> {
    if path.is_dir() {
        return Err("path is a directory".into());
    }

    if path.exists() {
        let metadata = std::fs::metadata(path).map_err(|e| e.to_string())?;
        if metadata.permissions().readonly() {
            return Err("file is read-only".into());
        }
        return Ok("exists");
    }

    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) if parent.is_file() => Err(format!("{} is a file", parent.display())),
        Some(parent) if !parent.exists() => Ok("will be created with its directory"),
        _ => Ok("will be created"),
    }
}
