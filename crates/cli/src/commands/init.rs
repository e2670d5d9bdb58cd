//! `askdesk init` — Write a default config file.

use std::path::Path;

use askdesk_config::AppConfig;

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path);

    if path.exists() {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete it and re-run init.");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Created {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set ASKDESK_API_KEY (or OPENROUTER_API_KEY) in your environment or .env");
    println!("   2. Run: askdesk serve");

    Ok(())
}
