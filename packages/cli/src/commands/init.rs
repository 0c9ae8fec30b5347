use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_blocks::{to_snapshot, Block, BlockTree, HeadingLevel};
use folio_intake::AcceptanceConfig;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory uploaded assets are copied into
    #[arg(short, long, default_value = "uploads")]
    pub store_dir: String,

    /// Largest accepted asset, in bytes
    #[arg(long)]
    pub max_bytes: Option<u64>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio workspace...".bright_blue().bold());

    let store_dir = PathBuf::from(cwd).join(&args.store_dir);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), args.store_dir);
    }

    // Starter document
    let welcome = PathBuf::from(cwd).join("welcome.json");
    if !welcome.exists() {
        let tree = BlockTree::from_blocks(vec![
            Block::heading(HeadingLevel::default(), "Welcome"),
            Block::paragraph("Start writing here."),
            Block::image(""),
        ]);
        fs::write(&welcome, to_snapshot(&tree)?)?;
        println!("  {} Created welcome.json", "✓".green());
    }

    let config = Config {
        store_dir: args.store_dir.clone(),
        public_base_url: None,
        acceptance: AcceptanceConfig {
            max_bytes: args.max_bytes,
            ..AcceptanceConfig::default()
        },
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: folio render welcome.json");
    println!("  2. Run: folio append welcome.json \"Hello\"");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_blocks::parse_snapshot;

    #[test]
    fn test_init_writes_config_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        init(
            InitArgs {
                store_dir: "assets".to_string(),
                max_bytes: Some(5_000_000),
                force: false,
            },
            cwd,
        )
        .unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.store_dir, "assets");
        assert_eq!(config.acceptance.max_bytes, Some(5_000_000));
        assert!(dir.path().join("assets").is_dir());

        let welcome = fs::read_to_string(dir.path().join("welcome.json")).unwrap();
        assert_eq!(parse_snapshot(&welcome).unwrap().len(), 3);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"storeDir":"mine"}"#).unwrap();

        init(
            InitArgs {
                store_dir: "uploads".to_string(),
                max_bytes: None,
                force: false,
            },
            cwd,
        )
        .unwrap();

        assert_eq!(Config::load(cwd).unwrap().store_dir, "mine");
    }
}
