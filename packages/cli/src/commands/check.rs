use crate::commands::resolve_path;
use crate::config::DEFAULT_CONFIG_NAME;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_blocks::parse_snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot file or directory of snapshots
    #[arg(default_value = ".")]
    pub path: String,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let path = resolve_path(cwd, &args.path);

    let files = if path.is_dir() {
        find_documents(&path)
    } else if path.is_file() {
        vec![path.clone()]
    } else {
        return Err(anyhow!("Path does not exist: {}", path.display()));
    };

    if files.is_empty() {
        println!("{}", "⚠️  No documents found".yellow());
        return Ok(());
    }

    let mut error_count = 0;
    for file in &files {
        let relative_path = file
            .strip_prefix(&path)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(file.as_path());
        match check_file(file) {
            Ok(blocks) => println!(
                "  {} {} ({} blocks)",
                "✓".green(),
                relative_path.display(),
                blocks
            ),
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} {} documents are well-formed", "✅".green(), files.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} documents are malformed", error_count, files.len()))
    }
}

fn check_file(path: &Path) -> Result<usize> {
    let source = fs::read_to_string(path)?;
    Ok(parse_snapshot(&source)?.len())
}

fn find_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension().and_then(|s| s.to_str()) == Some("json")
                && path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/b.json"),
            r#"[{"id":"p","type":"paragraph","content":[],"children":[]}]"#,
        )
        .unwrap();

        let found = find_documents(dir.path());
        assert_eq!(found.len(), 2);
        check(CheckArgs { path: ".".to_string() }, cwd).unwrap();
    }

    #[test]
    fn test_check_reports_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"[{"id":"x","type":"table","children":[]}]"#,
        )
        .unwrap();

        let err = check(CheckArgs { path: "bad.json".to_string() }, cwd).unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
    }
}
