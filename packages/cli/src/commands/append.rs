use crate::commands::{open_document, resolve_path, FileSink};
use anyhow::{anyhow, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;
use folio_blocks::{Block, HeadingLevel};
use folio_editor::EditorOptions;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("kind").args(["heading", "bullet", "numbered", "check"])))]
pub struct AppendArgs {
    /// Snapshot file (created if missing)
    pub file: String,

    /// Block text
    pub text: String,

    /// Heading of the given level (1-3)
    #[arg(long, value_name = "LEVEL")]
    pub heading: Option<u8>,

    /// Bullet list item
    #[arg(long)]
    pub bullet: bool,

    /// Numbered list item
    #[arg(long)]
    pub numbered: bool,

    /// Checklist item
    #[arg(long)]
    pub check: bool,
}

impl AppendArgs {
    fn block(&self) -> Result<Block> {
        let text = self.text.clone();
        let block = if let Some(level) = self.heading {
            Block::heading(HeadingLevel::try_from(level).map_err(|e| anyhow!(e))?, text)
        } else if self.bullet {
            Block::bullet(text)
        } else if self.numbered {
            Block::numbered(text)
        } else if self.check {
            Block::check(text, false)
        } else {
            Block::paragraph(text)
        };
        Ok(block)
    }
}

pub fn append(args: AppendArgs, cwd: &str) -> Result<()> {
    let path = resolve_path(cwd, &args.file);
    let block = args.block()?;

    let mut engine = open_document(&path, EditorOptions::default())?;
    let sink = FileSink::attach(&mut engine, path.clone());

    let id = block.id.clone();
    let kind = block.kind.type_name();
    engine.append(block)?;
    sink.finish()?;

    println!(
        "  {} Appended {} {} to {}",
        "✓".green(),
        kind,
        id.to_string().dimmed(),
        args.file
    );
    Ok(())
}
