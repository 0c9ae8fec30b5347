use crate::commands::{open_document, resolve_path};
use anyhow::Result;
use clap::Args;
use folio_editor::{outline, EditorOptions};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Snapshot file
    pub file: String,

    /// Print the normalized snapshot instead of the outline
    #[arg(long)]
    pub json: bool,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let path = resolve_path(cwd, &args.file);
    let engine = open_document(&path, EditorOptions::default().read_only())?;

    if args.json {
        println!("{}", engine.snapshot()?);
    } else {
        print!("{}", outline(&engine.render()));
    }

    Ok(())
}
