use crate::commands::{open_document, resolve_path, FileSink};
use crate::config::Config;
use crate::media::media_type_for;
use crate::store::DirectoryStore;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{AssetStatus, EditorOptions, MediaView};
use folio_intake::FileCandidate;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// Snapshot file
    pub file: String,

    /// Id of the media block to fill
    #[arg(short, long)]
    pub block: String,

    /// Local file to upload
    pub asset: String,
}

pub async fn attach(args: AttachArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve_path(cwd, &args.file);
    let asset_path = resolve_path(cwd, &args.asset);

    let store = DirectoryStore::new(config.get_store_dir(cwd), config.public_base_url.clone());
    let options = EditorOptions::new(Arc::new(store)).with_acceptance(config.acceptance.clone());

    let mut engine = open_document(&path, options)?;
    let sink = FileSink::attach(&mut engine, path.clone());

    let data = tokio::fs::read(&asset_path).await?;
    let name = asset_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Not a file: {}", asset_path.display()))?;
    let file = FileCandidate::new(name, media_type_for(&asset_path), data);

    println!("{} {}", "⬆️  Uploading".bright_blue().bold(), args.asset);

    let pending = engine
        .resolve_embedded_asset(&args.block, file)?
        .ok_or_else(|| anyhow!("Document is read-only"))?;
    let resolution = pending.upload().await;
    let stored = engine.complete_embedded_asset(resolution)?;
    sink.finish()?;

    if stored {
        let url = engine
            .render()
            .into_iter()
            .find(|block| block.id.as_str() == args.block)
            .and_then(|block| block.media)
            .and_then(|(_, view)| match view {
                MediaView::Remote(url) => Some(url),
                _ => None,
            })
            .unwrap_or_default();
        println!("  {} {} → {}", "✓".green(), args.block, url);
        return Ok(());
    }

    match engine.asset_status(&args.block) {
        Some(AssetStatus::Failed(reason)) => Err(anyhow!("{}", reason)),
        _ => Err(anyhow!("Asset for {} was discarded", args.block)),
    }
}
