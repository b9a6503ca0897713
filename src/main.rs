use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use tracing::error;
use url::Url;
use vintage_gallery::{
    collection::CollectionStore,
    config::GalleryConfig,
    ingest::{ImagePipeline, SelectedFile},
    store::http::HttpRecordStore,
    uploader::{SubmitOutcome, UploadFormController},
    view,
};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "VINTAGE_GALLERY_CONFIG")]
    config: Option<PathBuf>,
    #[clap(short, long, env = "VINTAGE_GALLERY_BACKEND_URL")]
    backend_url: Option<Url>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the collection.
    List,
    /// Add an artwork and show the refreshed collection.
    Upload {
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        artist: String,
        #[clap(long, default_value = "")]
        description: String,
        /// Comma separated.
        #[clap(long, default_value = "")]
        tags: String,
        #[clap(long)]
        image: PathBuf,
    },
}

async fn load_config(opts: &Opts) -> anyhow::Result<GalleryConfig> {
    let mut config = match (&opts.config, &opts.backend_url) {
        (Some(path), _) => GalleryConfig::from_file(path)
            .await
            .with_context(|| format!("load config from {}", path.display()))?,
        (None, Some(url)) => GalleryConfig::new(url.clone()),
        (None, None) => return Err(anyhow!("either --config or --backend-url is required")),
    };
    if let Some(url) = &opts.backend_url {
        config.backend_url = url.clone();
    }
    Ok(config)
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = load_config(&opts).await?;
    let store = HttpRecordStore::new(&config).with_context(|| "build record store client")?;
    let collection = Arc::new(CollectionStore::new(store));
    let pipeline = Arc::new(ImagePipeline::new(&config));

    match opts.command {
        Command::List => {
            collection.load().await.with_context(|| "load gallery")?;
        }
        Command::Upload {
            title,
            artist,
            description,
            tags,
            image,
        } => {
            let mut uploader = UploadFormController::new(collection.clone(), pipeline);
            uploader.open();
            uploader.set_title(title);
            uploader.set_artist(artist);
            uploader.set_description(description);
            uploader.set_tags_raw(tags);
            uploader
                .attach_image(&SelectedFile::Path(image))
                .await
                .with_context(|| "attach image")?;
            print!("{}", view::render_uploader(uploader.state()));
            match uploader.submit().await.with_context(|| "upload artwork")? {
                SubmitOutcome::Created => {}
                SubmitOutcome::Incomplete => return Err(anyhow!("title and image are required")),
            }
        }
    }
    print!("{}", view::render_collection(&collection.snapshot()));
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(?e, "failed to start runtime");
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(run(opts)) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
