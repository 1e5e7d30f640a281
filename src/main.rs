use std::collections::HashMap;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use slidedeck::api::ApiError;
use slidedeck::api::http::HttpApi;
use slidedeck::auth::SessionToken;
use slidedeck::config::{ConfigError, EditorConfig};
use slidedeck::editor::Editor;
use slidedeck::error::StoreError;
use slidedeck::geometry::Point;
use slidedeck::model::{BackgroundPatch, ElementId, ElementType, PresentationId, SlideId};
use slidedeck::notify::TracingNotifier;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unknown element type `{0}`")]
    UnknownElementType(String),
    #[error("slide {0} not found")]
    UnknownSlide(SlideId),
    #[error("presentation has no slides")]
    NoActiveSlide,
    #[error("pass --color, --image or --clear-image")]
    MissingBackground,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "slidedeck", about = "Edit a presentation on a slidedeck server")]
struct Cli {
    #[arg(long, env = "SLIDEDECK_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "SLIDEDECK_TOKEN")]
    token: Option<String>,

    /// Presentation to open.
    #[arg(long, short)]
    presentation: PresentationId,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the presentation as JSON.
    Show,
    /// Append an empty slide.
    AddSlide,
    DeleteSlide {
        slide: SlideId,
    },
    /// Reorder slides, e.g. `reorder 3,1,2`.
    Reorder {
        #[arg(value_delimiter = ',', required = true)]
        order: Vec<SlideId>,
    },
    Rename {
        title: String,
    },
    /// Add TEXT, IMAGE, YOUTUBE_VIDEO, UPLOADED_VIDEO or AUDIO.
    AddElement {
        element_type: String,
        content: Option<String>,
        /// Target slide; defaults to the first slide.
        #[arg(long)]
        slide: Option<SlideId>,
    },
    /// Move an element's top-left corner.
    Move {
        slide: SlideId,
        element: ElementId,
        x: f64,
        y: f64,
    },
    Background {
        slide: SlideId,
        #[arg(long, conflicts_with_all = ["image", "clear_image"])]
        color: Option<String>,
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<String>,
        #[arg(long)]
        clear_image: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let mut config = EditorConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_owned();
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }

    let credentials = Arc::new(SessionToken::new(config.token.clone()));
    let api = Arc::new(HttpApi::new(&config, credentials)?);
    let mut editor = Editor::new(api, Arc::new(TracingNotifier), config.debounce);
    editor.load(cli.presentation).await?;

    let result = run(&mut editor, cli.command).await;
    editor.close().await;
    result
}

async fn run(editor: &mut Editor, command: Command) -> Result<(), CliError> {
    match command {
        Command::Show => print_json(&editor.store().presentation()),
        Command::AddSlide => {
            if let Some(id) = editor.add_slide().await? {
                println!("{id}");
            }
            Ok(())
        }
        Command::DeleteSlide { slide } => Ok(editor.delete_slide(slide).await?),
        Command::Reorder { order } => Ok(editor.reorder_slides(&order).await?),
        Command::Rename { title } => Ok(editor.rename(&title).await?),
        Command::AddElement { element_type, content, slide } => {
            let kind = ElementType::parse(&element_type).ok_or(CliError::UnknownElementType(element_type))?;
            if let Some(slide) = slide {
                select(editor, slide)?;
            }
            let id = editor.add_element(kind, content).await?.ok_or(CliError::NoActiveSlide)?;
            println!("{id}");
            Ok(())
        }
        Command::Move { slide, element, x, y } => {
            select(editor, slide)?;
            editor.move_elements(HashMap::from([(element, Point::new(x, y))]));
            Ok(())
        }
        Command::Background { slide, color, image, clear_image } => {
            let patch = match (color, image, clear_image) {
                (Some(hex), _, _) => BackgroundPatch::Color(hex),
                (None, Some(url), _) => BackgroundPatch::Image(Some(url)),
                (None, None, true) => BackgroundPatch::Image(None),
                (None, None, false) => return Err(CliError::MissingBackground),
            };
            Ok(editor.set_background(slide, &patch).await?)
        }
    }
}

fn select(editor: &mut Editor, slide: SlideId) -> Result<(), CliError> {
    if editor.select_slide(slide) { Ok(()) } else { Err(CliError::UnknownSlide(slide)) }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
