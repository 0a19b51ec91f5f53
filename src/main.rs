//! `dungeon-map` binary: export layout pages to images or preview them in
//! the terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dungeon_map::config::{load_layout, load_map_state, ExportConfig};
use dungeon_map::engine::PageManager;
use dungeon_map::term::{FrameBuffer, PageView, TerminalRenderer, Viewport};

#[derive(Debug, Parser)]
#[command(name = "dungeon-map", version, about = "Render layered dungeon maps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write one image per layer as `<stem>_Z=<layer><ext>`.
    Render {
        /// Layout JSON file.
        layout: PathBuf,
        /// Output path; `.png`, `.jpg` or `.jpeg`.
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fog-of-war state JSON; without it everything is drawn.
        #[arg(long)]
        state: Option<PathBuf>,
        /// Onion-skin focus depth.
        #[arg(long, allow_hyphen_values = true)]
        depth: Option<f32>,
    },
    /// Browse layers interactively (Up/Down to change layer, q to quit).
    Preview {
        layout: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        state: Option<PathBuf>,
        /// Layer to start on; defaults to the lowest.
        #[arg(long, allow_hyphen_values = true)]
        layer: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Command::Render { .. } => "info",
        // Log lines would tear the alternate screen.
        Command::Preview { .. } => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Render {
            layout,
            output,
            config,
            state,
            depth,
        } => render(&layout, &output, config.as_deref(), state.as_deref(), depth),
        Command::Preview {
            layout,
            config,
            state,
            layer,
        } => preview(&layout, config.as_deref(), state.as_deref(), layer),
    }
}

fn load(
    layout: &Path,
    config: Option<&Path>,
    state: Option<&Path>,
) -> Result<(ExportConfig, PageManager)> {
    let config = match config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    let layout = Arc::new(load_layout(layout)?);
    let states = state.map(load_map_state).transpose()?;

    let mut pages = config.build_manager()?;
    let stats = pages.bind(layout, states);
    info!(
        pages = pages.len(),
        cells = stats.cells_drawn,
        hidden = stats.cells_hidden,
        tiles = pages.cache().len(),
        "map drawn"
    );
    Ok((config, pages))
}

fn render(
    layout: &Path,
    output: &Path,
    config: Option<&Path>,
    state: Option<&Path>,
    depth: Option<f32>,
) -> Result<()> {
    let (config, mut pages) = load(layout, config, state)?;

    let written = match depth.or(config.onion.depth) {
        Some(depth) => {
            if let Some(d) = config.onion.skin().apply(&mut pages, depth) {
                info!(depth = d, "onion skin applied");
            }
            pages.save_images_presented(output)
        }
        None => pages.save_images(output),
    }
    .with_context(|| format!("writing pages to {}", output.display()))?;

    if written.is_empty() {
        info!("layout has no rooms, nothing written");
    }
    Ok(())
}

fn preview(
    layout: &Path,
    config: Option<&Path>,
    state: Option<&Path>,
    layer: Option<i32>,
) -> Result<()> {
    let (config, mut pages) = load(layout, config, state)?;
    anyhow::ensure!(!pages.is_empty(), "layout has no rooms to preview");

    let mut focus = layer
        .and_then(|z| pages.layers().iter().position(|&l| l == z))
        .unwrap_or(0);

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run_preview(&mut term, &config, &mut pages, &mut focus);
    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run_preview(
    term: &mut TerminalRenderer,
    config: &ExportConfig,
    pages: &mut PageManager,
    focus: &mut usize,
) -> Result<()> {
    let view = PageView::default();
    let skin = config.onion.skin();
    let name = pages
        .layout()
        .map(|l| l.name.clone())
        .unwrap_or_default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut dirty = true;

    loop {
        if dirty {
            let z = pages.layers()[*focus];
            skin.apply(pages, z as f32);
            let status = format!(
                " {name}  Z={z}  [{}/{}]  Up/Down: layer  q: quit",
                *focus + 1,
                pages.len()
            );
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into(&pages.presented(*focus), &status, Viewport::new(w, h), &mut fb);
            term.draw(&fb)?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Up if *focus + 1 < pages.len() => {
                    *focus += 1;
                    dirty = true;
                }
                KeyCode::Down if *focus > 0 => {
                    *focus -= 1;
                    dirty = true;
                }
                _ => {}
            },
            Event::Resize(..) => {
                term.invalidate();
                dirty = true;
            }
            _ => {}
        }
    }
}
