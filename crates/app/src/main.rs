use anyhow::Context;
use clap::Parser;
use fltk::prelude::{GroupExt, MenuExt, WidgetExt};

mod args;
mod logging;

const MENU_HEIGHT: i32 = 30;
const MIN_WIDTH: i32 = 640;
const MIN_HEIGHT: i32 = 480;

pub fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();

    let _guard = logging::init();
    let config = view_core::config::load_from(args.config.clone());
    let view_options = config.view_options();

    tracing::info!(target: "config", source = ?config.source, ?view_options, "config_loaded");

    let app = fltk::app::App::default();
    let view = view_core::viewport::ViewportWindow::open(
        &args.file,
        Box::new(renderer::shaper::FontShaper::from_options(&view_options)),
        &config.options(),
    )
    .with_context(|| format!("failed to index {}", args.file.display()))?;

    let w = i32::try_from(view_options.width).unwrap_or(MIN_WIDTH).max(MIN_WIDTH);
    let h = i32::try_from(view_options.height).unwrap_or(MIN_HEIGHT).max(MIN_HEIGHT);
    let title = format!("mulberry - {}", args.file.display());

    let mut win = fltk::window::Window::default()
        .with_size(w, h + MENU_HEIGHT)
        .with_label(&title);
    let mut viewer = ui::ViewerWidget::new(0, MENU_HEIGHT, w, h, view);
    let mut menu = fltk::menu::MenuBar::default().with_size(w, MENU_HEIGHT);

    win.resizable(&viewer.canvas);

    menu.add(
        "File/Quit",
        fltk::enums::Shortcut::Ctrl | 'q',
        fltk::menu::MenuFlag::Normal,
        move |_| app.quit(),
    );

    win.end();
    win.show();

    app.run().context("event loop failed")?;
    viewer.close();

    Ok(())
}
