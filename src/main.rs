use std::{
    env,
    error::Error,
    path::{Path, PathBuf},
};

use blit::{BlitArea, ColorKey, PaletteOffset, PixelFormat, Point, Rect, Surface};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tileblit [--json] [--log-dir <DIR>]";

const CANVAS_WIDTH: u16 = 40;
const CANVAS_HEIGHT: u16 = 24;

/// Background color of the canvas (bank 0, index 1).
const BACKGROUND: u8 = 0x01;

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    json: bool,
    log_dir: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options, Box<dyn Error>> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--log-dir" => {
                let dir = args.next().ok_or("--log-dir needs a directory")?;
                options.log_dir = Some(PathBuf::from(dir));
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    Ok(options)
}

/// Logs go to stderr, or to `<dir>/tileblit.log` when a directory is given,
/// so that stdout only carries the rendered canvas.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(dir) = log_dir {
        let appender = tracing_appender::rolling::never(dir, "tileblit.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

/// A 16x8 4bpp sheet holding two tiles: a ball on a transparent (0)
/// background, and a two-color checker.
fn build_sheet() -> Result<Surface, Box<dyn Error>> {
    let mut sheet = Surface::blank(16, 8, PixelFormat::Indexed4)?;

    // Ball: a filled square with the corners cut, plus a highlight.
    blit::fill(&mut sheet, Rect::new(2, 0, 4, 8), 0x2);
    blit::fill(&mut sheet, Rect::new(0, 2, 8, 4), 0x2);
    blit::fill(&mut sheet, Rect::new(1, 1, 6, 6), 0x2);
    blit::fill(&mut sheet, Rect::new(2, 2, 2, 2), 0xF);

    // Checker, 2x2 squares.
    blit::fill(&mut sheet, Rect::new(8, 0, 8, 8), 0x6);
    for y in (0..8).step_by(2) {
        for x in (8 + (y % 4)..16).step_by(4) {
            blit::fill(&mut sheet, Rect::new(x, y, 2, 2), 0x7);
        }
    }

    Ok(sheet)
}

fn compose(sheet: &Surface) -> Result<Surface, Box<dyn Error>> {
    let ball = Point::new(0, 0);
    let checker = Point::new(8, 0);

    // Ball stamped on the checker, still in 4bpp.
    let mut scratch = Surface::blank(8, 8, PixelFormat::Indexed4)?;
    blit::blit_4bit_opaque(sheet, &mut scratch, BlitArea::new(checker, Point::new(0, 0), 8, 8));
    blit::blit_4bit(
        sheet,
        &mut scratch,
        BlitArea::new(ball, Point::new(0, 0), 8, 8),
        ColorKey::new(0),
    );

    let mut canvas = Surface::blank(CANVAS_WIDTH, CANVAS_HEIGHT, PixelFormat::Indexed8)?;
    let bounds = canvas.bounds();
    blit::fill(&mut canvas, bounds, BACKGROUND);

    // A row of balls, one palette bank each, the last one running off the
    // right edge.
    let row = Point::new(2, 2);
    for (i, bank) in (1..=5_u8).enumerate() {
        let step = Point::new(u16::try_from(i * 9)?, 0);
        blit::blit_4bit_to_8bit(
            sheet,
            &mut canvas,
            BlitArea::new(ball, row + step, 8, 8),
            ColorKey::new(0),
            PaletteOffset::new(bank),
        );
    }

    // The composed tile, opaque, in bank 6.
    blit::blit_4bit_to_8bit(
        &scratch,
        &mut canvas,
        BlitArea::new(Point::new(0, 0), Point::new(4, 13), 8, 8),
        ColorKey::DISABLED,
        PaletteOffset::new(6),
    );

    tracing::info!(
        "composed {}x{} canvas from a {}x{} sheet",
        canvas.width(),
        canvas.height(),
        sheet.width(),
        sheet.height()
    );

    Ok(canvas)
}

fn render_hex(surface: &Surface) -> String {
    let width = usize::from(surface.width());
    surface
        .to_linear()
        .chunks(width)
        .map(|row| row.iter().map(|p| format!("{p:02x}")).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let _guard = init_tracing(options.log_dir.as_deref());
    tracing::info!("tileblit v{}", env!("CARGO_PKG_VERSION"));

    let sheet = build_sheet()?;
    let canvas = compose(&sheet)?;

    if options.json {
        println!("{}", serde_json::to_string(&canvas)?);
    } else {
        println!("{}", render_hex(&canvas));
    }

    Ok(())
}
