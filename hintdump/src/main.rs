//! Prints automatically hinted glyph outlines.
//!
//! Glyphs are read from a JSON description of the font (see [`FontInput`])
//! and each hinted point is written as `x y on|off` in pixels.

use std::io::Write;
use std::path::PathBuf;

use autohint::{GlyphId, HintError, HintedGlyph, Hinter, HintingOptions, Target};
use clap::Parser;

mod input;

use input::FontInput;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Rendering mode to hint for.
#[derive(clap::ValueEnum, Copy, Clone, Default, Debug)]
enum HintingTarget {
    /// Smooth hinting on both axes.
    #[default]
    Normal,
    /// Vertical hinting only.
    Light,
    /// Snap all stems to whole pixels.
    Mono,
    /// Horizontal subpixel rendering.
    Lcd,
    /// Vertical subpixel rendering.
    VerticalLcd,
}

impl From<HintingTarget> for Target {
    fn from(value: HintingTarget) -> Self {
        match value {
            HintingTarget::Normal => Target::Normal,
            HintingTarget::Light => Target::Light,
            HintingTarget::Mono => Target::Mono,
            HintingTarget::Lcd => Target::Lcd,
            HintingTarget::VerticalLcd => Target::VerticalLcd,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Hint a glyph and print its points
    Hint {
        /// JSON file describing the font
        #[arg(long)]
        glyphs: PathBuf,
        /// Identifier of the glyph to hint
        #[arg(long)]
        glyph: u32,
        /// Size in pixels per em
        #[arg(long)]
        ppem: f32,
        /// The hinting target
        #[arg(long, value_enum, default_value_t)]
        target: HintingTarget,
        /// Keep the vertical scale instead of fitting the x-height to the
        /// pixel grid
        #[arg(long)]
        no_x_height_adjust: bool,
    },
    /// Print the design metrics of the font as JSON
    Metrics {
        /// JSON file describing the font
        #[arg(long)]
        glyphs: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid font description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Hinting failed: {0}")]
    Hint(#[from] HintError),
    #[error("Unable to write output: {0}")]
    Output(std::io::Error),
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    match args.command {
        Command::Hint {
            glyphs,
            glyph,
            ppem,
            target,
            no_x_height_adjust,
        } => {
            let (source, mut globals) = FontInput::load(&glyphs)?.into_font()?;
            let options = HintingOptions {
                target: target.into(),
                x_height_adjust: !no_x_height_adjust,
            };
            log::info!("hinting glyph {glyph} from {glyphs:?} with {options:?}");
            let hinted =
                Hinter::new(options).hint(&source, &mut globals, GlyphId::new(glyph), ppem)?;
            write_glyph(&mut out, &hinted).map_err(CliError::Output)?;
        }
        Command::Metrics { glyphs } => {
            let (_, globals) = FontInput::load(&glyphs)?.into_font()?;
            let json = serde_json::to_string_pretty(globals.design())?;
            writeln!(out, "{json}").map_err(CliError::Output)?;
        }
    }
    Ok(())
}

/// Writes the points of each contour followed by the metrics.
///
/// Contours are separated by an empty line.
fn write_glyph(out: &mut impl Write, glyph: &HintedGlyph) -> std::io::Result<()> {
    let mut start = 0;
    for (contour_ix, &end) in glyph.contour_ends.iter().enumerate() {
        if contour_ix > 0 {
            writeln!(out)?;
        }
        let end = end as usize + 1;
        for point in glyph.points.get(start..end).unwrap_or_default() {
            let tag = if point.on_curve { "on" } else { "off" };
            writeln!(out, "{} {} {tag}", point.x.to_f32(), point.y.to_f32())?;
        }
        start = end;
    }
    writeln!(out, "advance {}", glyph.advance_width.to_f32())?;
    writeln!(out, "lsb_delta {}", glyph.lsb_delta.to_f32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohint::HintedPoint;
    use font_types::F26Dot6;

    fn point(x: i32, y: i32, on_curve: bool) -> HintedPoint {
        HintedPoint {
            x: F26Dot6::from_bits(x),
            y: F26Dot6::from_bits(y),
            on_curve,
        }
    }

    #[test]
    fn contours_are_separated() {
        let glyph = HintedGlyph {
            points: vec![
                point(0, 0, true),
                point(64, 32, false),
                point(128, 0, true),
                point(-64, 640, true),
            ],
            contour_ends: vec![2, 3],
            lsb_delta: F26Dot6::from_bits(64),
            advance_width: F26Dot6::from_bits(320),
        };
        let mut out = Vec::new();
        write_glyph(&mut out, &glyph).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 0 on\n1 0.5 off\n2 0 on\n\n-1 10 on\nadvance 5\nlsb_delta 1\n"
        );
    }
}
