use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tee_mockup::{
    CanvasConfig, DEFAULT_EXPORT_NAME, Designer, FileStore, FontFamily, HexColor, ImageSource,
    Persistable, Point, StyleFlag,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tee-mockup", version, about = "Edit and render t-shirt mockups")]
struct Cli {
    /// Directory the design snapshot is kept in between runs.
    #[arg(long, default_value = ".tee-mockup")]
    store: PathBuf,
    /// JSON canvas config.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the saved design as JSON, image data elided.
    Show,
    /// Set the text printed on the shirt.
    Text { content: String },
    /// Set the text color.
    Color { hex: String },
    /// Set the shirt color.
    Shirt { hex: String },
    /// Select the text font: Arial, Georgia, "Courier New" or "Times New Roman".
    Font { font: FontFamily },
    /// Toggle bold, italic or underline.
    Style { flag: StyleFlag },
    /// Move the text anchor.
    TextPos { x: f32, y: f32 },
    /// Add an image file as the top layer.
    AddImage { path: PathBuf },
    /// Rotate a layer clockwise.
    Rotate {
        index: usize,
        #[arg(default_value_t = 15.0, allow_negative_numbers = true)]
        degrees: f32,
    },
    /// Mirror a layer horizontally.
    Flip { index: usize },
    /// Move a layer from one position in the stack to another.
    Move { from: usize, to: usize },
    /// Delete a layer.
    Remove { index: usize },
    /// Render the design to a PNG file.
    Render {
        #[arg(long, default_value = DEFAULT_EXPORT_NAME)]
        out: PathBuf,
    },
    /// Clear the design.
    Reset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CanvasConfig::from_json(&fs::read_to_string(path)?)?,
        None => CanvasConfig::default(),
    };
    let mut designer = Designer::open(config, Box::new(FileStore::new(&cli.store)));
    let read_only = matches!(cli.command, Command::Show | Command::Render { .. });

    match cli.command {
        Command::Show => {
            let mut state = designer.export_state();
            for image in &mut state.images {
                image.data.clear();
            }
            println!("{}", state.to_json_pretty()?);
        }
        Command::Text { content } => {
            designer.set_text(content);
        }
        Command::Color { hex } => {
            designer.set_text_color(HexColor::parse(&hex)?);
        }
        Command::Shirt { hex } => {
            designer.set_shirt_color(HexColor::parse(&hex)?);
        }
        Command::Font { font } => {
            designer.set_font(font);
        }
        Command::Style { flag } => designer.toggle_style(flag),
        Command::TextPos { x, y } => {
            designer.set_text_position(Point::new(x, y));
        }
        Command::AddImage { path } => {
            let mut source = ImageSource::new(fs::read(&path)?);
            source.name = path.file_name().map(|name| name.to_string_lossy().into_owned());
            let index = designer.add_image(source)?;
            println!("layer {index}");
        }
        Command::Rotate { index, degrees } => designer.rotate_image(index, degrees)?,
        Command::Flip { index } => designer.flip_image(index)?,
        Command::Move { from, to } => {
            designer.move_layer(from, to)?;
        }
        Command::Remove { index } => {
            designer.remove_layer(index)?;
        }
        Command::Render { out } => {
            designer.export_to(&out)?;
            println!("{}", out.display());
        }
        Command::Reset => designer.reset(),
    }

    // Autosave only logs failures; surface them here.
    if !read_only {
        designer.save()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_or_style_is_a_usage_error() {
        assert!(Cli::try_parse_from(["tee-mockup", "font", "Comic Sans MS"]).is_err());
        assert!(Cli::try_parse_from(["tee-mockup", "style", "strike"]).is_err());

        let cli = Cli::try_parse_from(["tee-mockup", "font", "Courier New"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Font {
                font: FontFamily::CourierNew
            }
        ));
        let cli = Cli::try_parse_from(["tee-mockup", "style", "underline"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Style {
                flag: StyleFlag::Underline
            }
        ));
    }
}
