use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod contents_json;
mod emit;
mod error;
mod resample;
mod synth;

#[derive(Debug, Parser)]
#[clap(
    name = "icon-synth",
    about = "Procedurally render a hub-and-spoke app icon and export platform size variants"
)]
struct Args {
    /// Optional square source image used instead of the procedural design
    /// (e.g. a pre-rasterized vector drawing).
    #[clap(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "./icons")]
    output: PathBuf,

    /// Custom PNG icon sizes to generate. When set, only these sizes are generated.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    png: Option<Vec<u32>>,

    /// Generate icons for iOS (AppIcon set plus Contents.json)
    #[clap(long)]
    ios: bool,

    /// Generate icons for Android (mipmap launcher densities)
    #[clap(long)]
    android: bool,

    /// Generate icons for web/PWA (Icon-192, Icon-512 and maskable variants)
    #[clap(long)]
    web: bool,

    /// Generate the Windows ICO file
    #[clap(long)]
    windows: bool,

    /// Generate the macOS ICNS file
    #[clap(long)]
    macos: bool,

    /// The background color iOS icons are flattened onto (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    ios_color: String,

    /// Gradient color at the top-left corner (CSS color format)
    #[clap(long, default_value = "#6366f1")]
    gradient_start: String,

    /// Gradient color at the bottom-right corner (CSS color format)
    #[clap(long, default_value = "#4f46e5")]
    gradient_end: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    emit::generate_icons(&args)
}
