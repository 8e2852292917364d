//! Platform writers: take rasters from the generator and lay them out the
//! way each target platform expects, including the Apple asset catalogs.

use crate::contents_json::{write_contents_json, ImageEntry};
use crate::resample::{Generator, Lanczos, Resampler};
use crate::synth::{self, Palette};
use crate::Args;
use anyhow::{Context, Result};
use icns::{IconFamily, IconType};
use image::{
    codecs::{
        ico::{IcoEncoder, IcoFrame},
        png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    },
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

/// Edge length of the canonical master canvas every other size derives from.
pub const MASTER_SIZE: u32 = synth::DESIGN_SIZE;

#[derive(Debug, Deserialize)]
struct IcnsEntry {
    size: u32,
    ostype: String,
}

pub fn generate_icons(args: &Args) -> Result<()> {
    // Ensure the output directory exists
    create_dir_all(&args.output).context("Can't create output directory")?;

    let palette = build_palette(args)?;

    // Either synthesize the master procedurally or adopt an externally
    // rasterized base image; everything downstream is identical.
    let master = match &args.input {
        Some(path) => load_master(path)?,
        None => synth::synthesize(MASTER_SIZE, &palette)?,
    };
    let generator = Generator::new(master, Lanczos);

    // Keep a canonical master copy next to the derived outputs.
    if let Some(master) = generator.master() {
        save_png(master, &args.output.join(format!("icon_{MASTER_SIZE}.png")))?;
        println!("✓ Generated icon_{MASTER_SIZE}.png");
    }

    // Custom sizes replace the platform sets entirely.
    if let Some(sizes) = &args.png {
        return generate_custom_sizes(&generator, sizes, &args.output);
    }

    let has_platform_flags = args.ios || args.android || args.web || args.windows || args.macos;

    if args.windows || !has_platform_flags {
        generate_ico(&generator, &args.output)?;
    }
    if args.macos || !has_platform_flags {
        generate_icns(&generator, &args.output)?;
    }
    if args.web || !has_platform_flags {
        generate_web_icons(&generator, &args.output)?;
    }
    if args.android || !has_platform_flags {
        generate_android_icons(&generator, &args.output)?;
    }
    if args.ios || !has_platform_flags {
        generate_ios_icons(&generator, &args.output, &args.ios_color)?;
    }

    Ok(())
}

fn build_palette(args: &Args) -> Result<Palette> {
    let defaults = Palette::default();
    Ok(Palette {
        gradient_start: parse_color(&args.gradient_start, "--gradient-start")?,
        gradient_end: parse_color(&args.gradient_end, "--gradient-end")?,
        ..defaults
    })
}

fn parse_color(value: &str, flag: &str) -> Result<Rgba<u8>> {
    let color = css_color::Srgb::from_str(value)
        .map_err(|_| anyhow::anyhow!("Invalid CSS color {value:?} for {flag}"))?;
    Ok(Rgba([
        (color.red * 255.) as u8,
        (color.green * 255.) as u8,
        (color.blue * 255.) as u8,
        255,
    ]))
}

/// Load an externally authored base image to use in place of the procedural
/// master. The source must be square.
fn load_master(path: &Path) -> Result<RgbaImage> {
    let source = image::open(path).context("Failed to load source image")?;

    if source.width() != source.height() {
        anyhow::bail!("Source image must be square (width == height)");
    }

    Ok(source.to_rgba8())
}

fn generate_custom_sizes<R: Resampler>(
    generator: &Generator<R>,
    sizes: &[u32],
    out_dir: &Path,
) -> Result<()> {
    println!("Generating custom PNG sizes...");
    for &size in sizes {
        // One bad size must not abort the remaining ones.
        match generator.raster(size) {
            Ok(raster) => {
                save_png(&raster, &out_dir.join(format!("{size}x{size}.png")))?;
                println!("  ✓ Generated {size}x{size}.png");
            }
            Err(err) => eprintln!("  ✗ Skipped {size}x{size}.png: {err}"),
        }
    }
    Ok(())
}

fn generate_ico<R: Resampler>(generator: &Generator<R>, out_dir: &Path) -> Result<()> {
    println!("Generating icon.ico...");
    let mut frames = Vec::new();

    // Common ICO sizes
    for size in [16, 24, 32, 48, 64, 256] {
        let raster = generator.raster(size)?;

        // Only the 256px layer can be compressed according to the ico specs
        if size == 256 {
            let mut buf = Vec::new();
            write_png(raster.as_raw(), &mut buf, size)?;
            frames.push(IcoFrame::with_encoded(buf, size, size, ColorType::Rgba8)?);
        } else {
            frames.push(IcoFrame::as_png(
                raster.as_raw(),
                size,
                size,
                ColorType::Rgba8,
            )?);
        }
    }

    let mut out_file = BufWriter::new(File::create(out_dir.join("icon.ico"))?);
    let encoder = IcoEncoder::new(&mut out_file);
    encoder.encode_images(&frames)?;
    out_file.flush()?;

    println!("✓ Generated icon.ico");
    Ok(())
}

fn generate_icns<R: Resampler>(generator: &Generator<R>, out_dir: &Path) -> Result<()> {
    println!("Generating icon.icns...");
    let icns_json = r#"
    {
      "16x16": { "size": 16, "ostype": "is32" },
      "16x16@2x": { "size": 32, "ostype": "ic11" },
      "32x32": { "size": 32, "ostype": "il32" },
      "32x32@2x": { "size": 64, "ostype": "ic12" },
      "128x128": { "size": 128, "ostype": "ic07" },
      "128x128@2x": { "size": 256, "ostype": "ic13" },
      "256x256": { "size": 256, "ostype": "ic08" },
      "256x256@2x": { "size": 512, "ostype": "ic14" },
      "512x512": { "size": 512, "ostype": "ic09" },
      "512x512@2x": { "size": 1024, "ostype": "ic10" }
    }
    "#;

    let entries: HashMap<String, IcnsEntry> = serde_json::from_str(icns_json).unwrap();
    let mut family = IconFamily::new();

    for (name, entry) in &entries {
        let raster = generator.raster(entry.size)?;

        let mut buf = Vec::new();
        write_png(raster.as_raw(), &mut buf, entry.size)?;
        let image = icns::Image::read_png(&buf[..])?;

        family
            .add_icon_with_type(
                &image,
                IconType::from_ostype(entry.ostype.parse().unwrap()).unwrap(),
            )
            .with_context(|| format!("Can't add {name} to Icns Family"))?;
    }

    let mut out_file = BufWriter::new(File::create(out_dir.join("icon.icns"))?);
    family.write(&mut out_file)?;
    out_file.flush()?;

    println!("✓ Generated icon.icns");

    // The mac asset catalog points at the per-size PNGs by name.
    let macos_images = build_macos_contents_json(&entries);
    write_contents_json(out_dir, macos_images)?;
    println!("✓ Generated Contents.json");

    Ok(())
}

fn generate_web_icons<R: Resampler>(generator: &Generator<R>, out_dir: &Path) -> Result<()> {
    let web_dir = out_dir.join("web");
    create_dir_all(&web_dir)?;

    println!("Generating web icons...");
    let web_icons = [
        ("Icon-192.png", 192),
        ("Icon-512.png", 512),
        ("Icon-maskable-192.png", 192),
        ("Icon-maskable-512.png", 512),
    ];

    for (filename, size) in web_icons {
        match generator.raster(size) {
            Ok(raster) => {
                save_png(&raster, &web_dir.join(filename))?;
                println!("  ✓ Generated web/{filename}");
            }
            Err(err) => eprintln!("  ✗ Skipped web/{filename}: {err}"),
        }
    }
    Ok(())
}

fn generate_android_icons<R: Resampler>(generator: &Generator<R>, out_dir: &Path) -> Result<()> {
    let android_dir = out_dir.join("android");
    create_dir_all(&android_dir)?;

    println!("Generating Android icons...");

    let densities = [
        ("mdpi", 48),
        ("hdpi", 72),
        ("xhdpi", 96),
        ("xxhdpi", 144),
        ("xxxhdpi", 192),
    ];

    for (density, size) in densities {
        let mipmap_dir = android_dir.join(format!("mipmap-{density}"));
        create_dir_all(&mipmap_dir)?;

        let raster = generator.raster(size)?;
        save_png(&raster, &mipmap_dir.join("ic_launcher.png"))?;
        println!("  ✓ Generated android/mipmap-{density}/ic_launcher.png");

        let round = apply_circular_mask(&raster);
        save_png(&round, &mipmap_dir.join("ic_launcher_round.png"))?;
        println!("  ✓ Generated android/mipmap-{density}/ic_launcher_round.png");
    }

    Ok(())
}

/// Apply a circular mask to produce the round launcher variant.
fn apply_circular_mask(img: &RgbaImage) -> RgbaImage {
    let (width, height) = img.dimensions();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 2.0;

    let mut masked = img.clone();

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > radius {
                masked.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            } else if distance > radius - 1.0 {
                // Soften the rim by one pixel
                let alpha_factor = radius - distance;
                let pixel = masked.get_pixel_mut(x, y);
                pixel[3] = (pixel[3] as f32 * alpha_factor) as u8;
            }
        }
    }

    masked
}

fn generate_ios_icons<R: Resampler>(
    generator: &Generator<R>,
    out_dir: &Path,
    color: &str,
) -> Result<()> {
    let ios_dir = out_dir.join("ios");
    create_dir_all(&ios_dir)?;

    println!("Generating iOS icons...");

    // iOS launcher icons must be opaque, so the rounded-corner transparency
    // is flattened onto a background color.
    let bg_color = parse_color(color, "--ios-color").unwrap_or(Rgba([255, 255, 255, 255]));

    // Track produced files for Contents.json
    let mut images: Vec<ImageEntry> = Vec::new();

    let sizes = [
        (20, vec![1, 2, 3]),
        (29, vec![1, 2, 3]),
        (40, vec![1, 2, 3]),
        (60, vec![2, 3]),
        (76, vec![1, 2]),
        (83, vec![2]), // 83.5 -> 83
        (1024, vec![1]),
    ];

    for (base_size, multipliers) in sizes {
        for multiplier in multipliers {
            let actual_size = base_size * multiplier;
            let filename = if base_size == 1024 {
                "AppIcon-1024x1024.png".to_string()
            } else {
                format!("AppIcon-{base_size}x{base_size}@{multiplier}x.png")
            };

            let raster = generator.raster(actual_size)?;

            let mut flattened = RgbaImage::from_pixel(actual_size, actual_size, bg_color);
            image::imageops::overlay(&mut flattened, &raster, 0, 0);

            save_png(&flattened, &ios_dir.join(&filename))?;
            println!("  ✓ Generated ios/{filename}");

            let idiom = determine_ios_idiom(base_size);
            let size_str = if base_size == 83 {
                "83.5x83.5".to_string() // Special case for 83.5
            } else {
                format!("{base_size}x{base_size}")
            };

            let mut image_entry = ImageEntry::new_app_icon(
                filename,
                idiom,
                size_str,
                format!("{multiplier}x"),
                determine_ios_role(base_size),
            );
            image_entry.expected_size = Some(actual_size.to_string());

            images.push(image_entry);
        }
    }

    write_contents_json(&ios_dir, images)?;
    println!("  ✓ Generated ios/Contents.json");

    Ok(())
}

/// Save a raster as a compressed PNG file.
fn save_png(raster: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_png(raster.as_raw(), &mut writer, raster.width())?;
    writer.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}

/// Determine the appropriate iOS idiom based on the base point size
fn determine_ios_idiom(base_size: u32) -> String {
    match base_size {
        1024 => "ios-marketing".to_string(),
        20 | 29 | 40 | 60 => "iphone".to_string(),
        76 | 83 => "ipad".to_string(),
        _ => "universal".to_string(),
    }
}

/// Determine the role for an iOS icon based on the base point size
fn determine_ios_role(base_size: u32) -> Option<String> {
    match base_size {
        20 => Some("notificationCenter".to_string()),
        29 => Some("companionSettings".to_string()),
        40 => Some("spotlight".to_string()),
        60 | 76 | 83 => Some("appLauncher".to_string()),
        _ => None,
    }
}

/// Build the Vec<ImageEntry> for macOS using the same icns size table.
/// Idiom is "mac", scale is "1x" or "2x" depending on the @2x suffix, and
/// the folder is always "." (same directory as icon.icns).
fn build_macos_contents_json(entries: &HashMap<String, IcnsEntry>) -> Vec<ImageEntry> {
    let mut images = Vec::new();

    for (name, entry) in entries {
        let scale = if name.contains("@2x") {
            "2x".to_string()
        } else {
            "1x".to_string()
        };
        let base_name = name.replace("@2x", "");

        let mut image_entry = ImageEntry::new(
            format!("icon_{}.png", entry.size),
            "mac".to_string(),
            scale,
        )
        .with_folder(".".to_string());
        image_entry.size = Some(base_name);

        images.push(image_entry);
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Palette;

    #[test]
    fn test_ios_idiom_mapping() {
        assert_eq!(determine_ios_idiom(29), "iphone");
        assert_eq!(determine_ios_idiom(76), "ipad");
        assert_eq!(determine_ios_idiom(1024), "ios-marketing");
    }

    #[test]
    fn test_ios_role_mapping() {
        assert_eq!(determine_ios_role(20).unwrap(), "notificationCenter");
        assert_eq!(determine_ios_role(60).unwrap(), "appLauncher");
        assert_eq!(determine_ios_role(1024), None);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#fff", "--test").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#6366f1", "--test").unwrap(), Rgba([99, 102, 241, 255]));
        assert!(parse_color("not-a-color", "--test").is_err());
    }

    #[test]
    fn test_circular_mask_clears_corners_and_keeps_center() {
        let raster = synth::synthesize(96, &Palette::default()).unwrap();
        let round = apply_circular_mask(&raster);
        assert_eq!(round.get_pixel(0, 0)[3], 0);
        assert_eq!(round.get_pixel(95, 95)[3], 0);
        assert_eq!(round.get_pixel(48, 48)[3], 255);
    }

    #[test]
    fn test_macos_contents_entries_cover_the_size_table() {
        let mut entries = HashMap::new();
        entries.insert(
            "16x16".to_string(),
            IcnsEntry {
                size: 16,
                ostype: "is32".to_string(),
            },
        );
        entries.insert(
            "16x16@2x".to_string(),
            IcnsEntry {
                size: 32,
                ostype: "ic11".to_string(),
            },
        );

        let images = build_macos_contents_json(&entries);
        assert_eq!(images.len(), 2);
        for image in images {
            assert_eq!(image.idiom.as_deref(), Some("mac"));
            assert_eq!(image.size.as_deref(), Some("16x16"));
            assert_eq!(image.folder.as_deref(), Some("."));
        }
    }
}
