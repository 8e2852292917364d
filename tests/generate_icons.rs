use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run `icon-synth` with no source image and assert the full default output
/// set exists, including a valid iOS Contents.json.
#[test]
fn test_default_generation_produces_all_platforms() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    run_icon_synth(&["-o", output_dir.to_str().unwrap()]);

    for relative in [
        "icon_1024.png",
        "icon.ico",
        "icon.icns",
        "Contents.json",
        "web/Icon-192.png",
        "web/Icon-maskable-512.png",
        "android/mipmap-mdpi/ic_launcher.png",
        "android/mipmap-xxxhdpi/ic_launcher_round.png",
        "ios/AppIcon-1024x1024.png",
        "ios/Contents.json",
    ] {
        assert!(
            output_dir.join(relative).exists(),
            "expected output file {relative} to exist"
        );
    }

    // The iOS asset catalog must be valid JSON with the expected shape.
    let contents = std::fs::read_to_string(output_dir.join("ios/Contents.json"))
        .expect("Failed to read ios/Contents.json");
    let parsed: serde_json::Value =
        serde_json::from_str(&contents).expect("ios/Contents.json should be valid JSON");

    let images = parsed["images"].as_array().expect("images array");
    assert!(!images.is_empty());
    assert_eq!(parsed["info"]["version"], 1);
    for image in images {
        assert!(image["filename"].is_string());
        assert!(image["idiom"].is_string());
        assert!(image["scale"].is_string());
    }
}

/// The master canvas must match the procedural design exactly: transparent
/// rounded corners, the documented gradient values, and the white motif.
#[test]
fn test_master_canvas_pixels() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    run_icon_synth(&["-o", output_dir.to_str().unwrap(), "--png", "64"]);

    let master = image::open(output_dir.join("icon_1024.png"))
        .expect("Failed to load master icon")
        .to_rgba8();
    assert_eq!(master.dimensions(), (1024, 1024));

    // Rounded corners stay fully transparent.
    for (x, y) in [(0, 0), (1023, 0), (0, 1023), (1023, 1023)] {
        assert_eq!(master.get_pixel(x, y)[3], 0, "corner ({x}, {y})");
    }

    // Gradient sample outside the motif and the corner arcs:
    // progress = 400 / 2048.
    assert_eq!(*master.get_pixel(200, 200), Rgba([95, 95, 238, 255]));

    // Node disc at spoke angle 0 and the opaque center.
    assert_eq!(*master.get_pixel(672, 512), Rgba([255, 255, 255, 255]));
    assert_eq!(master.get_pixel(512, 512)[3], 255);
}

/// Two runs with identical inputs must produce byte-identical files.
#[test]
fn test_generation_is_deterministic() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let first_dir = temp_dir.path().join("first");
    let second_dir = temp_dir.path().join("second");

    run_icon_synth(&["-o", first_dir.to_str().unwrap(), "--png", "64,128"]);
    run_icon_synth(&["-o", second_dir.to_str().unwrap(), "--png", "64,128"]);

    for filename in ["icon_1024.png", "64x64.png", "128x128.png"] {
        let first = std::fs::read(first_dir.join(filename)).unwrap();
        let second = std::fs::read(second_dir.join(filename)).unwrap();
        assert_eq!(first, second, "{filename} should be byte-identical across runs");
    }
}

/// A square source image can replace the procedural master.
#[test]
fn test_external_source_image() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let source_path = temp_dir.path().join("source.png");
    create_test_image(&source_path, 256, 256);

    let output_dir = temp_dir.path().join("icons");
    run_icon_synth(&[
        source_path.to_str().unwrap(),
        "-o",
        output_dir.to_str().unwrap(),
        "--png",
        "64",
    ]);

    let resized = image::open(output_dir.join("64x64.png"))
        .expect("Failed to load resized icon");
    assert_eq!(resized.width(), 64);
    assert_eq!(resized.height(), 64);
}

/// Non-square source images are rejected.
#[test]
fn test_non_square_source_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let source_path = temp_dir.path().join("source.png");
    create_test_image(&source_path, 256, 128);

    let output = Command::new(binary_path())
        .arg(&source_path)
        .arg("-o")
        .arg(temp_dir.path().join("icons"))
        .output()
        .expect("Failed to run icon-synth");

    assert!(!output.status.success(), "non-square input should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("square"), "stderr should mention the square requirement");
}

fn run_icon_synth(args: &[&str]) {
    let output = Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to run icon-synth");

    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("icon-synth {args:?} failed with status {}", output.status);
    }
}

/// Creates a gradient test image and saves it as PNG.
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut image = RgbaImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let red = (255.0 * x as f32 / width as f32) as u8;
        let green = (255.0 * y as f32 / height as f32) as u8;
        *pixel = Rgba([red, green, 128, 255]);
    }

    image.save(path).expect("Failed to save test image");
}

/// Gets the path to the icon-synth binary, building it if needed.
fn binary_path() -> PathBuf {
    let debug_path = Path::new("target/debug/icon-synth");
    if debug_path.exists() {
        return debug_path.to_path_buf();
    }

    let build_output = Command::new("cargo")
        .args(["build", "--bin", "icon-synth"])
        .output()
        .expect("Failed to run cargo build");

    if !build_output.status.success() {
        panic!(
            "Failed to build icon-synth binary: {}",
            String::from_utf8_lossy(&build_output.stderr)
        );
    }

    debug_path.to_path_buf()
}
