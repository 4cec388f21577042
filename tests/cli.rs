use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{ImageFormat, Rgb, RgbImage};

fn cover_red(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cover_red"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("failed to run cover_red")
}

fn write_slide(path: &Path, marked: bool) {
    let mut img = RgbImage::from_pixel(64, 48, Rgb([200, 160, 180]));
    if marked {
        for x in 8..=56 {
            img.put_pixel(x, 6, Rgb([245, 0, 0]));
            img.put_pixel(x, 40, Rgb([245, 0, 0]));
        }
    }
    img.save_with_format(path, ImageFormat::Png).expect("write slide");
}

#[test]
fn single_image_failure_prints_message_and_exits_nonzero() {
    let dir = tempfile::tempdir().expect("tempdir");

    let out = cover_red(dir.path(), &["absent.png"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("image not found or unreadable"), "stderr: {stderr}");
    assert!(!stderr.contains("Unreadable {"), "stderr: {stderr}");

    write_slide(&dir.path().join("plain.png"), false);
    let out = cover_red(dir.path(), &["plain.png"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no marker detected"), "stderr: {stderr}");
}

#[test]
fn single_image_success_reports_bbox_and_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_slide(&dir.path().join("slide.png"), true);

    let out = cover_red(dir.path(), &["slide.png"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("(8, 6, 56, 40)"), "stdout: {stdout}");
    assert!(stdout.contains("slide_keep_red.jpg"), "stdout: {stdout}");
    assert!(dir.path().join("slide_keep_red.jpg").exists());
}

#[test]
fn batch_without_directory_still_summarizes() {
    let dir = tempfile::tempdir().expect("tempdir");

    let out = cover_red(dir.path(), &["--batch"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("No image files found in red_circle"), "stdout: {stdout}");
}

#[test]
fn batch_announces_count_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let images = dir.path().join("red_circle");
    fs::create_dir(&images).expect("create red_circle");
    write_slide(&images.join("a.png"), true);
    write_slide(&images.join("c.png"), false);

    let out = cover_red(dir.path(), &["--batch"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Found 2 images to process..."), "stdout: {stdout}");
    assert!(stdout.contains("✓ a.png"), "stdout: {stdout}");
    assert!(stdout.contains("✗ c.png: Error - no marker detected"), "stdout: {stdout}");
    assert!(
        stdout.contains("Successfully processed 1/2 images."),
        "stdout: {stdout}"
    );
}
