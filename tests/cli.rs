//! End-to-end tests that run the `pipeline-meta` binary in a scratch directory.
//!
//! Run with: `cargo test --test cli`

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pipeline-meta"))
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn touch(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ===========================================================================
// gen
// ===========================================================================

#[test]
fn gen_writes_metadata_file() {
    let tmp = TempDir::new().unwrap();
    let out = run(
        tmp.path(),
        &["gen", "xcontrol", "sha256:abc", "v1.2\nv1.2:latest\nv1.0"],
    );

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), "[metadata] Wrote: image-metadata-xcontrol.json\n");

    let json = read_json(&tmp.path().join("image-metadata-xcontrol.json"));
    assert_eq!(json["name"], "xcontrol");
    assert_eq!(json["digest"], "sha256:abc");
    assert_eq!(json["tags"], serde_json::json!(["v1.2", "v1.2:latest", "v1.0"]));
    assert_eq!(json["preferred_tag"], "v1.2:latest");
    assert_eq!(json["image"], "ghcr.io/cloud-neutral-toolkit/xcontrol");
    assert_eq!(
        json["image_with_digest"],
        "ghcr.io/cloud-neutral-toolkit/xcontrol@sha256:abc"
    );
}

#[test]
fn gen_with_empty_tags() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen", "web", "sha256:1", ""]);

    assert!(out.status.success());
    let json = read_json(&tmp.path().join("image-metadata-web.json"));
    assert_eq!(json["tags"], serde_json::json!([]));
    assert_eq!(json["preferred_tag"], "");
}

#[test]
fn gen_with_too_few_arguments_exits_1() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen", "web", "sha256:1"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn gen_ignores_extra_arguments() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen", "web", "sha256:1", "v1", "unused"]);

    assert_eq!(out.status.code(), Some(0));
    let json = read_json(&tmp.path().join("image-metadata-web.json"));
    assert_eq!(json["tags"], serde_json::json!(["v1"]));
}

#[test]
fn gen_escapes_non_ascii_tags() {
    let tmp = TempDir::new().unwrap();
    run(tmp.path(), &["gen", "web", "sha256:1", "v1-é"]);

    let raw = fs::read_to_string(tmp.path().join("image-metadata-web.json")).unwrap();
    assert!(raw.contains(r#""v1-\u00e9""#));
    assert!(raw.is_ascii());
}

#[test]
fn check_skip_lines_match_media_index() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("public/images")).unwrap();

    let check = stdout(&run(tmp.path(), &["check"]));
    let index = stdout(&run(tmp.path(), &["media-index"]));
    for line in check.lines() {
        assert!(index.lines().any(|l| l == line), "{line:?} missing from media-index output");
    }
}

#[test]
fn gen_registry_from_config_and_flag() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("pipeline-meta.toml"),
        "[image]\nregistry = \"registry.example.com/acme\"\n",
    )
    .unwrap();

    run(tmp.path(), &["gen", "a", "d1", "v1"]);
    let json = read_json(&tmp.path().join("image-metadata-a.json"));
    assert_eq!(json["image"], "registry.example.com/acme/a");

    run(tmp.path(), &["gen", "b", "d2", "v1", "--registry", "quay.io/other"]);
    let json = read_json(&tmp.path().join("image-metadata-b.json"));
    assert_eq!(json["image_with_digest"], "quay.io/other/b@d2");
}

#[test]
fn gen_into_missing_out_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen", "a", "d", "v1", "--out-dir", "nope"]);

    assert!(!out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}

// ===========================================================================
// media-index
// ===========================================================================

#[test]
fn media_index_end_to_end() {
    let tmp = TempDir::new().unwrap();
    touch(
        tmp.path(),
        &[
            "public/images/2024/a.png",
            "public/images/PHOTO.JPG",
            "public/images/readme.txt",
            "public/videos/intro.mp4",
            "public/videos/clip.mkv",
        ],
    );

    let out = run(tmp.path(), &["media-index"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Scanning images...\n\
         Generated public/_media/images.json with 2 items\n\
         Scanning videos...\n\
         Generated public/_media/videos.json with 1 items\n"
    );

    let images = fs::read_to_string(tmp.path().join("public/_media/images.json")).unwrap();
    assert_eq!(
        images,
        r#"[
  {
    "path": "2024/a.png",
    "ext": "png",
    "type": "image"
  },
  {
    "path": "PHOTO.JPG",
    "ext": "jpg",
    "type": "image"
  }
]
"#
    );

    let videos = read_json(&tmp.path().join("public/_media/videos.json"));
    assert_eq!(
        videos,
        serde_json::json!([{ "path": "intro.mp4", "ext": "mp4", "type": "video" }])
    );
}

#[test]
fn media_index_skips_and_preserves() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("public/images")).unwrap();
    fs::create_dir_all(tmp.path().join("public/_media")).unwrap();
    fs::write(tmp.path().join("public/_media/images.json"), "previous\n").unwrap();

    let out = run(tmp.path(), &["media-index"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Scanning images...\n\
         No files found in public/images. Skipping generation to preserve existing index if any.\n\
         Scanning videos...\n\
         Directory not found: public/videos. Skipping.\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("public/_media/images.json")).unwrap(),
        "previous\n"
    );
    assert!(!tmp.path().join("public/_media/videos.json").exists());
}

#[test]
fn media_index_is_byte_identical_on_rerun() {
    let tmp = TempDir::new().unwrap();
    touch(
        tmp.path(),
        &["public/images/b.gif", "public/images/a/c.avif", "public/images/ä.webp"],
    );

    run(tmp.path(), &["media-index"]);
    let first = fs::read(tmp.path().join("public/_media/images.json")).unwrap();
    run(tmp.path(), &["media-index"]);
    let second = fs::read(tmp.path().join("public/_media/images.json")).unwrap();

    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains("ä.webp"));
}

#[test]
fn media_index_custom_dirs() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), &["site/videos/a.webm"]);

    let out = run(
        tmp.path(),
        &["media-index", "--public-dir", "site", "--output-dir", "build/media"],
    );
    assert!(out.status.success());
    let videos = read_json(&tmp.path().join("build/media/videos.json"));
    assert_eq!(videos[0]["path"], "a.webm");
}

#[test]
fn invalid_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pipeline-meta.toml"), "[media]\nbogus = 1\n").unwrap();

    let out = run(tmp.path(), &["media-index"]);
    assert!(!out.status.success());
    assert!(!tmp.path().join("public/_media").exists());
}

// ===========================================================================
// check / gen-config
// ===========================================================================

#[test]
fn check_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), &["public/images/a.png", "public/images/b.jpg"]);

    let out = run(tmp.path(), &["check"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "images: 2 items → public/_media/images.json\n\
         \x20   001 a.png\n\
         \x20   002 b.jpg\n\
         Directory not found: public/videos. Skipping.\n"
    );
    assert!(!tmp.path().join("public/_media").exists());
}

#[test]
fn gen_config_prints_template() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen-config"]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[image]"));
    assert!(text.contains("registry = \"ghcr.io/cloud-neutral-toolkit\""));
    assert!(text.contains("[media]"));
}
