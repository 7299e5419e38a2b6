// SPDX-License-Identifier: MPL-2.0
use image_rs::codecs::gif::GifEncoder;
use image_rs::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
use lens_view::error::CannotHandle;
use lens_view::media::{live_resources, Animation, ImageSize};
use lens_view::source::{
    ChangeTrigger, ChangeType, EventLog, GraphicsItem, ImageSource, ReloadBehavior, ReloadFlag,
    RepresentationKind, SourceEvent,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    RgbaImage::from_pixel(width, height, Rgba([12, 34, 56, 255]))
        .save(&path)
        .expect("failed to write png");
    path
}

fn write_gif(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let file = fs::File::create(&path).expect("failed to create gif");
    let mut encoder = GifEncoder::new(file);
    encoder
        .encode_frames((0..3u8).map(|i| {
            Frame::from_parts(
                RgbaImage::from_pixel(10, 7, Rgba([i * 60, 100, 0, 255])),
                0,
                0,
                Delay::from_numer_denom_ms(80, 1),
            )
        }))
        .expect("failed to encode gif");
    path
}

fn write_svg(dir: &TempDir, name: &str, width: &str, height: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(
        &path,
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="2" height="2" fill="red"/></svg>"#
        ),
    )
    .expect("failed to write svg");
    path
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn open_finished_count(log: &EventLog, success: bool) -> usize {
    log.count(|event| *event == SourceEvent::OpenFinished { success })
}

#[test]
fn unreadable_path_is_read_error() {
    let dir = tempdir().expect("temp dir");
    let mut source = ImageSource::new();
    let mut log = EventLog::new();

    let err = source
        .open(dir.path().join("does-not-exist.png"), &mut log)
        .unwrap_err();

    assert!(err.is_read_error());
    assert_eq!(source.kind(), RepresentationKind::None);
    assert_eq!(open_finished_count(&log, false), 1);
}

#[test]
fn unsupported_format_is_cannot_handle() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("readme.txt");
    fs::write(&path, "just some words").expect("write");
    let mut source = ImageSource::new();
    let mut log = EventLog::new();

    let err = source.open(&path, &mut log).unwrap_err();

    assert_eq!(err.cannot_handle(), Some(CannotHandle::UnsupportedFormat));
    assert_eq!(source.kind(), RepresentationKind::None);
    assert_eq!(log.events(), &[SourceEvent::OpenFinished { success: false }]);
}

#[test]
fn corrupt_raster_is_cannot_handle() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.png");
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    fs::write(&path, bytes).expect("write");
    let mut source = ImageSource::new();

    let err = source.open(&path, &mut ()).unwrap_err();

    assert_eq!(err.cannot_handle(), Some(CannotHandle::InvalidImage));
    assert_eq!(source.kind(), RepresentationKind::None);
}

#[test]
fn static_image_reports_size_then_success() {
    let dir = tempdir().expect("temp dir");
    let path = write_png(&dir, "photo.png", 21, 13);
    let mut source = ImageSource::new();
    let mut log = EventLog::new();

    source.open(&path, &mut log).expect("png should open");

    assert_eq!(source.kind(), RepresentationKind::Static);
    assert_eq!(source.image_size(), Some(ImageSize::new(21, 13)));
    assert_eq!(
        log.events(),
        &[
            SourceEvent::ImageSizeChanged(ImageSize::new(21, 13)),
            SourceEvent::OpenFinished { success: true },
        ]
    );
}

#[test]
fn animated_pause_state_follows_last_call() {
    let dir = tempdir().expect("temp dir");
    let path = write_gif(&dir, "loop.gif");
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("gif should open");
    assert_eq!(source.kind(), RepresentationKind::Animated);

    let mut log = EventLog::new();
    let current = source.is_paused();
    source.set_paused(current, &mut log);
    assert!(log.events().is_empty());

    source.set_paused(!current, &mut log);
    assert_eq!(log.events(), &[SourceEvent::PausedChanged(!current)]);
    assert_eq!(source.is_paused(), !current);

    log.clear();
    source.set_paused(current, &mut log);
    assert_eq!(log.events(), &[SourceEvent::PausedChanged(current)]);
    assert_eq!(source.is_paused(), current);
}

#[test]
fn paused_animation_does_not_advance() {
    let dir = tempdir().expect("temp dir");
    let path = write_gif(&dir, "loop.gif");
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("gif should open");
    assert!(source.is_paused());

    assert!(!source.advance_animation(std::time::Duration::from_secs(1), &mut ()));

    source.set_paused(false, &mut ());
    assert!(source.advance_animation(std::time::Duration::from_millis(80), &mut ()));
}

fn assert_opens_animated(name: &str, format: ImageFormat, size: ImageSize, frames: usize) {
    let path = fixture(name);
    let mut source = ImageSource::new();
    let mut log = EventLog::new();

    source.open(&path, &mut log).expect("animation should open");

    assert_eq!(source.kind(), RepresentationKind::Animated);
    assert_eq!(source.image_size(), Some(size));
    assert_eq!(
        log.events(),
        &[
            SourceEvent::ImageSizeChanged(size),
            SourceEvent::PausedChanged(true),
            SourceEvent::OpenFinished { success: true },
        ]
    );

    let animation = Animation::load(&path, format).expect("frames should decode");
    assert_eq!(animation.frame_count(), frames);

    source.set_paused(false, &mut ());
    assert!(source.advance_animation(animation.current_frame().delay(), &mut ()));
}

#[test]
fn apng_opens_as_animation() {
    assert_opens_animated("three_frames.png", ImageFormat::Png, ImageSize::new(6, 4), 3);
}

#[test]
fn animated_webp_opens_as_animation() {
    assert_opens_animated("two_frames.webp", ImageFormat::WebP, ImageSize::new(5, 3), 2);
}

#[test]
fn animated_fixture_frames_keep_their_delays() {
    let apng = Animation::load(fixture("three_frames.png"), ImageFormat::Png).expect("apng");
    assert_eq!(apng.current_frame().delay(), Duration::from_millis(100));

    let webp = Animation::load(fixture("two_frames.webp"), ImageFormat::WebP).expect("webp");
    assert_eq!(webp.current_frame().delay(), Duration::from_millis(120));
}

#[test]
fn zero_sized_vector_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = write_svg(&dir, "empty.svg", "0", "0");
    let baseline = live_resources();
    let mut source = ImageSource::new();

    let err = source.open(&path, &mut ()).unwrap_err();

    assert_eq!(err.cannot_handle(), Some(CannotHandle::InvalidVector));
    assert_eq!(source.kind(), RepresentationKind::None);
    assert!(!source.has_pending_item());
    assert_eq!(live_resources(), baseline);
}

#[test]
fn vector_wins_over_raster_extension() {
    let dir = tempdir().expect("temp dir");
    let path = write_svg(&dir, "mislabeled.png", "8", "8");
    let mut source = ImageSource::new();

    source.open(&path, &mut ()).expect("svg content should open");

    assert_eq!(source.kind(), RepresentationKind::Vector);
}

#[test]
fn ignored_reload_emits_nothing() {
    let dir = tempdir().expect("temp dir");
    let path = write_png(&dir, "photo.png", 4, 4);
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("png should open");
    let mut log = EventLog::new();

    source
        .reload(ReloadFlag::Ignore, ChangeType::ContentsChanged, &mut log)
        .expect("ignored reload succeeds");

    assert!(log.events().is_empty());
    assert_eq!(source.kind(), RepresentationKind::Static);
}

#[test]
fn permissions_change_keeps_representation() {
    let dir = tempdir().expect("temp dir");
    let path = write_svg(&dir, "logo.svg", "16", "16");
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("svg should open");
    let mut log = EventLog::new();

    source
        .reload(ReloadFlag::Reload, ChangeType::PermissionsChanged, &mut log)
        .expect("permissions reload succeeds");

    assert_eq!(log.events(), &[SourceEvent::Changed]);
    assert_eq!(source.kind(), RepresentationKind::Vector);
    assert!(source.has_pending_item());
}

#[test]
fn contents_reload_tears_down_and_rebuilds() {
    let dir = tempdir().expect("temp dir");
    let path = write_png(&dir, "photo.png", 4, 4);
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("png should open");
    write_png(&dir, "photo.png", 9, 3);
    let mut log = EventLog::new();

    source
        .reload(ReloadFlag::Reload, ChangeType::ContentsChanged, &mut log)
        .expect("reload succeeds");

    assert_eq!(
        log.events(),
        &[
            SourceEvent::AboutToReload,
            SourceEvent::ImageSizeChanged(ImageSize::new(9, 3)),
            SourceEvent::ReloadFinished { success: true },
        ]
    );
}

#[test]
fn reload_after_removal_fails_and_is_retryable() {
    let dir = tempdir().expect("temp dir");
    let path = write_png(&dir, "photo.png", 4, 4);
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("png should open");
    fs::remove_file(&path).expect("remove");
    let mut log = EventLog::new();

    let err = source
        .reload(ReloadFlag::Reload, ChangeType::Removed, &mut log)
        .unwrap_err();
    assert!(err.is_read_error());
    assert_eq!(source.kind(), RepresentationKind::None);
    assert_eq!(source.file_path(), Some(path.as_path()));
    assert_eq!(
        log.events().last(),
        Some(&SourceEvent::ReloadFinished { success: false })
    );

    write_png(&dir, "photo.png", 4, 4);
    source
        .reload(ReloadFlag::Reload, ChangeType::ContentsChanged, &mut ())
        .expect("file is back");
    assert_eq!(source.kind(), RepresentationKind::Static);
}

#[test]
fn reload_without_any_file_is_read_error() {
    let mut source = ImageSource::new();
    let err = source
        .reload(ReloadFlag::Reload, ChangeType::ContentsChanged, &mut ())
        .unwrap_err();
    assert!(err.is_read_error());
}

#[test]
fn reload_behavior_table() {
    let source = ImageSource::new();
    assert_eq!(
        source.reload_behavior(ChangeTrigger::Internal, ChangeType::ContentsChanged),
        ReloadBehavior::Silent
    );
    assert_eq!(
        source.reload_behavior(ChangeTrigger::External, ChangeType::ContentsChanged),
        ReloadBehavior::Ask
    );
    for trigger in [ChangeTrigger::Internal, ChangeTrigger::External] {
        assert_eq!(
            source.reload_behavior(trigger, ChangeType::Removed),
            ReloadBehavior::Silent
        );
        assert_eq!(
            source.reload_behavior(trigger, ChangeType::PermissionsChanged),
            ReloadBehavior::Silent
        );
    }
}

#[test]
fn vector_items_transfer_then_rebuild() {
    let dir = tempdir().expect("temp dir");
    let path = write_svg(&dir, "logo.svg", "30", "20");
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("svg should open");

    let first = source.create_graphics_item().expect("pending item");
    let second = source.create_graphics_item().expect("rebuilt item");
    let third = source.create_graphics_item().expect("rebuilt again");

    assert!(matches!(first, GraphicsItem::Vector(_)));
    assert_ne!(first.id(), second.id());
    assert_ne!(second.id(), third.id());
    assert_eq!(second.size(), ImageSize::new(30, 20));
}

#[test]
fn animated_items_share_playback() {
    let dir = tempdir().expect("temp dir");
    let path = write_gif(&dir, "loop.gif");
    let mut source = ImageSource::new();
    source.open(&path, &mut ()).expect("gif should open");

    let Some(GraphicsItem::Animated(mut item)) = source.create_graphics_item() else {
        panic!("expected an animated item");
    };
    assert!(item.take_update());

    source.set_paused(false, &mut ());
    source.advance_animation(std::time::Duration::from_millis(80), &mut ());
    assert!(item.take_update());
}

#[test]
fn failed_open_leaks_nothing_and_recovers() {
    let dir = tempdir().expect("temp dir");
    let good_svg = write_svg(&dir, "good.svg", "5", "5");
    let bad_svg = write_svg(&dir, "bad.svg", "0", "0");
    let png = write_png(&dir, "photo.png", 3, 3);
    let gif = write_gif(&dir, "loop.gif");
    let baseline = live_resources();
    let mut source = ImageSource::new();

    source.open(&good_svg, &mut ()).expect("svg should open");
    assert_eq!(live_resources(), baseline + 1);

    assert!(source.open(&bad_svg, &mut ()).is_err());
    assert_eq!(live_resources(), baseline);

    source.open(&gif, &mut ()).expect("gif should open");
    assert_eq!(live_resources(), baseline + 1);

    source.open(&png, &mut ()).expect("png should open");
    assert_eq!(live_resources(), baseline + 1);
    assert_eq!(source.kind(), RepresentationKind::Static);

    drop(source);
    assert_eq!(live_resources(), baseline);
}
