use std::io::Cursor;

use super::*;
use crate::assets::masks::BUILTIN_MASK_HALF;
use crate::assets::source::MemoryAssetSource;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn loader(src: MemoryAssetSource) -> AssetLoader {
    AssetLoader::new(Arc::new(src), Arc::new(usvg::fontdb::Database::new()))
}

#[test]
fn initial_state_is_pending_base_and_ready_empty_mask() {
    let l = loader(MemoryAssetSource::new());
    assert_eq!(l.assets().base.status(), LoadStatus::Pending);
    assert_eq!(l.assets().mask.status(), LoadStatus::Ready);
    assert!(l.assets().mask.asset().is_none());
    assert!(!l.has_pending());
}

#[test]
fn base_loads_only_when_pumped() {
    let mut l = loader(MemoryAssetSource::new().with("a.png", png(4, 3, [1, 2, 3, 255])));
    assert!(l.request_base("a.png"));
    assert!(!l.request_base("a.png"));
    assert_eq!(l.assets().base.status(), LoadStatus::Pending);
    assert_eq!(l.assets().base.pending_reference(), Some("a.png"));

    let events = l.pump();
    assert_eq!(
        events,
        vec![LoadEvent {
            slot: SlotKind::Base,
            reference: "a.png".to_owned(),
            status: LoadStatus::Ready
        }]
    );
    let base = l.assets().base.ready_asset().unwrap();
    assert_eq!((base.width, base.height), (4, 3));
    assert!(!l.request_base("a.png"));
}

#[test]
fn previous_asset_stays_visible_until_replacement_settles() {
    let src = MemoryAssetSource::new()
        .with("a.png", png(2, 2, [0, 0, 0, 255]))
        .with("b.png", png(8, 2, [0, 0, 0, 255]));
    let mut l = loader(src);
    l.request_base("a.png");
    l.pump();

    l.request_base("b.png");
    assert_eq!(l.assets().base.reference(), Some("a.png"));
    assert_eq!(l.assets().base.ready_asset().unwrap().width, 2);

    l.pump();
    assert_eq!(l.assets().base.reference(), Some("b.png"));
    assert_eq!(l.assets().base.ready_asset().unwrap().width, 8);
}

#[test]
fn superseded_requests_are_dropped() {
    let src = MemoryAssetSource::new()
        .with("a.png", png(2, 2, [0, 0, 0, 255]))
        .with("b.png", png(3, 3, [0, 0, 0, 255]));
    let mut l = loader(src);
    l.request_base("a.png");
    l.request_base("b.png");
    let events = l.pump();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reference, "b.png");
    assert_eq!(l.assets().base.ready_asset().unwrap().width, 3);
}

#[test]
fn failures_replace_the_shown_asset() {
    let mut l = loader(MemoryAssetSource::new().with("a.png", png(2, 2, [0, 0, 0, 255])));
    l.request_base("a.png");
    l.pump();
    l.request_base("missing.png");
    let events = l.pump();
    assert_eq!(events[0].status, LoadStatus::Failed);
    assert_eq!(l.assets().base.status(), LoadStatus::Failed);
    assert!(l.assets().base.asset().is_none());
    assert!(l.assets().base.error().unwrap().contains("asset load failure"));
}

#[test]
fn empty_base_reference_fails_closed() {
    let mut l = loader(MemoryAssetSource::new());
    l.request_base("");
    l.pump();
    assert_eq!(l.assets().base.status(), LoadStatus::Failed);
}

#[test]
fn undecodable_bytes_fail() {
    let mut l = loader(MemoryAssetSource::new().with("bad.png", b"nope".to_vec()));
    l.request_base("bad.png");
    l.pump();
    assert_eq!(l.assets().base.status(), LoadStatus::Failed);
}

#[test]
fn builtin_and_raster_masks() {
    let mut l = loader(MemoryAssetSource::new().with("m.png", png(5, 5, [255, 255, 255, 255])));
    assert!(l.request_mask(Some(BUILTIN_MASK_HALF)));
    l.pump();
    assert!(matches!(
        l.assets().mask.ready_asset().map(|m| m.as_ref()),
        Some(PreparedMask::Svg(_))
    ));

    l.request_mask(Some("m.png"));
    l.pump();
    let mask = l.assets().mask.ready_asset().unwrap();
    assert!(matches!(mask.as_ref(), PreparedMask::Raster(_)));
    assert_eq!(mask.intrinsic_size(), (5, 5));
}

#[test]
fn clearing_the_mask_is_immediate() {
    let mut l = loader(MemoryAssetSource::new());
    assert!(!l.request_mask(None));
    l.request_mask(Some("missing.svg"));
    l.pump();
    assert_eq!(l.assets().mask.status(), LoadStatus::Failed);
    assert!(l.request_mask(None));
    assert_eq!(l.assets().mask.status(), LoadStatus::Ready);
    assert!(l.assets().mask.asset().is_none());
}

#[test]
fn clearing_cancels_an_inflight_mask_load() {
    let mut l = loader(MemoryAssetSource::new());
    l.request_mask(Some(BUILTIN_MASK_HALF));
    assert!(l.request_mask(None));
    assert!(l.pump().is_empty());
    assert!(l.assets().mask.asset().is_none());
}

#[test]
fn ready_helper_builds_settled_assets() {
    let img = decode_image(&png(2, 2, [9, 9, 9, 255])).unwrap();
    let a = LoadedAssets::ready(img, None).with_failed_mask("m.svg");
    assert_eq!(a.base.status(), LoadStatus::Ready);
    assert_eq!(a.mask.status(), LoadStatus::Failed);
}
