use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![v, v, v, 255],
        premultiplied: true,
    }
}

#[test]
fn texture_slot_tracks_uploads() {
    let mut t = TextureSlot::new();
    assert!(!t.needs_update());
    assert!(t.take_update().is_none());

    t.present(1, &frame(10)).unwrap();
    assert!(t.needs_update());
    let (generation, f) = t.take_update().unwrap();
    assert_eq!(generation, 1);
    assert_eq!(f.data[0], 10);
    assert!(!t.needs_update());

    t.present(2, &frame(20)).unwrap();
    t.present(3, &frame(30)).unwrap();
    assert_eq!(t.generation(), 3);
    assert_eq!(t.take_update().unwrap().1.data[0], 30);
}

#[test]
fn texture_slot_ignores_stale_generations() {
    let mut t = TextureSlot::new();
    t.present(5, &frame(50)).unwrap();
    t.present(4, &frame(40)).unwrap();
    assert_eq!(t.generation(), 5);
    assert_eq!(t.latest().unwrap().data[0], 50);
}

#[test]
fn recording_surface_through_shared_handle() {
    let shared = Arc::new(Mutex::new(RecordingSurface::new()));
    let mut adapter: Box<dyn SurfaceAdapter> = Box::new(shared.clone());
    adapter.present(1, &frame(1)).unwrap();
    adapter.present(2, &frame(2)).unwrap();

    let rec = shared.lock().unwrap();
    assert_eq!(rec.frames().len(), 2);
    assert_eq!(rec.last().unwrap().0, 2);
}
