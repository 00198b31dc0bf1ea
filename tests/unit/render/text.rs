use super::*;

fn rect() -> DrawRect {
    DrawRect {
        x: -66.0,
        y: 0.0,
        width: 532.0,
        height: 400.0,
    }
}

#[test]
fn no_text_means_no_plan() {
    let p = DesignParameters::new("j.png");
    assert!(TextPlan::compute(&p, &rect(), 400.0).is_none());
}

#[test]
fn sizes_positions_and_stroke_widths_at_reference_width() {
    let p = DesignParameters::new("j.png").with_text("ALEX", "10");
    let plan = TextPlan::compute(&p, &rect(), 400.0).unwrap();
    assert_eq!(plan.scale, 1.0);

    let number = plan.number.as_ref().unwrap();
    assert!((number.font_px - 24.0 * 1.8).abs() < 1e-9);
    assert_eq!(number.center.x, 200.0);
    assert!((number.center.y - 220.0).abs() < 1e-9);
    assert_eq!(number.stroke_width, 3.0);

    let name = plan.name.as_ref().unwrap();
    assert_eq!(name.font_px, 24.0);
    assert!((name.center.y - 272.0).abs() < 1e-9);
    assert_eq!(name.stroke_width, 2.0);
}

#[test]
fn number_is_drawn_before_name() {
    let p = DesignParameters::new("j.png").with_text("ALEX", "10");
    let plan = TextPlan::compute(&p, &rect(), 400.0).unwrap();
    let order: Vec<&str> = plan.lines().map(|l| l.text.as_str()).collect();
    assert_eq!(order, vec!["10", "ALEX"]);
}

#[test]
fn small_surfaces_keep_minimum_stroke() {
    let p = DesignParameters::new("j.png").with_text("A", "1");
    let plan = TextPlan::compute(&p, &rect(), 100.0).unwrap();
    assert_eq!(plan.scale, 0.5);
    assert_eq!(plan.number.as_ref().unwrap().stroke_width, 2.0);
    assert_eq!(plan.name.as_ref().unwrap().stroke_width, 1.0);
    assert_eq!(plan.name.as_ref().unwrap().font_px, 12.0);
}

#[test]
fn outline_is_contrast_of_fill() {
    let white = DesignParameters::new("j.png")
        .with_text("A", "")
        .with_text_color("#FFFFFF");
    let plan = TextPlan::compute(&white, &rect(), 400.0).unwrap();
    assert_eq!(plan.stroke, Rgb8::BLACK);
    assert!(plan.number.is_none());

    let black = white.clone().with_text_color("#000000");
    assert_eq!(
        TextPlan::compute(&black, &rect(), 400.0).unwrap().stroke,
        Rgb8::WHITE
    );

    let broken = white.with_text_color("not-a-color");
    let plan = TextPlan::compute(&broken, &rect(), 400.0).unwrap();
    assert_eq!(plan.fill, Rgb8::WHITE);
    assert_eq!(plan.stroke, Rgb8::BLACK);
}
