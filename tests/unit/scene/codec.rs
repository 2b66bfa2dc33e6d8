use super::*;

use crate::document::model::{OverlayId, OverlayStyle};

fn overlay() -> TextOverlay {
    TextOverlay {
        id: OverlayId(1),
        position: Point::new(120.0, 80.0),
        style: OverlayStyle {
            width: 200.0,
            height: 50.0,
            angle: 30.0,
            ..OverlayStyle::default()
        },
    }
}

#[test]
fn font_style_product_covers_all_combinations() {
    assert_eq!(combined_font_style(FontWeight::Normal, FontStyle::Normal), "normal");
    assert_eq!(combined_font_style(FontWeight::Bold, FontStyle::Normal), "bold");
    assert_eq!(combined_font_style(FontWeight::Normal, FontStyle::Italic), "italic");
    assert_eq!(combined_font_style(FontWeight::Bold, FontStyle::Italic), "bold italic");

    for weight in [FontWeight::Normal, FontWeight::Bold] {
        for style in [FontStyle::Normal, FontStyle::Italic] {
            assert_eq!(split_font_style(combined_font_style(weight, style)), (weight, style));
        }
    }
}

#[test]
fn render_params_center_anchor_offsets_are_half_box() {
    let params = to_render_params(&overlay());
    assert_eq!((params.x, params.y), (120.0, 80.0));
    assert_eq!((params.offset_x, params.offset_y), (100.0, 25.0));
    assert_eq!(params.rotation, 30.0);
    assert_eq!((params.scale_x, params.scale_y), (1.0, 1.0));
}

#[test]
fn set_box_keeps_offsets_at_half_box() {
    let mut params = to_render_params(&overlay());
    params.set_box(300.0, 90.0);
    assert_eq!((params.offset_x, params.offset_y), (150.0, 45.0));
}

#[test]
fn unrotated_affine_places_center_at_position() {
    let mut o = overlay();
    o.style.angle = 0.0;
    let params = to_render_params(&o);
    let center = params.to_affine() * Point::new(100.0, 25.0);
    assert!((center.x - 120.0).abs() < 1e-9);
    assert!((center.y - 80.0).abs() < 1e-9);

    let bounds = params.bounds();
    assert!((bounds.width() - 200.0).abs() < 1e-9);
    assert!((bounds.height() - 50.0).abs() < 1e-9);
}

#[test]
fn rotation_pivots_around_the_center() {
    let mut o = overlay();
    o.style.angle = 90.0;
    let params = to_render_params(&o);
    let center = params.to_affine() * Point::new(100.0, 25.0);
    assert!((center.x - 120.0).abs() < 1e-9);
    assert!((center.y - 80.0).abs() < 1e-9);
    // A 90-degree rotation swaps the box extents.
    let bounds = params.bounds();
    assert!((bounds.width() - 50.0).abs() < 1e-6);
    assert!((bounds.height() - 200.0).abs() < 1e-6);
}

#[test]
fn contains_agrees_with_center_anchor() {
    let mut o = overlay();
    o.style.angle = 0.0;
    let params = to_render_params(&o);
    assert!(params.contains(Point::new(120.0, 80.0)));
    assert!(params.contains(Point::new(21.0, 56.0)));
    assert!(!params.contains(Point::new(19.0, 80.0)));
    assert!(!params.contains(Point::new(120.0, 106.0)));
}

#[test]
fn from_render_state_folds_scale_into_box() {
    let mut params = to_render_params(&overlay());
    params.scale_x = 2.0;
    params.scale_y = 0.5;

    let patch = from_render_state(&params);
    assert_eq!(patch.width, Some(400.0));
    assert_eq!(patch.height, Some(25.0));
    assert_eq!(patch.scale_x, Some(1.0));
    assert_eq!(patch.scale_y, Some(1.0));
    assert_eq!(patch.angle, Some(30.0));
    assert_eq!((patch.x, patch.y), (Some(120.0), Some(80.0)));
    // Style fields ride along untouched.
    assert!(patch.text.is_none());
    assert!(patch.font_size.is_none());
}

#[test]
fn scale_normalization_is_idempotent() {
    let mut o = overlay();
    o.style.scale_x = 3.0;
    o.style.scale_y = 2.0;

    let first = from_render_state(&to_render_params(&o));
    first.apply_to(&mut o);
    assert_eq!((o.style.scale_x, o.style.scale_y), (1.0, 1.0));
    assert_eq!((o.style.width, o.style.height), (600.0, 100.0));

    let second = from_render_state(&to_render_params(&o));
    second.apply_to(&mut o);
    assert_eq!((o.style.width, o.style.height), (600.0, 100.0));
}

#[test]
fn codec_roundtrip_without_transform_is_lossless() {
    let mut o = overlay();
    from_render_state(&to_render_params(&o)).apply_to(&mut o);
    let original = overlay();
    assert_eq!(o.position, original.position);
    assert_eq!(o.style.angle, original.style.angle);
    assert_eq!(o.style.width, original.style.width);
    assert_eq!(o.style.height, original.style.height);
}
