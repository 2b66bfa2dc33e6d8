use super::*;

use crate::{
    document::model::{OverlayId, OverlayStyle, SlideId, TextOverlay},
    foundation::core::{AspectRatio, Color},
};

fn color_slide() -> Slide {
    Slide {
        id: SlideId(1),
        aspect_ratio: AspectRatio::R4x5,
        background: Background::Color(Color::rgb(0, 128, 0)),
        overlays: vec![Overlay::Text(TextOverlay {
            id: OverlayId(2),
            position: kurbo::Point::new(200.0, 250.0),
            style: OverlayStyle::default(),
        })],
    }
}

#[test]
fn file_name_convention_for_single_and_multiple_slides() {
    assert_eq!(export_file_name(0, 1, "jpg"), "slide.jpg");
    assert_eq!(export_file_name(0, 3, "jpg"), "slide-1.jpg");
    assert_eq!(export_file_name(2, 3, "png"), "slide-3.png");
}

#[test]
fn renders_at_requested_target_size() {
    let slide = color_slide();
    let frame = render_slide_to_image(
        &slide,
        StageSize {
            width: 80,
            height: 100,
        },
        &mut TextShaper::new(),
    )
    .unwrap();
    assert_eq!((frame.width, frame.height), (80, 100));

    // Background color survives the scale.
    let i = ((50 * frame.width + 40) * 4) as usize;
    assert_eq!(&frame.data[i..i + 4], &[0, 128, 0, 255]);
}

#[test]
fn thumbnail_uses_default_dimensions() {
    let frame = render_slide_thumbnail(&color_slide(), &mut TextShaper::new()).unwrap();
    assert_eq!(
        (frame.width, frame.height),
        (THUMBNAIL_SIZE.width, THUMBNAIL_SIZE.height)
    );
}

#[test]
fn missing_background_image_does_not_fail_the_export() {
    let mut slide = color_slide();
    slide.background = Background::Image("/no/such/background.png".into());
    let frame = render_slide_to_image(
        &slide,
        StageSize {
            width: 40,
            height: 50,
        },
        &mut TextShaper::new(),
    )
    .unwrap();
    // Falls back to the stage's default white fill.
    let i = ((25 * frame.width + 20) * 4) as usize;
    assert_eq!(&frame.data[i..i + 4], &[255, 255, 255, 255]);
}

#[test]
fn png_bytes_decode_back_to_the_frame() {
    let slide = color_slide();
    let target = StageSize {
        width: 40,
        height: 50,
    };
    let bytes = render_slide_to_png(&slide, target, &mut TextShaper::new()).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (40, 50));
    assert_eq!(decoded.get_pixel(20, 25).0, [0, 128, 0, 255]);
}

#[test]
fn jpeg_bytes_are_produced() {
    let slide = color_slide();
    let bytes = render_slide_to_jpeg(
        &slide,
        StageSize {
            width: 40,
            height: 50,
        },
        &mut TextShaper::new(),
    )
    .unwrap();
    assert!(!bytes.is_empty());
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 40);
}

#[test]
fn export_does_not_disturb_a_live_editor_session() {
    use crate::interact::controller::EditorSession;

    let mut session = EditorSession::new(crate::document::deck::Deck::new());
    let _ = session.mount();
    let id = session.deck().current_slide().unwrap().overlays[0].id();
    session.select(id);
    let node_before = session.scene().node_id(id).unwrap();

    let slide = session.deck().current_slide().unwrap().clone();
    render_slide_thumbnail(&slide, &mut TextShaper::new()).unwrap();

    assert_eq!(session.selection(), Some(id));
    assert_eq!(session.scene().node_id(id), Some(node_before));
}
