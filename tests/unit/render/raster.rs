use super::*;

use std::sync::Arc;

use crate::{
    document::model::{OverlayId, OverlayStyle, TextOverlay},
    foundation::core::StageSize,
    scene::codec::to_render_params,
};

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn renders_solid_color_background() {
    let stage = {
        let mut s = Stage::new(StageSize {
            width: 8,
            height: 8,
        });
        s.set_background_color(Color::rgb(255, 0, 0));
        s
    };

    let frame = CpuRasterizer::new()
        .render(&stage, &mut TextShaper::new())
        .unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.premultiplied);
    assert_eq!(pixel(&frame, 4, 4), [255, 0, 0, 255]);
}

#[test]
fn background_image_scales_to_fill() {
    let mut stage = Stage::new(StageSize {
        width: 8,
        height: 8,
    });
    // Uniform blue 2x2 source stretched over the whole 8x8 stage.
    let px = [0u8, 0, 255, 255];
    stage.set_background_image(PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(px.repeat(4)),
    });

    let frame = CpuRasterizer::new()
        .render(&stage, &mut TextShaper::new())
        .unwrap();
    assert_eq!(pixel(&frame, 4, 4), [0, 0, 255, 255]);
    assert_eq!(pixel(&frame, 1, 6), [0, 0, 255, 255]);
}

#[test]
fn text_nodes_without_registered_fonts_are_skipped() {
    let mut stage = Stage::new(StageSize {
        width: 16,
        height: 16,
    });
    stage.set_background_color(Color::WHITE);
    let overlay = TextOverlay {
        id: OverlayId(1),
        position: kurbo::Point::new(8.0, 8.0),
        style: OverlayStyle::default(),
    };
    stage.add_text(overlay.id, to_render_params(&overlay));

    // No fonts registered: the node is skipped, the frame still renders.
    let frame = CpuRasterizer::new()
        .render(&stage, &mut TextShaper::new())
        .unwrap();
    assert_eq!(pixel(&frame, 8, 8), [255, 255, 255, 255]);
}

#[test]
fn hidden_nodes_are_not_drawn() {
    let mut stage = Stage::new(StageSize {
        width: 8,
        height: 8,
    });
    let overlay = TextOverlay {
        id: OverlayId(1),
        position: kurbo::Point::new(4.0, 4.0),
        style: OverlayStyle::default(),
    };
    let node = stage.add_text(overlay.id, to_render_params(&overlay));
    stage.node_mut(node).unwrap().visible = false;

    let frame = CpuRasterizer::new()
        .render(&stage, &mut TextShaper::new())
        .unwrap();
    assert_eq!(pixel(&frame, 4, 4), [255, 255, 255, 255]);
}

#[test]
fn straight_alpha_conversion_undoes_premultiply() {
    let frame = FrameRgba {
        width: 1,
        height: 1,
        data: vec![50, 25, 100, 128],
        premultiplied: true,
    };
    let straight = frame.to_straight_alpha();
    assert_eq!(straight[3], 128);
    // 50/128*255 ~= 100, 25/128*255 ~= 50, 100/128*255 ~= 199
    assert!((i32::from(straight[0]) - 100).abs() <= 1);
    assert!((i32::from(straight[1]) - 50).abs() <= 1);
    assert!((i32::from(straight[2]) - 199).abs() <= 1);
}

#[test]
fn oversized_stage_is_rejected() {
    let stage = Stage::new(StageSize {
        width: 70_000,
        height: 8,
    });
    assert!(
        CpuRasterizer::new()
            .render(&stage, &mut TextShaper::new())
            .is_err()
    );
}
