use super::*;

use crate::document::model::{DEFAULT_TEXT, FontWeight};

fn session() -> EditorSession {
    let mut session = EditorSession::new(Deck::new());
    assert!(session.mount().is_none()); // default background is a color
    session
}

fn first_overlay_id(session: &EditorSession) -> OverlayId {
    session.deck().current_slide().unwrap().overlays[0].id()
}

fn overlay_center(session: &EditorSession) -> Point {
    let id = first_overlay_id(session);
    session
        .deck()
        .current_slide()
        .unwrap()
        .text_overlay(id)
        .unwrap()
        .position
}

#[test]
fn select_at_picks_node_and_computes_toolbar() {
    let mut s = session();
    let center = overlay_center(&s);
    let id = first_overlay_id(&s);

    assert_eq!(s.select_at(center), Some(id));
    assert_eq!(s.selection(), Some(id));

    // Default overlay: 200x50 box centered at (200,250), identity viewport.
    let toolbar = s.toolbar_position().unwrap();
    assert_eq!(toolbar.top, 275.0 + TOOLBAR_MARGIN);
    assert_eq!(toolbar.left, 200.0);
}

#[test]
fn select_at_empty_canvas_clears_selection() {
    let mut s = session();
    s.select_at(overlay_center(&s));
    assert!(s.selection().is_some());

    assert_eq!(s.select_at(Point::new(2.0, 2.0)), None);
    assert_eq!(s.selection(), None);
    assert!(s.toolbar_position().is_none());
}

#[test]
fn drag_commits_final_position_at_drag_end() {
    let mut s = session();
    let id = s
        .add_overlay(Point::new(100.0, 100.0), OverlayStyle::default())
        .unwrap();
    s.select(id);

    assert!(s.drag_start());
    s.drag_move(Point::new(150.0, 120.0));

    // Intermediate ticks move the live node but not the document.
    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.position, Point::new(100.0, 100.0));
    let node = s.scene().node(id).unwrap();
    assert_eq!((node.params.x, node.params.y), (150.0, 120.0));

    s.drag_end();
    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.position, Point::new(150.0, 120.0));
}

#[test]
fn toolbar_tracks_the_node_during_drag() {
    let mut s = session();
    s.select_at(overlay_center(&s));
    let before = s.toolbar_position().unwrap();

    s.drag_start();
    s.drag_move(Point::new(220.0, 270.0));
    let during = s.toolbar_position().unwrap();
    assert_ne!(before, during);
    assert_eq!(during.left, 220.0);
    assert_eq!(during.top, 295.0 + TOOLBAR_MARGIN);
    s.drag_end();
}

#[test]
fn drag_events_without_a_gesture_are_ignored() {
    let mut s = session();
    let id = first_overlay_id(&s);
    let before = overlay_center(&s);

    s.drag_move(Point::new(1.0, 1.0));
    s.drag_end();
    assert!(!s.drag_start()); // nothing selected yet

    s.select(id);
    s.drag_move(Point::new(1.0, 1.0)); // no drag_start
    assert_eq!(overlay_center(&s), before);
}

#[test]
fn transform_end_commits_normalized_state_in_one_update() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);

    assert!(s.transform_start());
    s.transform_end(TransformState {
        x: 210.0,
        y: 260.0,
        width: 200.0,
        height: 50.0,
        rotation: 45.0,
        scale_x: 1.5,
        scale_y: 2.0,
    });

    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.position, Point::new(210.0, 260.0));
    assert_eq!(stored.style.angle, 45.0);
    assert_eq!((stored.style.width, stored.style.height), (300.0, 100.0));
    assert_eq!((stored.style.scale_x, stored.style.scale_y), (1.0, 1.0));

    // The live node is normalized the same way, offsets included.
    let node = s.scene().node(id).unwrap();
    assert_eq!((node.params.width, node.params.height), (300.0, 100.0));
    assert_eq!((node.params.scale_x, node.params.scale_y), (1.0, 1.0));
    assert_eq!((node.params.offset_x, node.params.offset_y), (150.0, 50.0));
}

#[test]
fn repeated_transforms_do_not_compound_scale() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);

    for _ in 0..3 {
        s.transform_start();
        let node = s.scene().node(id).unwrap();
        s.transform_end(TransformState {
            x: node.params.x,
            y: node.params.y,
            width: node.params.width,
            height: node.params.height,
            rotation: 0.0,
            scale_x: 2.0,
            scale_y: 1.0,
        });
    }

    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.width, 1600.0); // 200 * 2 * 2 * 2
    assert_eq!(stored.style.scale_x, 1.0);
}

#[test]
fn double_click_opens_edit_session_and_hides_node() {
    let mut s = session();
    let id = first_overlay_id(&s);

    assert!(s.double_click(overlay_center(&s)));
    assert!(s.is_editing());
    assert!(s.toolbar_position().is_none());
    assert!(!s.scene().node(id).unwrap().visible);

    let edit = s.edit_session().unwrap();
    assert_eq!(edit.overlay(), id);
    assert_eq!(edit.draft(), DEFAULT_TEXT);
    // Input box covers the node's screen box (identity viewport).
    assert_eq!(edit.input_box(), Rect::new(100.0, 225.0, 300.0, 275.0));
}

#[test]
fn edit_commit_writes_text_and_restores_node() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.double_click(overlay_center(&s));

    s.edit_input("Hello");
    assert!(s.edit_key(EditKey::Enter { shift: false }));

    assert!(!s.is_editing());
    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.text, "Hello");
    let node = s.scene().node(id).unwrap();
    assert!(node.visible);
    assert_eq!(node.params.text, "Hello");
    assert!(s.toolbar_position().is_some());
}

#[test]
fn shift_enter_inserts_newline_instead_of_committing() {
    let mut s = session();
    s.double_click(overlay_center(&s));
    s.edit_input("line");
    s.edit_key(EditKey::Enter { shift: true });
    assert!(s.is_editing());
    assert_eq!(s.edit_session().unwrap().draft(), "line\n");
}

#[test]
fn edit_cancel_discards_draft() {
    let mut s = session();
    let id = first_overlay_id(&s);
    let slide_id = s.deck().current_slide().unwrap().id;
    // Seed known text.
    s.select(id);
    s.begin_edit();
    s.edit_input("A");
    s.commit_edit();
    assert_eq!(
        s.deck().slide(slide_id).unwrap().text_overlay(id).unwrap().style.text,
        "A"
    );

    s.begin_edit();
    s.edit_input("B");
    assert!(s.edit_key(EditKey::Escape));

    assert!(!s.is_editing());
    let stored = s.deck().slide(slide_id).unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.text, "A");
    assert!(s.scene().node(id).unwrap().visible);
}

#[test]
fn opening_a_second_edit_session_commits_the_first() {
    let mut s = session();
    let first = first_overlay_id(&s);
    let second = s
        .add_overlay(Point::new(80.0, 80.0), OverlayStyle::default())
        .unwrap();

    s.select(first);
    s.begin_edit();
    s.edit_input("committed on switch");

    s.select(second);
    s.begin_edit();

    assert_eq!(s.edit_session().unwrap().overlay(), second);
    let slide = s.deck().current_slide().unwrap();
    assert_eq!(
        slide.text_overlay(first).unwrap().style.text,
        "committed on switch"
    );
    assert!(s.scene().node(first).unwrap().visible);
    assert!(!s.scene().node(second).unwrap().visible);
}

#[test]
fn slide_switch_clears_selection_and_discards_edit() {
    let mut s = session();
    let id = first_overlay_id(&s);
    let slide_id = s.deck().current_slide().unwrap().id;
    s.add_slide();
    s.switch_slide(0);

    s.select(id);
    s.begin_edit();
    s.edit_input("never committed");

    s.switch_slide(1);

    assert_eq!(s.selection(), None);
    assert!(!s.is_editing());
    assert!(s.toolbar_position().is_none());
    assert_eq!(
        s.deck().slide(slide_id).unwrap().text_overlay(id).unwrap().style.text,
        DEFAULT_TEXT
    );
}

#[test]
fn style_change_preserves_position_angle_and_scale() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);

    s.transform_start();
    s.transform_end(TransformState {
        x: 150.0,
        y: 170.0,
        width: 200.0,
        height: 50.0,
        rotation: 30.0,
        scale_x: 1.0,
        scale_y: 1.0,
    });

    assert!(s.set_style(StyleChange::ToggleBold));
    assert!(s.set_style(StyleChange::FontSize(48.0)));

    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.font_weight, FontWeight::Bold);
    assert_eq!(stored.style.font_size, 48.0);
    assert_eq!(stored.position, Point::new(150.0, 170.0));
    assert_eq!(stored.style.angle, 30.0);

    let node = s.scene().node(id).unwrap();
    assert_eq!((node.params.x, node.params.y), (150.0, 170.0));
    assert_eq!(node.params.rotation, 30.0);
    assert_eq!(node.params.font_style, "bold");
    assert_eq!(node.params.font_size, 48.0);
}

#[test]
fn bold_toggle_round_trips() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);
    s.set_style(StyleChange::ToggleBold);
    s.set_style(StyleChange::ToggleBold);
    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.font_weight, FontWeight::Normal);
    assert_eq!(s.scene().node(id).unwrap().params.font_style, "normal");
}

#[test]
fn box_width_change_recenters_offsets() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);
    assert!(s.set_style(StyleChange::BoxWidth(320.0)));

    let node = s.scene().node(id).unwrap();
    assert_eq!(node.params.width, 320.0);
    assert_eq!(node.params.offset_x, 160.0);
    let stored = s.deck().current_slide().unwrap().text_overlay(id).unwrap();
    assert_eq!(stored.style.width, 320.0);
}

#[test]
fn delete_removes_node_and_overlay_together() {
    let mut s = session();
    let id = first_overlay_id(&s);
    s.select(id);

    assert!(s.delete_selected());

    assert_eq!(s.selection(), None);
    assert!(s.toolbar_position().is_none());
    assert!(s.scene().node(id).is_none());
    assert!(s.deck().current_slide().unwrap().overlay(id).is_none());
    assert!(s.scene().stage().unwrap().is_empty());
}

#[test]
fn add_text_selects_the_new_overlay() {
    let mut s = session();
    let id = s.add_text().unwrap();
    assert_eq!(s.selection(), Some(id));
    assert!(s.scene().node(id).is_some());
    assert!(s.toolbar_position().is_some());
}

#[test]
fn set_aspect_ratio_resizes_the_stage() {
    let mut s = session();
    s.set_aspect_ratio(AspectRatio::R16x9);
    assert_eq!(
        s.scene().stage().unwrap().size(),
        AspectRatio::R16x9.dims()
    );
    assert_eq!(
        s.deck().current_slide().unwrap().aspect_ratio,
        AspectRatio::R16x9
    );
}

#[test]
fn set_background_color_applies_immediately() {
    let mut s = session();
    let ticket = s.set_background(Background::Color(Color::BLACK));
    assert!(ticket.is_none());
    assert!(matches!(
        s.scene().stage().unwrap().background(),
        crate::scene::stage::StageBackground::Color(c) if *c == Color::BLACK
    ));
}

#[test]
fn set_background_image_round_trips_through_ticket() {
    let mut s = session();
    let ticket = s
        .set_background(Background::Image("bg.png".into()))
        .unwrap();
    s.complete_background_load(
        ticket,
        Ok(crate::assets::decode::PreparedImage {
            width: 2,
            height: 2,
            rgba8_premul: std::sync::Arc::new(vec![0u8; 16]),
        }),
    );
    assert!(matches!(
        s.scene().stage().unwrap().background(),
        crate::scene::stage::StageBackground::Image(_)
    ));
}

#[test]
fn viewport_change_moves_the_toolbar() {
    let mut s = session();
    s.select_at(overlay_center(&s));
    let before = s.toolbar_position().unwrap();

    s.set_viewport(StageViewport {
        left: 100.0,
        top: 50.0,
        zoom: 1.0,
    });
    let after = s.toolbar_position().unwrap();
    assert_eq!(after.top, before.top + 50.0);
    assert_eq!(after.left, before.left + 100.0);
}
