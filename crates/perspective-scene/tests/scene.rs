use perspective_core::config::GridSettings;
use perspective_core::geom::{CanvasSize, Vec2};
use perspective_scene::config::SceneConfig;
use perspective_scene::construct::{TetrahedronSide, TriangleSide};
use perspective_scene::drag::CursorType;
use perspective_scene::{DragTarget, Scene, SceneError};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

fn assert_point(actual: Vec2, x: f64, y: f64, tol: f64) {
    assert_close(actual.x, x, tol);
    assert_close(actual.y, y, tol);
}

fn default_scene() -> Scene {
    Scene::new(SceneConfig::default(), CanvasSize::new(800.0, 600.0)).unwrap()
}

fn a_screen(scene: &Scene) -> Vec2 {
    scene.points()[scene.point_a()].screen()
}

fn b_screen(scene: &Scene) -> Vec2 {
    scene.points()[scene.point_b()].screen()
}

fn c_screen(scene: &Scene) -> Option<Vec2> {
    scene.triangle().point_c().map(|c| c.screen)
}

fn d_screen(scene: &Scene) -> Option<Vec2> {
    scene.tetrahedron().point_d().map(|d| d.screen)
}

#[test]
fn default_layout_builds_both_shapes() {
    let scene = default_scene();

    assert_point(a_screen(&scene), 200.0, 402.0, 1e-9);
    assert_point(b_screen(&scene), 600.0, 402.0, 1e-9);
    assert_close(scene.horizon().y_absolute(), 240.0, 1e-9);
    assert_point(scene.vanishing_point().screen(), 400.0, 240.0, 1e-9);
    assert_close(scene.camera().camera_x, 400.0, 1e-9);
    assert_close(scene.camera().eye_level, 240.0, 1e-9);

    assert_eq!(TriangleSide::Bottom, scene.triangle().side());
    assert_eq!(TetrahedronSide::Above, scene.tetrahedron().side());
    assert_point(c_screen(&scene).unwrap(), 400.0, 335.70, 1e-2);
    assert_point(d_screen(&scene).unwrap(), 400.0, 106.29, 2e-2);
    assert_eq!(None, scene.active_drag());
}

#[test]
fn derived_shapes_are_equilateral_and_regular_in_3d() {
    let scene = default_scene();

    let sides = scene.side_lengths_3d().unwrap();
    assert_close(sides.ab.value(), 246.914, 1e-3);
    assert_close(sides.bc.value(), sides.ab.value(), 1e-6);
    assert_close(sides.ca.value(), sides.ab.value(), 1e-6);
    assert_eq!("AB=246.9, BC=246.9, CA=246.9", sides.to_string());

    let edges = scene.edge_lengths_3d().unwrap();
    for edge in edges.all() {
        assert_close(edge.value(), sides.ab.value(), 1e-6);
    }

    let screen = scene.screen_side_lengths().unwrap();
    assert_close(screen.ab.value(), 400.0, 1e-9);
}

#[test]
fn recompute_is_idempotent() {
    let mut scene = default_scene();
    let before = scene.snapshot();
    scene.recompute_dependents();
    scene.recompute_dependents();
    assert_eq!(before, scene.snapshot());
}

#[test]
fn vanishing_point_wins_over_tetrahedron_and_horizon() {
    let mut scene = default_scene();
    assert_eq!(Some(DragTarget::Tetrahedron), scene.hit_test(Vec2::new(400.0, 200.0)));
    assert_eq!(Some(DragTarget::VanishingPoint), scene.hit_test(Vec2::new(400.0, 240.0)));
    assert_eq!(
        Some(DragTarget::VanishingPoint),
        scene.pointer_down(Vec2::new(400.0, 240.0))
    );
    assert_eq!(Some(DragTarget::VanishingPoint), scene.active_drag());
}

#[test]
fn free_point_beats_the_triangle_under_it() {
    let mut scene = default_scene();
    let a = a_screen(&scene);
    assert_eq!(
        Some(DragTarget::Point(scene.point_a())),
        scene.pointer_down(a)
    );
}

#[test]
fn dragging_a_point_recomputes_the_apex() {
    let mut scene = default_scene();
    let c_before = c_screen(&scene).unwrap();

    let a = a_screen(&scene);
    scene.pointer_down(a);
    assert!(scene.pointer_move(Vec2::new(150.0, 450.0)));
    scene.pointer_up();

    assert_point(a_screen(&scene), 150.0, 450.0, 1e-9);
    let c_after = c_screen(&scene).unwrap();
    assert!(c_after.distance(c_before) > 1.0);
    assert_eq!(None, scene.active_drag());
}

#[test]
fn triangle_drag_translates_both_base_points() {
    let mut scene = default_scene();
    let before = scene.side_lengths_3d().unwrap();

    assert_eq!(
        Some(DragTarget::Triangle),
        scene.pointer_down(Vec2::new(400.0, 380.0))
    );
    assert!(scene.pointer_move(Vec2::new(450.0, 380.0)));

    // A and B are nearer than the triangle's centroid, so they travel further on screen.
    let a = a_screen(&scene);
    let b = b_screen(&scene);
    assert!(a.x - 200.0 > 50.0);
    assert_close(a.x - 200.0, b.x - 600.0, 1e-9);
    assert_close(a.y, 402.0, 1e-9);
    assert_close(b.y, 402.0, 1e-9);

    let after = scene.side_lengths_3d().unwrap();
    assert_close(after.ab.value(), before.ab.value(), 1e-6);
    assert_close(after.bc.value(), before.ab.value(), 1e-6);
    assert_close(after.ca.value(), before.ab.value(), 1e-6);

    scene.pointer_up();
    assert!(!scene.pointer_move(Vec2::new(500.0, 380.0)));
    assert_close(a_screen(&scene).x, a.x, 1e-12);
}

#[test]
fn triangle_drag_toward_the_viewer_keeps_its_size() {
    let mut scene = default_scene();
    let before = scene.side_lengths_3d().unwrap();

    scene.pointer_down(Vec2::new(400.0, 380.0));
    scene.pointer_move(Vec2::new(400.0, 420.0));

    let a = a_screen(&scene);
    let b = b_screen(&scene);
    assert!(a.y > 402.0);
    assert_close(a.y, b.y, 1e-9);
    assert!(b.x - a.x > 400.0);

    let after = scene.side_lengths_3d().unwrap();
    assert_close(after.ab.value(), before.ab.value(), 1e-6);
    assert_close(after.bc.value(), before.ab.value(), 1e-6);

    let edges = scene.edge_lengths_3d().unwrap();
    for edge in edges.all() {
        assert_close(edge.value(), before.ab.value(), 1e-6);
    }
}

#[test]
fn tetrahedron_drag_translates_the_base() {
    let mut scene = default_scene();

    assert_eq!(
        Some(DragTarget::Tetrahedron),
        scene.pointer_down(Vec2::new(400.0, 200.0))
    );
    scene.pointer_move(Vec2::new(420.0, 200.0));

    let a = a_screen(&scene);
    let b = b_screen(&scene);
    assert!(a.x - 200.0 > 20.0);
    assert_close(a.x - 200.0, b.x - 600.0, 1e-9);
    assert_close(a.y, 402.0, 1e-9);
    assert!(d_screen(&scene).is_some());
}

fn assert_edges_unchanged(scene: &Scene, side: f64) {
    let edges = scene.edge_lengths_3d().unwrap();
    for edge in edges.all() {
        assert_close(edge.value(), side, 1e-6);
    }
}

#[test]
fn tetrahedron_drag_keeps_every_edge_length() {
    let mut scene = default_scene();
    let side = scene.side_lengths_3d().unwrap().ab.value();
    assert_edges_unchanged(&scene, side);

    scene.pointer_down(Vec2::new(400.0, 200.0));
    scene.pointer_move(Vec2::new(420.0, 200.0));
    assert_edges_unchanged(&scene, side);

    scene.pointer_move(Vec2::new(450.0, 225.0));
    let a = a_screen(&scene);
    assert!(a.x > 200.0);
    assert!(a.y > 402.0);
    assert_edges_unchanged(&scene, side);
}

#[test]
fn diagonal_triangle_drag_keeps_every_edge_length() {
    let mut scene = default_scene();
    let side = scene.side_lengths_3d().unwrap().ab.value();

    scene.pointer_down(Vec2::new(400.0, 380.0));
    scene.pointer_move(Vec2::new(430.0, 405.0));

    let a = a_screen(&scene);
    let b = b_screen(&scene);
    assert!(a.x > 200.0);
    assert!(a.y > 402.0);
    assert_close(a.y, b.y, 1e-9);
    assert_edges_unchanged(&scene, side);
}

#[test]
fn triangle_drag_stops_at_the_canvas_edge_without_shrinking() {
    let mut scene = default_scene();
    let side = scene.side_lengths_3d().unwrap().ab.value();

    scene.pointer_down(Vec2::new(400.0, 380.0));
    scene.pointer_move(Vec2::new(700.0, 380.0));

    let a = a_screen(&scene);
    let b = b_screen(&scene);
    assert!(b.x <= 794.0 + 1e-6);
    assert!(b.x > 793.9);
    assert_close(a.x - 200.0, b.x - 600.0, 1e-6);
    assert_close(a.y, 402.0, 1e-6);
    assert_close(scene.side_lengths_3d().unwrap().ab.value(), side, 1e-6);

    scene.pointer_move(Vec2::new(760.0, 380.0));
    assert!(b_screen(&scene).x <= 794.0 + 1e-6);
    assert_close(a_screen(&scene).x, a.x, 1e-3);
    assert_edges_unchanged(&scene, side);
}

#[test]
fn vanishing_point_drag_moves_the_camera_not_the_horizon() {
    let mut scene = default_scene();

    scene.pointer_down(Vec2::new(400.0, 240.0));
    scene.pointer_move(Vec2::new(500.0, 300.0));

    assert_point(scene.vanishing_point().screen(), 500.0, 240.0, 1e-9);
    assert_close(scene.camera().camera_x, 500.0, 1e-9);
    assert_close(scene.horizon().y_absolute(), 240.0, 1e-9);

    let c = c_screen(&scene).unwrap();
    assert!(c.x > 401.0);
    assert_close(c.y, 335.70, 1e-2);
}

#[test]
fn horizon_below_the_base_clears_dependents_until_it_returns() {
    let mut scene = default_scene();

    assert_eq!(
        Some(DragTarget::Horizon),
        scene.pointer_down(Vec2::new(100.0, 245.0))
    );
    scene.pointer_move(Vec2::new(100.0, 505.0));

    assert_close(scene.horizon().y_absolute(), 500.0, 1e-9);
    assert_point(scene.vanishing_point().screen(), 400.0, 500.0, 1e-9);
    assert_eq!(None, c_screen(&scene));
    assert_eq!(None, d_screen(&scene));
    assert!(scene.side_lengths_3d().is_none());
    assert!(scene.edge_lengths_3d().is_none());
    assert!(scene.triangle_construction().is_none());

    scene.pointer_move(Vec2::new(100.0, 245.0));
    assert_close(scene.horizon().y_absolute(), 240.0, 1e-9);
    assert_point(c_screen(&scene).unwrap(), 400.0, 335.70, 1e-2);
    assert!(d_screen(&scene).is_some());
}

#[test]
fn horizon_stays_inside_the_margin() {
    let mut scene = default_scene();
    scene.pointer_down(Vec2::new(100.0, 240.0));
    scene.pointer_move(Vec2::new(100.0, 5.0));
    assert_close(scene.horizon().y_absolute(), 20.0, 1e-9);
    assert_close(scene.vanishing_point().screen().y, 20.0, 1e-9);

    scene.pointer_move(Vec2::new(100.0, 2000.0));
    assert_close(scene.horizon().y_absolute(), 580.0, 1e-9);
}

#[test]
fn grid_snapping_applies_to_point_drags() {
    let mut scene = default_scene();
    scene.set_grid(GridSettings::new(true, false, 50));

    let a = a_screen(&scene);
    scene.pointer_down(a);
    scene.pointer_move(Vec2::new(226.0, 407.0));
    assert_point(a_screen(&scene), 250.0, 407.0, 1e-9);

    scene.set_grid(GridSettings::new(true, true, 1000));
    assert_eq!(100, scene.grid().size);
}

#[test]
fn coincident_base_points_clear_the_triangle() {
    let mut scene = default_scene();
    let b = scene.point_b();

    scene.move_point(b, Vec2::new(201.0, 402.0));
    assert_eq!(None, c_screen(&scene));
    assert_eq!(None, d_screen(&scene));

    scene.move_point(b, Vec2::new(600.0, 402.0));
    assert_point(c_screen(&scene).unwrap(), 400.0, 335.70, 1e-2);
    assert!(d_screen(&scene).is_some());
}

#[test]
fn toggling_sides_flips_the_apexes() {
    let mut scene = default_scene();

    scene.toggle_triangle_side();
    assert_eq!(TriangleSide::Top, scene.triangle().side());
    let c = scene.triangle().point_c().unwrap();
    assert_close(c.ground.z, 405.19, 1e-2);
    assert_close(c.screen.y, 594.0, 1e-9);
    assert!(d_screen(&scene).is_some());

    scene.toggle_triangle_side();
    assert_point(c_screen(&scene).unwrap(), 400.0, 335.70, 1e-2);

    scene.toggle_tetrahedron_side();
    assert_eq!(TetrahedronSide::Below, scene.tetrahedron().side());
    let d = scene.tetrahedron().point_d().unwrap();
    assert!(d.ground.y < 0.0);
    assert_close(d.screen.y, 594.0, 1e-9);

    scene.set_triangle_side(TriangleSide::Bottom);
    assert_eq!(TriangleSide::Bottom, scene.triangle().side());
}

#[test]
fn hiding_the_triangle_hides_the_tetrahedron() {
    let mut scene = default_scene();

    scene.set_triangle_visible(false);
    assert!(!scene.triangle().is_visible());
    assert!(!scene.tetrahedron().is_visible());
    assert_eq!(None, c_screen(&scene));
    assert_eq!(None, d_screen(&scene));
    assert_eq!(None, scene.pointer_down(Vec2::new(400.0, 380.0)));

    scene.set_tetrahedron_visible(true);
    assert!(!scene.tetrahedron().is_visible());

    scene.set_triangle_visible(true);
    assert!(c_screen(&scene).is_some());
    assert_eq!(None, d_screen(&scene));

    scene.set_tetrahedron_visible(true);
    assert!(d_screen(&scene).is_some());
}

#[test]
fn hiding_the_dragged_shape_ends_the_drag() {
    let mut scene = default_scene();
    scene.pointer_down(Vec2::new(400.0, 380.0));
    assert_eq!(Some(DragTarget::Triangle), scene.active_drag());

    scene.set_triangle_visible(false);
    assert_eq!(None, scene.active_drag());
    assert!(!scene.pointer_move(Vec2::new(450.0, 380.0)));
}

#[test]
fn locked_shapes_never_claim_a_drag() {
    let mut scene = default_scene();
    scene.set_triangle_draggable(false);
    assert_eq!(None, scene.pointer_down(Vec2::new(400.0, 380.0)));

    scene.set_tetrahedron_draggable(false);
    assert_eq!(None, scene.pointer_down(Vec2::new(400.0, 200.0)));
}

#[test]
fn cursor_reflects_what_is_under_the_pointer() {
    let mut scene = default_scene();

    assert_eq!(CursorType::Grab, scene.cursor_at(a_screen(&scene)));
    assert_eq!(CursorType::Grab, scene.cursor_at(Vec2::new(400.0, 380.0)));
    assert_eq!(CursorType::NsResize, scene.cursor_at(Vec2::new(100.0, 245.0)));
    assert_eq!(CursorType::Default, scene.cursor_at(Vec2::new(700.0, 100.0)));

    scene.set_triangle_draggable(false);
    scene.set_tetrahedron_draggable(false);
    assert_eq!(CursorType::NotAllowed, scene.cursor_at(Vec2::new(400.0, 338.0)));

    let a = a_screen(&scene);
    scene.pointer_down(a);
    assert_eq!(CursorType::Grabbing, scene.cursor_at(Vec2::new(700.0, 100.0)));
}

#[test]
fn leaving_the_canvas_ends_the_gesture() {
    let mut scene = default_scene();
    scene.pointer_down(Vec2::new(400.0, 380.0));
    scene.pointer_leave();
    assert_eq!(None, scene.active_drag());
    assert!(!scene.pointer_move(Vec2::new(450.0, 380.0)));
    assert_point(a_screen(&scene), 200.0, 402.0, 1e-9);
}

#[test]
fn pointer_down_on_empty_space_claims_nothing() {
    let mut scene = default_scene();
    assert_eq!(None, scene.pointer_down(Vec2::new(700.0, 100.0)));
    assert!(!scene.pointer_move(Vec2::new(710.0, 100.0)));
}

#[test]
fn resize_keeps_relative_layout() {
    let mut scene = default_scene();
    scene.resize(CanvasSize::new(1600.0, 1200.0)).unwrap();

    assert_point(a_screen(&scene), 400.0, 804.0, 1e-9);
    assert_close(scene.horizon().y_absolute(), 480.0, 1e-9);
    assert_point(scene.vanishing_point().screen(), 800.0, 480.0, 1e-9);
    assert_close(scene.camera().camera_x, 800.0, 1e-9);
    assert!(c_screen(&scene).is_some());

    let rel = scene.points()[scene.point_a()].relative();
    assert_point(rel, 0.25, 0.67, 1e-12);
}

#[test]
fn invalid_canvas_is_rejected_without_side_effects() {
    let mut scene = default_scene();
    let err = scene.resize(CanvasSize::new(0.0, 600.0)).unwrap_err();
    assert!(matches!(err, SceneError::InvalidCanvas { .. }));
    assert_eq!(CanvasSize::new(800.0, 600.0), scene.canvas());

    assert!(Scene::new(SceneConfig::default(), CanvasSize::new(800.0, -1.0)).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = SceneConfig::default();
    config.projection.focal_length = -5.0;
    let err = Scene::new(config, CanvasSize::new(800.0, 600.0)).unwrap_err();
    assert!(matches!(err, SceneError::Config(_)));

    let mut config = SceneConfig::default();
    config.interaction.point_radius = f64::NAN;
    assert!(Scene::new(config, CanvasSize::new(800.0, 600.0)).is_err());
}

#[test]
fn construction_overlay_follows_the_triangle() {
    let scene = default_scene();
    let overlay = scene.triangle_construction().unwrap();

    assert_point(overlay.midpoint_ab, 400.0, 402.0, 1e-9);
    assert_point(overlay.altitude_foot.unwrap(), 400.0, 402.0, 1e-9);

    let circle = overlay.circumcircle.unwrap();
    let c = c_screen(&scene).unwrap();
    assert_close(circle.center.distance(a_screen(&scene)), circle.radius, 1e-6);
    assert_close(circle.center.distance(c), circle.radius, 1e-6);
}

#[test]
fn layout_config_sets_the_initial_scene() {
    let mut config = SceneConfig::default();
    config.layout.triangle_side = TriangleSide::Top;
    config.layout.show_tetrahedron = false;

    let scene = Scene::new(config, CanvasSize::new(800.0, 600.0)).unwrap();
    assert_eq!(TriangleSide::Top, scene.triangle().side());
    assert!(!scene.tetrahedron().is_visible());
    assert_eq!(None, d_screen(&scene));
}
