use super::*;

fn particle(vel: Vec2, group: Group) -> Particle {
    Particle::new(Vec2::new(1.5, 1.5), vel, group)
}

fn view<'a>(particles: &'a [Particle], sites: &'a [Vec2], paused: bool) -> FrameView<'a> {
    FrameView {
        particles,
        fixed_sites: sites,
        box_width: 8.0,
        box_height: 4.0,
        obstacle: Some(Vec2::new(6.5, 2.5)),
        obstacle_radius: 1.0,
        paused,
        label_overlay: if paused { Some("HI") } else { None },
        thermostat_enabled: true,
        thermostat_mode: ThermostatKind::Rescale,
        sub_steps_per_frame: 5,
        target_temperature: 1.0,
    }
}

#[test]
fn alpha_maps_local_temperature_onto_range() {
    assert_eq!(particle_alpha(&particle(Vec2::zero(), Group::Bulk), 1.0), 50);
    // 0.5 |v|^2 = 3 = 3 T_target
    let hot = particle(Vec2::new(6f32.sqrt(), 0.0), Group::Bulk);
    assert_eq!(particle_alpha(&hot, 1.0), 255);
    let very_hot = particle(Vec2::new(100.0, 0.0), Group::Bulk);
    assert_eq!(particle_alpha(&very_hot, 1.0), 255);
    // halfway: 0.5 |v|^2 = 1.5
    let warm = particle(Vec2::new(3f32.sqrt(), 0.0), Group::Bulk);
    let a = particle_alpha(&warm, 1.0);
    assert!((152..=153).contains(&a), "alpha = {}", a);
}

#[test]
fn groups_get_distinct_hues() {
    let bulk = particle_color(&particle(Vec2::zero(), Group::Bulk), 1.0);
    let label = particle_color(&particle(Vec2::zero(), Group::Label), 1.0);
    // bulk is blue dominant, label red dominant
    assert!(bulk[2] > bulk[0], "bulk = {:?}", bulk);
    assert!(label[0] > label[2], "label = {:?}", label);
    assert_eq!(bulk[3], 50);
    let obstacle = obstacle_color();
    assert!(obstacle[1] > obstacle[0] && obstacle[1] > obstacle[2]);
}

#[test]
fn obstacle_hidden_while_paused() {
    let v = view(&[], &[], true);
    assert_eq!(v.visible_obstacle(), None);
    let v = view(&[], &[], false);
    assert_eq!(v.visible_obstacle(), Some(Vec2::new(6.5, 2.5)));
}

#[test]
fn rasterize_places_glyphs_in_cells() {
    let particles = [
        particle(Vec2::zero(), Group::Label),
        Particle::new(Vec2::new(3.2, 0.1), Vec2::zero(), Group::Bulk),
    ];
    let sites = [Vec2::new(0.5, 3.5)];
    let grid = AsciiSink::<Vec<u8>>::rasterize(&view(&particles, &sites, false));
    assert_eq!(grid.len(), 4);
    assert_eq!(grid[0].len(), 8);
    assert_eq!(grid[1][1], '#');
    assert_eq!(grid[0][3], '.');
    assert_eq!(grid[3][0], '|');
    assert_eq!(grid[2][6], '@');
}

#[test]
fn ascii_sink_writes_every_nth_frame() {
    let particles = [particle(Vec2::zero(), Group::Bulk)];
    let mut sink = AsciiSink::new(Vec::new(), 2);
    let v = view(&particles, &[], true);
    sink.present(&v);
    sink.present(&v);
    sink.present(&v);
    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.matches("[paused: HI]").count(), 2);
    assert!(out.contains("+--------+"));
}
