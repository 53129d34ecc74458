use std::f32::consts::PI;

use cgmath::Vector3;
use matcap_flow::{
    config::SceneConfig,
    scene::SceneDriver,
    timeline::{Placement, Property, ScrollBounds, ScrollTimeline, Transform, VirtualScroll},
    tween::Ease,
};

use crate::common::test_utils::{assert_close, assert_vec3_close};

mod common;

fn base() -> Transform {
    SceneConfig::default().base
}

#[test]
fn dog_timeline_layout() {
    let timeline = SceneConfig::default().scroll_timeline();
    assert_eq!(timeline.segments().len(), 4);
    assert_eq!(timeline.label("third"), Some(1.0));
    assert_close(timeline.duration(), 1.5);
    // both "third" segments start together
    assert_eq!(timeline.segments()[2].start, timeline.segments()[3].start);
}

#[test]
fn top_of_page_is_the_base_transform() {
    let timeline = SceneConfig::default().scroll_timeline();
    let top = timeline.sample(0.0);
    assert_vec3_close(top.position, base().position);
    assert_vec3_close(top.rotation, Vector3::new(0.0, PI / 8.0, 0.0));
}

#[test]
fn end_of_page_applies_every_segment() {
    let timeline = SceneConfig::default().scroll_timeline();
    let end = timeline.sample(1.0);
    assert_vec3_close(end.position, Vector3::new(-0.25, -0.6, -0.2));
    assert_vec3_close(end.rotation, Vector3::new(0.0, PI / 8.0 - PI, -PI / 20.0));
}

#[test]
fn first_third_only_moves_the_position() {
    let timeline = SceneConfig::default().scroll_timeline();
    let t = timeline.sample(1.0 / 3.0);
    assert_vec3_close(t.position, base().position + Vector3::new(0.0, 0.05, -0.5));
    assert_vec3_close(t.rotation, base().rotation);
}

#[test]
fn scrubbing_back_and_forth_is_deterministic() {
    let timeline = SceneConfig::default().scroll_timeline();
    let fresh = timeline.sample(0.7);
    for p in [0.0, 0.3, 1.0, 0.9, 0.1, 0.0, 0.5] {
        timeline.sample(p);
    }
    assert_eq!(timeline.sample(0.7), fresh);
    assert_eq!(timeline.sample(0.0), timeline.sample(-3.0));
    assert_eq!(timeline.sample(1.0), timeline.sample(8.0));
}

#[test]
fn absolute_placement_and_custom_duration() {
    let timeline = ScrollTimeline::new(Transform::default())
        .to(Property::Position, Vector3::new(1.0, 0.0, 0.0), Placement::Sequential)
        .to_with(
            Property::Position,
            Vector3::new(0.0, 2.0, 0.0),
            Placement::At(0.25),
            1.0,
            Ease::Linear,
        );
    assert_close(timeline.duration(), 1.25);
    let t = timeline.sample_time(0.75);
    assert_close(t.position.x, 1.0);
    assert_close(t.position.y, 1.0);
}

#[test]
fn anchor_bounds_map_scroll_to_progress() {
    let bounds = ScrollBounds::from_anchors(100.0, 2100.0, 500.0);
    assert_eq!(bounds, ScrollBounds::new(100.0, 1600.0));
    assert_close(bounds.progress(0.0), 0.0);
    assert_close(bounds.progress(100.0), 0.0);
    assert_close(bounds.progress(850.0), 0.5);
    assert_close(bounds.progress(5000.0), 1.0);
}

#[test]
fn empty_scroll_range_jumps() {
    let bounds = ScrollBounds::new(10.0, 10.0);
    assert_eq!(bounds.progress(9.0), 0.0);
    assert_eq!(bounds.progress(10.0), 1.0);
}

#[test]
fn virtual_scroll_clamps_to_the_page() {
    let mut scroll = VirtualScroll::new(4, 100.0);
    assert_close(scroll.scroll_by(-50.0), 0.0);
    assert_close(scroll.scroll_by(150.0), 0.5);
    assert_close(scroll.scroll_by(1e6), 1.0);
    assert_close(scroll.offset(), 300.0);
}

#[test]
fn virtual_scroll_keeps_progress_on_resize() {
    let mut scroll = VirtualScroll::new(4, 100.0);
    scroll.scroll_by(150.0);
    scroll.resize(200.0);
    assert_close(scroll.progress(), 0.5);
    assert_close(scroll.offset(), 300.0);
}

#[test]
fn driver_follows_scroll_progress() {
    let config = SceneConfig::default();
    let mut driver = SceneDriver::new(&config);
    driver.set_scroll_progress(0.5);
    assert_eq!(driver.root_transform(), config.scroll_timeline().sample(0.5));

    driver.set_scroll_progress(f32::NAN);
    assert_eq!(driver.scroll_progress(), 0.5);
    driver.set_scroll_progress(2.0);
    assert_eq!(driver.scroll_progress(), 1.0);

    driver.resize(100.0);
    driver.scroll_by(-1e6);
    assert_eq!(driver.scroll_progress(), 0.0);
    driver.scroll_by(150.0);
    assert_close(driver.scroll_progress(), 0.5);
}
