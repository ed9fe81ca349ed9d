// Host-side tests for page routing, the node catalogue and the launcher map.

use otter_core::constants::{MAP_PAGE, NODE_COUNT};
use otter_core::map::{waypoints, MapConfig};
use otter_core::nodes::{node, PageKind, NODES};
use otter_core::scene::XrFeature;

#[test]
fn page_kind_from_path() {
    assert_eq!(PageKind::from_path("/"), Some(PageKind::Map));
    assert_eq!(PageKind::from_path(""), Some(PageKind::Map));
    assert_eq!(PageKind::from_path("/index.html"), Some(PageKind::Map));
    assert_eq!(PageKind::from_path("/node1.html"), Some(PageKind::Node(1)));
    assert_eq!(PageKind::from_path("/otter/node10.html"), Some(PageKind::Node(10)));
    assert_eq!(PageKind::from_path("node7.html"), Some(PageKind::Node(7)));

    assert_eq!(PageKind::from_path("/node0.html"), None);
    assert_eq!(PageKind::from_path("/node11.html"), None);
    assert_eq!(PageKind::from_path("/nodeX.html"), None);
    assert_eq!(PageKind::from_path("/about.html"), None);
}

#[test]
fn hrefs_round_trip() {
    assert_eq!(PageKind::Map.href(), MAP_PAGE);
    for n in 1..=NODE_COUNT {
        let href = PageKind::Node(n).href();
        assert_eq!(PageKind::from_path(&href), Some(PageKind::Node(n)));
    }
}

#[test]
fn nodes_are_numbered_in_order() {
    assert_eq!(NODES.len(), NODE_COUNT as usize);
    for (i, config) in NODES.iter().enumerate() {
        assert_eq!(config.id as usize, i + 1);
        assert_eq!(node(config.id).map(|c| c.id), Some(config.id));
    }
    assert!(node(0).is_none());
    assert!(node(11).is_none());
}

#[test]
fn next_buttons_chain_through_the_journey() {
    for config in &NODES[..9] {
        let next = config.next.unwrap();
        assert_eq!(next.href, PageKind::Node(config.id + 1).href());
    }
    assert_eq!(NODES[9].next.map(|n| n.href), Some(MAP_PAGE));
}

#[test]
fn every_node_has_narration_and_an_otter() {
    for config in &NODES {
        assert!(!config.narration.is_empty(), "node {}", config.id);
        assert!(config.avatar.model.path.ends_with("otter.glb"));
        assert!(config.avatar.speed > 0.0);
        assert!(config.char_delay_ms > 0);
    }
}

#[test]
fn scene_config_carries_lighting_and_sky() {
    let first = node(1).unwrap().scene_config();
    assert_eq!(first.required_features, vec![XrFeature::HitTest]);
    assert!(first.sky.is_some());
    assert_eq!(first.ar_button_label, Some(" Morning Departure"));

    let last = node(10).unwrap().scene_config();
    assert!(last.directional.is_some());
    assert!(last.sky.unwrap().sun_elevation_deg < 0.0);

    assert!(node(2).unwrap().scene_config().sky.is_none());
}

#[test]
fn waypoints_match_the_nodes() {
    let points = waypoints();
    assert_eq!(points.len(), NODES.len());
    for (point, config) in points.iter().zip(NODES.iter()) {
        assert_eq!(point.node, config.id);
        assert_eq!(point.title, config.title);
        assert_eq!(point.href(), format!("/node{}.html", config.id));
        // All along the Lee in Cork
        assert!((51.89..51.91).contains(&point.lat));
        assert!((-8.50..-8.45).contains(&point.lng));
    }
}

#[test]
fn map_defaults() {
    let map = MapConfig::default();
    assert_eq!(map.container_id, "map");
    assert_eq!(map.center, [51.899, -8.47]);
    assert_eq!(map.zoom, 14);
    assert!(map.tiles.url_template.contains("openstreetmap"));
    assert!(map.tooltip.permanent);
    assert!(map.route.source.ends_with(".geojson"));
}
