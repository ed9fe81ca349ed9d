//! The launcher map: where each node is along the river and how the map is
//! dressed.

use crate::nodes::PageKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub node: u8,
    pub title: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn href(&self) -> String {
        PageKind::Node(self.node).href()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileLayer {
    pub url_template: &'static str,
    pub attribution: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconSpec {
    pub url: &'static str,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipSpec {
    pub permanent: bool,
    pub direction: &'static str,
    pub offset: [i32; 2],
    pub class_name: &'static str,
}

/// Styling for the river overlay loaded from GeoJSON.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStyle {
    pub source: &'static str,
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub class_name: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapConfig {
    pub container_id: &'static str,
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: TileLayer,
    pub icon: IconSpec,
    pub tooltip: TooltipSpec,
    pub route: RouteStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map",
            center: [51.899, -8.47],
            zoom: 14,
            tiles: TileLayer {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenStreetMap contributors",
            },
            icon: IconSpec {
                url: "/assets/images/icon.png",
                size: [40, 40],
                anchor: [20, 40],
                popup_anchor: [0, -35],
            },
            tooltip: TooltipSpec {
                permanent: true,
                direction: "top",
                offset: [0, -40],
                class_name: "node-tooltip",
            },
            route: RouteStyle {
                source: "/assets/geo/lee-river.geojson",
                color: "#3399ff",
                weight: 5,
                opacity: 0.9,
                class_name: "river-path",
            },
        }
    }
}

static WAYPOINTS: [Waypoint; 10] = [
    Waypoint { node: 1, title: "Node 1 – Blackpool Headwaters", lat: 51.89830, lng: -8.49079 },
    Waypoint { node: 2, title: "Node 2 – Path Choose", lat: 51.898920, lng: -8.483751 },
    Waypoint { node: 3, title: "Node 3 – Feeding Scene", lat: 51.901414, lng: -8.477903 },
    Waypoint { node: 4, title: "Node 4 – Trust Encounter", lat: 51.900676, lng: -8.470667 },
    Waypoint { node: 5, title: "Node 5 – Obstacle Removal", lat: 51.900199, lng: -8.465996 },
    Waypoint { node: 6, title: "Node 6 – Trash Avoidance", lat: 51.899299, lng: -8.459837 },
    Waypoint { node: 7, title: "Node 7 – Noise Escape", lat: 51.898432, lng: -8.463226 },
    Waypoint { node: 8, title: "Node 8 – Puzzle Rebuild", lat: 51.896565, lng: -8.468473 },
    Waypoint { node: 9, title: "Node 9 – Eco Balance", lat: 51.895732, lng: -8.472196 },
    Waypoint { node: 10, title: "Node 10 – Final Reflection", lat: 51.895329, lng: -8.477268 },
];

/// Node markers in journey order.
pub fn waypoints() -> &'static [Waypoint] {
    &WAYPOINTS
}
