//! The ten node scenes as data.
//!
//! Everything that differs between nodes lives here; the session and its
//! rules read from a `&'static NodeConfig` and never branch on the node
//! number.

use glam::Vec3;

use crate::assets::AssetRequest;
use crate::constants::{
    ARRIVAL_EPSILON, AVATAR_FACING_YAW, DEFAULT_AVATAR_SPEED, FADE_OUT_MS, MAP_PAGE, NODE_COUNT,
    PUZZLE_SNAP_TOLERANCE,
};
use crate::geometry::GroundBend;
use crate::entity::PathChoice;
use crate::progress::WinCondition;
use crate::scene::{AmbientLight, DirectionalLight, SceneConfig, SkyConfig, XrFeature};
use crate::ui::{FactCard, Link, NavButton};

pub const OTTER_MODEL: AssetRequest = AssetRequest::model("/assets/models/otter.glb");
pub const HOLT_MODEL: AssetRequest = AssetRequest::model("/assets/models/holt.glb");
pub const TREE_MODEL: AssetRequest = AssetRequest::model("/assets/models/tree.glb");
pub const BOTTLE_MODEL: AssetRequest = AssetRequest::model("/assets/models/plastic_bottle.glb");

pub const BACK_TO_MAP: NavButton = NavButton {
    label: "← Back to Map",
    href: MAP_PAGE,
};

const DEFAULT_AMBIENT: AmbientLight = AmbientLight {
    sky_color: 0xffffff,
    ground_color: 0xbbbbff,
    intensity: 1.0,
    position: Vec3::new(0.5, 1.0, 0.25),
};

/// Backdrop curl shared by the 6x6 sheets with a bent far edge.
const CYCLORAMA: GroundBend = GroundBend {
    start: 2.0,
    span: 2.0,
    strength: 3.0,
    exponent: 2.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSpec {
    /// Image or looping muted video.
    pub texture: AssetRequest,
    pub bend: Option<GroundBend>,
    pub segments: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarSpec {
    pub model: AssetRequest,
    pub scale: f32,
    pub speed: f32,
    pub arrival_epsilon: f32,
    pub facing: f32,
}

impl AvatarSpec {
    const fn otter(scale: f32) -> Self {
        Self {
            model: OTTER_MODEL,
            scale,
            speed: DEFAULT_AVATAR_SPEED,
            arrival_epsilon: ARRIVAL_EPSILON,
            facing: AVATAR_FACING_YAW,
        }
    }

    const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// How the committed hit pose is adjusted before content is spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementShift {
    None,
    /// Pull the whole scene this far back towards the viewer.
    SceneTowardViewer(f32),
    /// Only the avatar steps this far back against the view direction.
    AvatarTowardViewer(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicStart {
    /// On the first tap anywhere in the scene.
    FirstTap,
    /// When the narration clip finishes.
    AfterNarration,
}

/// Looping background track owned by the page (an `<audio>` element).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundMusic {
    pub element_id: &'static str,
    pub start: MusicStart,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prompt {
    pub text: &'static str,
    /// Auto-hide after this many seconds.
    pub duration: Option<f32>,
}

impl Prompt {
    const fn sticky(text: &'static str) -> Self {
        Self {
            text,
            duration: None,
        }
    }

    const fn timed(text: &'static str, secs: f32) -> Self {
        Self {
            text,
            duration: Some(secs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoltReleaseRules {
    pub holt: AssetRequest,
    pub holt_scale: f32,
    pub holt_offset: Vec3,
    /// Relative to where the otter is released.
    pub continue_offset: Vec3,
    pub continue_radius: f32,
    pub tap_holt_prompt: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChoiceSpec {
    pub choice: PathChoice,
    pub model: AssetRequest,
    pub scale: f32,
    pub offset_x: f32,
    pub response: &'static str,
    pub audio: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathChoiceRules {
    pub walk_distance: f32,
    pub walk_speed: f32,
    /// How far the otter keeps wandering down the natural path.
    pub stroll_distance: f32,
    pub choice_ahead: f32,
    pub pick_size: f32,
    pub choices: [ChoiceSpec; 2],
    pub bottle_offsets: &'static [(f32, f32)],
    pub bottle_scale: f32,
    pub pollution_particles: u32,
    pub choose_prompt: &'static str,
    pub retry_label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodItem {
    pub name: &'static str,
    pub model: AssetRequest,
    pub image: &'static str,
    pub info: &'static str,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedingRules {
    pub foods: &'static [FoodItem],
    /// Scatter offsets from the origin.
    pub scatter_x: (f32, f32),
    pub scatter_z: (f32, f32),
    pub min_origin_distance: f32,
    pub half_extent: f32,
    pub collect_radius: f32,
    pub toast: &'static str,
    pub find_sound: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrustRules {
    pub trusting_model: AssetRequest,
    pub near: f32,
    pub far: f32,
    pub thought: FactCard,
    pub popup_lift: f32,
    pub trust_audio: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleRules {
    pub model: AssetRequest,
    pub scale: Vec3,
    pub distance: f32,
    pub lift: f32,
    pub health: u32,
    pub pick_radius: f32,
    pub walk_past: Vec3,
    pub impact: FactCard,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrashRules {
    pub count: usize,
    pub model: AssetRequest,
    pub scale: f32,
    pub scatter_x: (f32, f32),
    pub scatter_z: (f32, f32),
    pub hazard_radius: f32,
    pub exit_offset: Vec3,
    pub exit_radius: f32,
    pub warning: &'static str,
    pub retry_label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRules {
    pub count: usize,
    pub scatter_x: (f32, f32),
    pub scatter_z: (f32, f32),
    pub noise_radius: f32,
    pub exit_dx: f32,
    pub exit_dz: f32,
    pub exit_radius: f32,
    pub exit_clearance: f32,
    pub warning: &'static str,
    pub noise_audio: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PuzzleRules {
    pub pieces: &'static [AssetRequest],
    pub scale: f32,
    pub arc_radius: f32,
    pub arc_start_deg: f32,
    pub arc_end_deg: f32,
    pub slot_lift: f32,
    pub piece_lift: f32,
    pub piece_start_dz: f32,
    pub exit_offset: Vec3,
    pub pick_radius: f32,
    /// Radius of each slot's snap zone.
    pub snap_radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BalanceRules {
    pub tree: AssetRequest,
    pub building: AssetRequest,
    pub scale: f32,
    pub inner_x: f32,
    pub spread_x: f32,
    pub base_z: (f32, f32),
    pub spread_z: f32,
    pub bounds: f32,
    pub lift: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnHomeRules {
    pub holt: AssetRequest,
    pub holt_scale: f32,
    pub holt_offset: Vec3,
    pub home_radius: f32,
    pub fade_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeRules {
    HoltRelease(HoltReleaseRules),
    PathChoice(PathChoiceRules),
    Feeding(FeedingRules),
    Trust(TrustRules),
    Obstacle(ObstacleRules),
    Trash(TrashRules),
    Noise(NoiseRules),
    Puzzle(PuzzleRules),
    Balance(BalanceRules),
    ReturnHome(ReturnHomeRules),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeConfig {
    pub id: u8,
    pub title: &'static str,
    pub ar_button_label: Option<&'static str>,
    pub ambient: AmbientLight,
    pub sky: Option<SkyConfig>,
    pub directional: Option<DirectionalLight>,
    pub ground: Option<GroundSpec>,
    pub shift: PlacementShift,
    pub avatar: AvatarSpec,
    pub narration: &'static str,
    pub char_delay_ms: u64,
    pub facts: &'static [FactCard],
    pub prompt: Option<Prompt>,
    pub music: Option<BackgroundMusic>,
    pub win: WinCondition,
    pub next: Option<NavButton>,
    pub rules: NodeRules,
}

impl NodeConfig {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            required_features: vec![XrFeature::HitTest],
            optional_features: Vec::new(),
            pixel_ratio: None,
            ambient: self.ambient,
            sky: self.sky,
            directional: self.directional,
            ar_button_label: self.ar_button_label,
        }
    }
}

/// Look up a node by its 1-based number.
pub fn node(id: u8) -> Option<&'static NodeConfig> {
    NODES.iter().find(|n| n.id == id)
}

/// Which page the wasm entry point is booting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Map,
    Node(u8),
}

impl PageKind {
    /// `/`, `/index.html` -> map; `/nodeN.html` -> node N. Unknown paths
    /// yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        if name.is_empty() || name == "index.html" {
            return Some(PageKind::Map);
        }
        let n: u8 = name
            .strip_prefix("node")?
            .strip_suffix(".html")?
            .parse()
            .ok()?;
        (1..=NODE_COUNT).contains(&n).then_some(PageKind::Node(n))
    }

    pub fn href(&self) -> String {
        match self {
            PageKind::Map => MAP_PAGE.to_string(),
            PageKind::Node(n) => format!("/node{}.html", n),
        }
    }
}

static HOLT_FACTS: [FactCard; 2] = [
    FactCard::new(
        "What’s a Holt?",
        "What’s a Holt?",
        &["“A holt is an otter’s home—usually a tunnel or hidden space among roots, rocks, or even urban pipes. In cities, otters often adapt abandoned drains!”"],
    )
    .with_images(&["/assets/images/holt_diagram.png"]),
    FactCard::new(
        "Did You Know?",
        "Did You Know?",
        &["“Urban otters in Cork have been spotted as far upstream as Blackpool, using storm drains as travel routes.”"],
    )
    .with_link(Link {
        label: "View UCC tracking data",
        href: "https://www.ucc.ie/en/",
    }),
];

static CHEMICAL_FACTS: [FactCard; 1] = [FactCard::new(
    "Chemical Clues",
    "Chemical Clues",
    &["Otters rely on smell to detect danger. Even low-level pollutants in urban runoff can disrupt their movement and health."],
)
.with_images(&[
    "/assets/images/scent_overlay.png",
    "/assets/images/water_quality_gauge.png",
])];

static NOISE_FACTS: [FactCard; 1] = [FactCard::new(
    "Noise Pollution",
    "Noise Pollution",
    &["Constant urban noise can disrupt otters’ ability to rest, communicate, and hunt effectively. Prolonged exposure may drive them away from suitable habitats."],
)];

static PUZZLE_FACTS: [FactCard; 1] = [FactCard::new(
    "Why is memory important?",
    "Puzzle & Habitat",
    &["When habitats are broken into pieces, otters struggle to survive. Rebuilding connections helps restore balance in their ecosystem."],
)];

static BALANCE_FACTS: [FactCard; 1] = [FactCard::new(
    "Why Balance?",
    "Why Balance Matters?",
    &[
        "Too many buildings harm river habitats. Too many trees without care invite flooding.",
        "Balanced planning helps otters thrive!",
    ],
)
.with_images(&["/assets/images/eco_balance.png"])];

static REFLECTION_FACTS: [FactCard; 2] = [
    FactCard::new(
        "What Did You Learn?",
        "What Did You Learn?",
        &[
            "Otters live where we live..",
            "Every action leaves a mark on rivers.",
            "Balance between building and protecting is fragile",
            "The river is alive — and it remembers.",
        ],
    ),
    FactCard::new("Your Next Step?", "Your Next Step", &["Record wildlife sightings"]),
];

static FOODS: [FoodItem; 5] = [
    FoodItem {
        name: "Crayfish",
        model: AssetRequest::model("/assets/models/Crayfish.glb"),
        image: "/assets/images/food1.png",
        info: "Crayfish help control aquatic plant growth.",
        scale: 0.005,
    },
    FoodItem {
        name: "Crab",
        model: AssetRequest::model("/assets/models/Crab.glb"),
        image: "/assets/images/food2.png",
        info: "Crabs play a key role in the riverbed ecosystem.",
        scale: 0.005,
    },
    FoodItem {
        name: "Anguilla anguilla",
        model: AssetRequest::model("/assets/models/Anguilla_anguilla.glb"),
        image: "/assets/images/food3.png",
        info: "European eels migrate thousands of kilometers.",
        scale: 0.005,
    },
    FoodItem {
        name: "Salmo trutta",
        model: AssetRequest::model("/assets/models/Salmo_trutta.glb"),
        image: "/assets/images/food4.png",
        info: "Brown trout thrive in clean, oxygen-rich rivers.",
        scale: 0.05,
    },
    FoodItem {
        name: "Salmo salar",
        model: AssetRequest::model("/assets/models/Salmo_salar.glb"),
        image: "/assets/images/food5.png",
        info: "Atlantic salmon are an indicator of river health.",
        scale: 0.005,
    },
];

static PUZZLE_PIECES: [AssetRequest; 3] = [
    AssetRequest::model("/assets/models/Grass.glb"),
    AssetRequest::model("/assets/models/Rock.glb"),
    TREE_MODEL,
];

static BOTTLE_RING: [(f32, f32); 5] = [(-0.15, 0.0), (0.15, 0.0), (0.0, 0.15), (0.0, -0.15), (0.1, 0.1)];

pub static NODES: [NodeConfig; 10] = [
    NodeConfig {
        id: 1,
        title: "Node 1 – Blackpool Headwaters",
        ar_button_label: Some(" Morning Departure"),
        ambient: DEFAULT_AMBIENT,
        sky: Some(SkyConfig {
            scale: 450000.0,
            turbidity: 8.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.7,
            sun_elevation_deg: 5.0,
            sun_azimuth_deg: 90.0,
        }),
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::video("/assets/videos/node1_bg.mp4"),
            bend: Some(CYCLORAMA),
            segments: 50,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.5),
        narration: "The first light of day breaks over rooftops. Beneath the brambles, I stir. My holt is hidden from human eyes, tucked deep in the upper Bride’s shadows. The stream here is narrow, but it smells of life — earth, leaf, dew. I slide into the water. \nToday, like every day, I must patrol, mark, and feed. The city is loud, but I know where to listen. This river is mine. For now.\n",
        char_delay_ms: 60,
        facts: &HOLT_FACTS,
        prompt: Some(Prompt::sticky("Tap on the image to guide the otter forward.")),
        music: Some(BackgroundMusic {
            element_id: "bgm",
            start: MusicStart::FirstTap,
        }),
        win: WinCondition::ExitReached,
        next: Some(NavButton {
            label: "→ Enter Node 2",
            href: "/node2.html",
        }),
        rules: NodeRules::HoltRelease(HoltReleaseRules {
            holt: HOLT_MODEL,
            holt_scale: 0.02,
            holt_offset: Vec3::new(1.4, 0.06, 1.8),
            continue_offset: Vec3::new(-2.0, -0.01, -2.5),
            continue_radius: 0.5,
            tap_holt_prompt: "Tap the holt to release the otter.",
        }),
    },
    NodeConfig {
        id: 2,
        title: "Node 2 – Path Choose",
        ar_button_label: None,
        ambient: DEFAULT_AMBIENT,
        sky: None,
        directional: None,
        ground: None,
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.3),
        narration: "I move swiftly through the concrete runoff path, where the wild becomes tamed. A faster route, yes—but the smells are wrong. I catch hints of soap, petrol, detergent. This is where human waste spills into my world. It might save me time, but what else will it cost? Hunger, headache—or worse?",
        char_delay_ms: 60,
        facts: &CHEMICAL_FACTS,
        prompt: None,
        music: None,
        win: WinCondition::PathChosen(PathChoice::Natural),
        next: Some(NavButton {
            label: "→ Enter Node 3",
            href: "/node3.html",
        }),
        rules: NodeRules::PathChoice(PathChoiceRules {
            walk_distance: 0.4,
            walk_speed: 0.1,
            stroll_distance: 3.0,
            choice_ahead: 0.4,
            pick_size: 0.2,
            choices: [
                ChoiceSpec {
                    choice: PathChoice::Natural,
                    model: TREE_MODEL,
                    scale: 0.05,
                    offset_x: -0.25,
                    response: "You chose the natural path. It’s slower, but smells fresh and feels right.",
                    audio: "/assets/audio/natural_path.mp3",
                },
                ChoiceSpec {
                    choice: PathChoice::Polluted,
                    model: AssetRequest::model("/assets/models/path.glb"),
                    scale: 0.06,
                    offset_x: 0.25,
                    response: "You chose the fast path—but something’s off. The water stinks. It’s not safe here.",
                    audio: "/assets/audio/polluted_path.mp3",
                },
            ],
            bottle_offsets: &BOTTLE_RING,
            bottle_scale: 0.015,
            pollution_particles: 150,
            choose_prompt: "Which path will you take?\nLeft: slower but natural. Right: faster but polluted.",
            retry_label: "Try the other path",
        }),
    },
    NodeConfig {
        id: 3,
        title: "Node 3 – Feeding Scene",
        ar_button_label: None,
        ambient: DEFAULT_AMBIENT,
        sky: Some(SkyConfig {
            scale: 1000.0,
            turbidity: 8.0,
            rayleigh: 3.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.7,
            sun_elevation_deg: 5.0,
            sun_azimuth_deg: 135.0,
        }),
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::video("/assets/videos/node3_bg.mp4"),
            bend: Some(GroundBend {
                start: 0.5,
                span: 5.5,
                strength: 5.0,
                exponent: 1.5,
            }),
            segments: 80,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.4).with_speed(0.4),
        narration: "A splash. Then another. Trout. I dive—quick, silent, precise.\nThe Lee is kind to me today. The water tastes clean, alive.\nBut it isn’t always this way...\n\n Help me find all 5 food items!",
        char_delay_ms: 40,
        facts: &[],
        prompt: Some(Prompt::sticky("Tap to guide the otter to eat the food.")),
        music: Some(BackgroundMusic {
            element_id: "bgmAudio",
            start: MusicStart::AfterNarration,
        }),
        win: WinCondition::AllCollected,
        next: Some(NavButton {
            label: "→ Continue to Node 4",
            href: "/node4.html",
        }),
        rules: NodeRules::Feeding(FeedingRules {
            foods: &FOODS,
            scatter_x: (-2.0, 2.0),
            scatter_z: (0.5, 3.5),
            min_origin_distance: 0.8,
            half_extent: 3.0,
            collect_radius: 0.25,
            toast: "🎉 Congrats! You found all the food!",
            find_sound: "findSound",
        }),
    },
    NodeConfig {
        id: 4,
        title: "Node 4 – Trust Encounter",
        ar_button_label: None,
        ambient: DEFAULT_AMBIENT,
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node4_bg.png"),
            bend: Some(CYCLORAMA),
            segments: 50,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec {
            facing: 0.0,
            ..AvatarSpec::otter(0.6)
        },
        narration: "I see you. You see me. Stillness. Then a soft blink. You are not loud, not fast. I feel no threat. I stay. For now.",
        char_delay_ms: 50,
        facts: &[],
        prompt: Some(Prompt::sticky("Try moving closer to the otter... see what it’s thinking.")),
        music: None,
        win: WinCondition::Immediate,
        next: Some(NavButton {
            label: "→ Go to Node 5",
            href: "/node5.html",
        }),
        rules: NodeRules::Trust(TrustRules {
            trusting_model: AssetRequest::model("/assets/models/trust.glb"),
            near: 0.8,
            far: 1.5,
            thought: FactCard::new(
                "",
                "Otter’s Thought",
                &["You’re quiet… I think I trust you. Just a little. Don’t scare me. Don’t pollute. Be still, and I’ll come closer."],
            ),
            popup_lift: 0.5,
            trust_audio: "trustAudio",
        }),
    },
    NodeConfig {
        id: 5,
        title: "Node 5 – Obstacle Removal",
        ar_button_label: None,
        ambient: DEFAULT_AMBIENT,
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node5_bg.png"),
            bend: Some(CYCLORAMA),
            segments: 50,
        }),
        shift: PlacementShift::AvatarTowardViewer(0.3),
        avatar: AvatarSpec::otter(0.5),
        narration: "A wall. Not of rock or root, but of human hands. Pipes. Fences. Trash. I cannot pass — unless they choose to help.",
        char_delay_ms: 60,
        facts: &[],
        prompt: Some(Prompt::sticky("Tap the obstacle to help the otter move forward.")),
        music: None,
        win: WinCondition::ObstacleCleared,
        next: Some(NavButton {
            label: "→ Go to Node 6",
            href: "/node6.html",
        }),
        rules: NodeRules::Obstacle(ObstacleRules {
            model: AssetRequest::model("/assets/models/wall.glb"),
            scale: Vec3::new(1.2, 0.2, 0.2),
            distance: 1.5,
            lift: 0.01,
            health: 3,
            pick_radius: 0.6,
            walk_past: Vec3::new(0.0, 0.0, 0.5),
            impact: FactCard::new(
                "",
                "Urban Obstacles",
                &["More than 60% of otter habitats in Cork have been disrupted by construction in the past 5 years."],
            )
            .with_images(&["/assets/images/urban_block.png"]),
        }),
    },
    NodeConfig {
        id: 6,
        title: "Node 6 – Trash Avoidance",
        ar_button_label: None,
        ambient: DEFAULT_AMBIENT,
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node6_bg.png"),
            bend: None,
            segments: 1,
        }),
        shift: PlacementShift::SceneTowardViewer(0.8),
        avatar: AvatarSpec::otter(0.5),
        narration: "So much trash... I need to find a clean path. I cannot rest in filth. There must be space, somewhere, where I can feel safe.",
        char_delay_ms: 60,
        facts: &[],
        prompt: Some(Prompt::timed("Tap to guide the otter. Avoid the trash!", 6.0)),
        music: None,
        win: WinCondition::ExitReached,
        next: Some(NavButton {
            label: "→ Continue to Node 7",
            href: "/node7.html",
        }),
        rules: NodeRules::Trash(TrashRules {
            count: 8,
            model: BOTTLE_MODEL,
            scale: 0.1,
            scatter_x: (-2.8, 2.8),
            scatter_z: (-2.8, -0.5),
            hazard_radius: 0.3,
            exit_offset: Vec3::new(0.0, 0.01, -2.5),
            exit_radius: 0.3,
            warning: "Too much trash here... Try another way.",
            retry_label: "Restart",
        }),
    },
    NodeConfig {
        id: 7,
        title: "Node 7 – Noise Escape",
        ar_button_label: None,
        ambient: AmbientLight {
            position: Vec3::new(0.0, 1.0, 0.0),
            ..DEFAULT_AMBIENT
        },
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node7_bg.png"),
            bend: None,
            segments: 1,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.5),
        narration: "The city hums around me. But too much noise makes it hard to rest. I must find quiet, even here.",
        char_delay_ms: 60,
        facts: &NOISE_FACTS,
        prompt: Some(Prompt::timed("Tap to guide the otter. Avoid the noisy zones.", 6.0)),
        music: None,
        win: WinCondition::ExitReached,
        next: Some(NavButton {
            label: "→ Enter Node 8",
            href: "/node8.html",
        }),
        rules: NodeRules::Noise(NoiseRules {
            count: 4,
            scatter_x: (-2.5, 2.5),
            scatter_z: (-2.5, 1.5),
            noise_radius: 0.6,
            exit_dx: 2.0,
            exit_dz: -2.5,
            exit_radius: 0.5,
            exit_clearance: 3.0,
            warning: "Too noisy here... Try another way.",
            noise_audio: "/assets/audio/city_noise.mp3",
        }),
    },
    NodeConfig {
        id: 8,
        title: "Node 8 – Puzzle Rebuild",
        ar_button_label: None,
        ambient: AmbientLight {
            position: Vec3::new(0.0, 1.0, 0.0),
            ..DEFAULT_AMBIENT
        },
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node8_bg.png"),
            bend: None,
            segments: 1,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec {
            arrival_epsilon: 0.03,
            ..AvatarSpec::otter(0.5)
        },
        narration: "Something has changed.  \nThe pieces of my world—once whole—are now scattered.  \nBut here, among the cracks and quiet, there is a chance to mend.  \nWith your help, I can rebuild what was broken.  \nOne piece at a time.",
        char_delay_ms: 60,
        facts: &PUZZLE_FACTS,
        prompt: Some(Prompt::sticky("Drag puzzle blocks to help the otter rebuild.")),
        music: None,
        win: WinCondition::ExitReached,
        next: Some(NavButton {
            label: "→ Enter Node 9",
            href: "/node9.html",
        }),
        rules: NodeRules::Puzzle(PuzzleRules {
            pieces: &PUZZLE_PIECES,
            scale: 0.3,
            arc_radius: 1.5,
            arc_start_deg: -60.0,
            arc_end_deg: 60.0,
            slot_lift: 0.01,
            piece_lift: 0.05,
            piece_start_dz: 1.5,
            exit_offset: Vec3::new(0.0, 0.01, -2.5),
            pick_radius: 0.25,
            snap_radius: PUZZLE_SNAP_TOLERANCE,
        }),
    },
    NodeConfig {
        id: 9,
        title: "Node 9 – Eco Balance",
        ar_button_label: None,
        ambient: AmbientLight {
            ground_color: 0x444444,
            ..DEFAULT_AMBIENT
        },
        sky: None,
        directional: None,
        ground: Some(GroundSpec {
            texture: AssetRequest::texture("/assets/images/node9_bg.png"),
            bend: None,
            segments: 1,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.5),
        narration: "So much has changed. The forest gives way to roads, the stream trickles beneath steel and stone. But balance is still possible. Will you build? Or will you grow?",
        char_delay_ms: 60,
        facts: &BALANCE_FACTS,
        prompt: None,
        music: None,
        win: WinCondition::Balance { threshold: 3 },
        next: Some(NavButton {
            label: "→ Finish",
            href: "/node10.html",
        }),
        rules: NodeRules::Balance(BalanceRules {
            tree: TREE_MODEL,
            building: AssetRequest::model("/assets/models/Building.glb"),
            scale: 0.4,
            inner_x: 0.6,
            spread_x: 1.5,
            base_z: (-0.5, 1.5),
            spread_z: 1.5,
            bounds: 2.7,
            lift: 0.01,
        }),
    },
    NodeConfig {
        id: 10,
        title: "Node 10 – Final Reflection",
        ar_button_label: Some("Ending journey"),
        ambient: AmbientLight {
            ground_color: 0x444444,
            ..DEFAULT_AMBIENT
        },
        sky: Some(SkyConfig {
            scale: 450000.0,
            turbidity: 2.0,
            rayleigh: 0.2,
            mie_coefficient: 0.0005,
            mie_directional_g: 0.8,
            sun_elevation_deg: -5.0,
            sun_azimuth_deg: 180.0,
        }),
        directional: Some(DirectionalLight {
            color: 0x8899ff,
            intensity: 0.2,
            position: Vec3::new(0.0, 1.0, -1.0),
        }),
        ground: Some(GroundSpec {
            texture: AssetRequest::video("/assets/videos/node1_bg.mp4"),
            bend: Some(CYCLORAMA),
            segments: 50,
        }),
        shift: PlacementShift::None,
        avatar: AvatarSpec::otter(0.5),
        narration: "The water carries me home. \nThe river narrows, the city quiets. \nEvery step I take brings me closer to the holt, \nwhere roots wrap around stone, where shadows keep me safe.  \nWithout you, my path will fade.  \nWith you, the river will live.  \nGuide me home, one last time.",
        char_delay_ms: 60,
        facts: &REFLECTION_FACTS,
        prompt: Some(Prompt::sticky("Tap on the ground to guide the otter back to its holt.")),
        music: None,
        win: WinCondition::JourneyEnded,
        next: Some(NavButton {
            label: "→ Recap the Journey",
            href: MAP_PAGE,
        }),
        rules: NodeRules::ReturnHome(ReturnHomeRules {
            holt: HOLT_MODEL,
            holt_scale: 0.02,
            holt_offset: Vec3::new(1.2, 0.05, 2.0),
            home_radius: 0.8,
            fade_ms: FADE_OUT_MS,
        }),
    },
];
