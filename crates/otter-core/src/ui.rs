//! Declarative view model for a node page.
//!
//! [`ViewState`] is rebuilt from session state on demand; the front-end
//! renders it into the page's fixed slots and its own overlay elements and
//! sends clicks back as [`UiAction`]s.

use glam::Vec3;

use crate::geometry::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

/// Static content of an informational popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FactCard {
    /// Button caption (fact cards only).
    pub label: &'static str,
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    pub images: &'static [&'static str],
    pub link: Option<Link>,
}

impl FactCard {
    pub const fn new(label: &'static str, title: &'static str, paragraphs: &'static [&'static str]) -> Self {
        Self {
            label,
            title,
            paragraphs,
            images: &[],
            link: None,
        }
    }

    pub const fn with_images(mut self, images: &'static [&'static str]) -> Self {
        self.images = images;
        self
    }

    pub const fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub images: Vec<String>,
    pub link: Option<Link>,
    /// World point the popup should float over; `None` centres it.
    pub anchor: Option<Vec3>,
}

impl Popup {
    pub fn from_card(card: &FactCard) -> Self {
        Self {
            title: card.title.to_string(),
            paragraphs: card.paragraphs.iter().map(|p| p.to_string()).collect(),
            images: card.images.iter().map(|i| i.to_string()).collect(),
            link: card.link,
            anchor: None,
        }
    }

    pub fn anchored(mut self, at: Vec3) -> Self {
        self.anchor = Some(at);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    ShowFact(usize),
    ClosePopup,
    /// "Restart" / "Try the other path".
    Retry,
    AddTree,
    AddBuilding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub action: UiAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavButton {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressBar {
    pub current: u32,
    pub total: u32,
}

impl ProgressBar {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f32 / self.total as f32).min(1.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Placement reticle pose, while the reticle is shown.
    pub reticle: Option<Pose>,
    pub prompt: Option<&'static str>,
    pub info_box: bool,
    pub narration: String,
    pub facts: Vec<ActionButton>,
    pub popup: Option<Popup>,
    pub warning: Option<&'static str>,
    pub toast: Option<&'static str>,
    pub progress: Option<ProgressBar>,
    pub balance_fill: Option<f32>,
    pub actions: Vec<ActionButton>,
    pub retry: Option<ActionButton>,
    pub next: Option<NavButton>,
    pub back: Option<NavButton>,
    /// Current pulse scale of the noise rings.
    pub ripple_scale: Option<f32>,
}
