use serde::{Deserialize, Serialize};

use crate::api::types::{ElementId, Rect};

/// What an element is for. An element can carry several roles
/// (a magnetic button is usually also a hover trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The lagging ring that follows the pointer.
    CursorOuter,
    /// The dot that sits exactly under the pointer.
    CursorInner,
    Preloader,
    /// The percentage readout inside the preloader.
    Counter,
    HeroSmall,
    HeroLarge,
    HeroSub,
    Magnetic,
    HoverTrigger,
    Marquee,
    Reveal,
    /// A same-page link; its `href` names the fragment.
    Anchor,
    /// Host surface for the particle renderer.
    ParticleContainer,
}

/// Animatable properties of an element's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    XPercent,
    YPercent,
    Scale,
    Opacity,
}

/// Transform and opacity the host applies to the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTransform {
    pub x: f32,
    pub y: f32,
    pub x_percent: f32,
    pub y_percent: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl ElementTransform {
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::XPercent => self.x_percent,
            Property::YPercent => self.y_percent,
            Property::Scale => self.scale,
            Property::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::XPercent => self.x_percent = value,
            Property::YPercent => self.y_percent = value,
            Property::Scale => self.scale = value,
            Property::Opacity => self.opacity = value,
        }
    }
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Visual skin of the follower ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverSkin {
    #[default]
    Default,
    HoverActive,
}

/// A page element known to the engine.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    /// DOM id, used to resolve `#fragment` links.
    pub dom_id: Option<String>,
    /// Link target for anchors.
    pub href: Option<String>,
    pub roles: Vec<Role>,
    /// Layout box in document coordinates (untransformed).
    pub rect: Rect,
    pub transform: ElementTransform,
    pub skin: HoverSkin,
    pub hidden: bool,
}

impl Element {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            dom_id: None,
            href: None,
            roles: Vec::new(),
            rect: Rect::default(),
            transform: ElementTransform::default(),
            skin: HoverSkin::Default,
            hidden: false,
        }
    }

    pub fn with_dom_id(mut self, dom_id: impl Into<String>) -> Self {
        self.dom_id = Some(dom_id.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Flat element storage. Pages hold tens of elements, not thousands.
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            elements: Vec::with_capacity(64),
        }
    }

    /// Add an element. An existing element with the same id is replaced.
    pub fn insert(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(slot) => *slot = element,
            None => self.elements.push(element),
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    /// Find the element whose DOM id matches exactly.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.dom_id.as_deref() == Some(dom_id))
    }

    /// First element carrying `role`, in registration order.
    pub fn first_with_role(&self, role: Role) -> Option<ElementId> {
        self.elements.iter().find(|e| e.has_role(role)).map(|e| e.id)
    }

    /// Every element carrying `role`, in registration order.
    pub fn ids_with_role(&self, role: Role) -> Vec<ElementId> {
        self.elements.iter().filter(|e| e.has_role(role)).map(|e| e.id).collect()
    }

    /// Largest layout bottom edge, i.e. the document height.
    pub fn content_height(&self) -> f32 {
        self.elements.iter().map(|e| e.rect.bottom()).fold(0.0, f32::max)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
