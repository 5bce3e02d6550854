//! Layout engine: maps the fixed design canvas onto the physical viewport.
//!
//! Two scaling policies coexist and are chosen per visual layer:
//!
//! - **FIT** scales by the smaller axis ratio and centers the canvas. Nothing
//!   is ever cropped; extreme aspect ratios produce letterbox bars. Interactive
//!   and UI content uses FIT.
//! - **FILL** scales by the larger axis ratio and centers the canvas. The
//!   viewport is always covered; overflow is cropped evenly. Backgrounds use
//!   FILL.
//!
//! Everything here is a pure function of (design size, viewport size). A zero
//! sized viewport (hidden tab) yields a zero scale; the engine does not clamp,
//! so callers guard any division downstream. [`to_design_space`] returns
//! `None` in that case.

pub mod geometry;

use serde::{Deserialize, Serialize};

pub use geometry::{DesignPoint, DesignSize, Rect, ScreenPoint, ScreenSize};

/// Which scaling policy a layer is laid out under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalePolicy {
    Fit,
    Fill,
}

/// A uniform scale followed by a translation, design → screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    fn for_policy(policy: ScalePolicy, design: DesignSize, screen: ScreenSize) -> Self {
        let sx = screen.width / design.width;
        let sy = screen.height / design.height;
        let scale = match policy {
            ScalePolicy::Fit => sx.min(sy),
            ScalePolicy::Fill => sx.max(sy),
        };
        Self {
            scale,
            offset_x: (screen.width - design.width * scale) / 2.0,
            offset_y: (screen.height - design.height * scale) / 2.0,
        }
    }

    pub fn to_screen(&self, p: DesignPoint) -> ScreenPoint {
        ScreenPoint::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Inverse of [`Transform::to_screen`]. `None` for a degenerate scale.
    pub fn to_design(&self, p: ScreenPoint) -> Option<DesignPoint> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        Some(DesignPoint::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        ))
    }
}

/// Device orientation derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(screen: ScreenSize) -> Self {
        if screen.width >= screen.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Orientations the game accepts; anything else pauses the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedOrientation {
    #[default]
    Landscape,
    Portrait,
    Any,
}

impl SupportedOrientation {
    pub fn accepts(self, orientation: Orientation) -> bool {
        match self {
            SupportedOrientation::Any => true,
            SupportedOrientation::Landscape => orientation == Orientation::Landscape,
            SupportedOrientation::Portrait => orientation == Orientation::Portrait,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "landscape" => Some(Self::Landscape),
            "portrait" => Some(Self::Portrait),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Nine-point anchors on the visible rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

/// Derived layout for one viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    pub design: DesignSize,
    pub screen: ScreenSize,
    pub fit: Transform,
    pub fill: Transform,
    /// The physical screen expressed in design units under FIT. Extends past
    /// the design canvas into the letterbox bars.
    pub visible: Rect,
}

impl LayoutState {
    pub fn transform(&self, policy: ScalePolicy) -> Transform {
        match policy {
            ScalePolicy::Fit => self.fit,
            ScalePolicy::Fill => self.fill,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.screen)
    }

    /// Position `margin` design units inside the visible rect at `anchor`.
    pub fn anchor(&self, anchor: Anchor, margin: f64) -> DesignPoint {
        let v = self.visible;
        let left = v.x + margin;
        let right = v.right() - margin;
        let top = v.y + margin;
        let bottom = v.bottom() - margin;
        let mid = v.center();
        match anchor {
            Anchor::TopLeft => DesignPoint::new(left, top),
            Anchor::Top => DesignPoint::new(mid.x, top),
            Anchor::TopRight => DesignPoint::new(right, top),
            Anchor::Left => DesignPoint::new(left, mid.y),
            Anchor::Center => mid,
            Anchor::Right => DesignPoint::new(right, mid.y),
            Anchor::BottomLeft => DesignPoint::new(left, bottom),
            Anchor::Bottom => DesignPoint::new(mid.x, bottom),
            Anchor::BottomRight => DesignPoint::new(right, bottom),
        }
    }
}

/// Pure layout computation for a viewport.
pub fn compute_layout(design: DesignSize, viewport_w: f64, viewport_h: f64) -> LayoutState {
    let screen = ScreenSize::new(viewport_w, viewport_h);
    let fit = Transform::for_policy(ScalePolicy::Fit, design, screen);
    let fill = Transform::for_policy(ScalePolicy::Fill, design, screen);

    let visible = if fit.scale > 0.0 && fit.scale.is_finite() {
        Rect::new(
            -fit.offset_x / fit.scale,
            -fit.offset_y / fit.scale,
            screen.width / fit.scale,
            screen.height / fit.scale,
        )
    } else {
        Rect::ZERO
    };

    LayoutState {
        design,
        screen,
        fit,
        fill,
        visible,
    }
}

/// Translate a pointer position back into design coordinates (inverse FIT).
pub fn to_design_space(physical_x: f64, physical_y: f64, state: &LayoutState) -> Option<DesignPoint> {
    state
        .fit
        .to_design(ScreenPoint::new(physical_x, physical_y))
}

/// Holds the design canvas and the last computed layout.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    design: DesignSize,
    current: LayoutState,
}

impl LayoutEngine {
    pub fn new(design: DesignSize, viewport: ScreenSize) -> Self {
        Self {
            design,
            current: compute_layout(design, viewport.width, viewport.height),
        }
    }

    pub fn design(&self) -> DesignSize {
        self.design
    }

    pub fn current(&self) -> &LayoutState {
        &self.current
    }

    pub fn compute_layout(&self, viewport_w: f64, viewport_h: f64) -> LayoutState {
        compute_layout(self.design, viewport_w, viewport_h)
    }

    /// Replace the cached layout with a full recomputation.
    pub fn resize(&mut self, viewport_w: f64, viewport_h: f64) -> &LayoutState {
        self.current = self.compute_layout(viewport_w, viewport_h);
        &self.current
    }
}
