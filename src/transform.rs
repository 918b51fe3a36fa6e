//! Page-space transform applied to a ticket before its content is painted

use tiny_skia_path::{Point, Transform};

use crate::layout::{PageFormat, Region, Scale};
use crate::render::GraphicsTarget;

/// One step of the page set-up, in the order it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageOp {
    Translate { dx: f64, dy: f64 },
    Clip(Region),
    Scale { sx: f64, sy: f64 },
}

/// Positions ticket content inside its region: translate to the region
/// origin, clip to the region size, then scale.
///
/// The clip is expressed in the translated frame and is applied before the
/// scale, so the visible area stays the region size whatever the scale is.
/// Zero scale factors are kept as given and simply paint nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    region: Region,
    scale: Scale,
}

impl RenderTransform {
    pub fn new(region: Region, scale: Scale) -> Self {
        Self { region, scale }
    }

    /// Transform for a ticket, using the page's imageable area when the
    /// ticket has no explicit region
    pub fn for_page(region: Option<Region>, scale: Scale, page: &PageFormat) -> Self {
        Self::new(region.unwrap_or(page.imageable), scale)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn ops(&self) -> [PageOp; 3] {
        [
            PageOp::Translate {
                dx: self.region.x,
                dy: self.region.y,
            },
            PageOp::Clip(Region::sized(self.region.width, self.region.height)),
            PageOp::Scale {
                sx: self.scale.x,
                sy: self.scale.y,
            },
        ]
    }

    /// Replay the operations on `target`
    pub fn apply(&self, target: &mut dyn GraphicsTarget) {
        for op in self.ops() {
            match op {
                PageOp::Translate { dx, dy } => target.translate(dx, dy),
                PageOp::Clip(rect) => target.clip(rect),
                PageOp::Scale { sx, sy } => target.scale(sx, sy),
            }
        }
    }

    /// Content-space → page-space matrix
    pub fn matrix(&self) -> Transform {
        Transform::from_translate(self.region.x as f32, self.region.y as f32)
            .pre_scale(self.scale.x as f32, self.scale.y as f32)
    }

    /// Map a content-space point to page space
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        let mut points = [Point::from_xy(x as f32, y as f32)];
        self.matrix().map_points(&mut points);
        (f64::from(points[0].x), f64::from(points[0].y))
    }

    /// The visible page area
    pub fn clip_in_page(&self) -> Region {
        self.region
    }

    /// Whether content of the given size, painted at the content origin,
    /// reaches outside the visible page area once placed
    pub fn clips_content(&self, width: f64, height: f64) -> bool {
        // f32 matrix arithmetic
        const SLACK: f64 = 0.01;

        let (x0, y0) = self.map_point(0.0, 0.0);
        let (x1, y1) = self.map_point(width, height);
        let clip = self.clip_in_page();
        x0.min(x1) < clip.x - SLACK
            || y0.min(y1) < clip.y - SLACK
            || x0.max(x1) > clip.x + clip.width + SLACK
            || y0.max(y1) > clip.y + clip.height + SLACK
    }
}
