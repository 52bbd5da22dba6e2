#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }
}

/// Scales `child` to the largest size that fits in `parent` while keeping its aspect ratio,
/// centered within `parent`. The result is relative to the parent's origin.
pub fn fit_inside(child: Rect, parent: Rect) -> Option<Rect> {
    if child.width <= 0.0 || child.height <= 0.0 || parent.width <= 0.0 || parent.height <= 0.0 {
        return None;
    }
    let ratio = 1.0 / f32::max(child.width / parent.width, child.height / parent.height);
    let width = child.width * ratio;
    let height = child.height * ratio;
    Some(Rect::new(
        (parent.width - width).abs() / 2.0,
        (parent.height - height).abs() / 2.0,
        width,
        height,
    ))
}
