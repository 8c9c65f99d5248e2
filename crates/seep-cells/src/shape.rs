use glam::Vec2;

/// A region of the grid described by a signed distance function, in cell units with `x` along
/// columns and `y` down the rows.
pub trait Shape {
    fn sdf(&self, p: Vec2) -> f32;

    /// Whether the center of the cell at `(row, column)` lies inside the shape.
    fn covers(&self, row: usize, column: usize) -> bool {
        self.sdf(Vec2::new(column as f32 + 0.5, row as f32 + 0.5)) <= 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Circle { center, radius }
    }
}

impl Shape for Circle {
    fn sdf(&self, p: Vec2) -> f32 {
        (p - self.center).length() - self.radius
    }
}

/// Axis-aligned rectangle spanning `min..max`.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Rect {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle covering whole cells, rows `r0..r1` and columns `c0..c1`.
    pub fn cells(r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        Rect::new(Vec2::new(c0 as f32, r0 as f32), Vec2::new(c1 as f32, r1 as f32))
    }
}

impl Shape for Rect {
    fn sdf(&self, p: Vec2) -> f32 {
        let center = (self.min + self.max) * 0.5;
        let half = (self.max - self.min) * 0.5;
        let d = (p - center).abs() - half;

        d.max(Vec2::ZERO).length() + d.max_element().min(0.0)
    }
}

/// Union of several shapes.
#[derive(Default)]
pub struct ShapeSet {
    pub shapes: Vec<Box<dyn Shape>>,
}

impl ShapeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Shape + 'static>(mut self, shape: T) -> Self {
        self.insert(shape);
        self
    }

    pub fn insert<T: Shape + 'static>(&mut self, shape: T) {
        self.shapes.push(Box::new(shape));
    }
}

impl Shape for ShapeSet {
    fn sdf(&self, p: Vec2) -> f32 {
        self.shapes
            .iter()
            .map(|s| s.sdf(p))
            .fold(f32::MAX, f32::min)
    }
}
