use std::ops::{Add, Sub};

/// A point in graph (layout) or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Position {
	/// Shorthand constructor.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Add for Position {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Position {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// Pan offset `(x, y)` and zoom factor `k`: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan.
	pub x: f64,
	/// Vertical pan.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No pan, zoom 1.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Pan offset as a position.
	pub fn pan(&self) -> Position {
		Position::new(self.x, self.y)
	}

	/// Map a screen point into graph space.
	pub fn screen_to_graph(&self, p: Position) -> Position {
		Position::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Map a graph point onto the screen.
	pub fn graph_to_screen(&self, p: Position) -> Position {
		Position::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transform_round_trips_a_point() {
		let t = ViewTransform {
			x: 40.0,
			y: -10.0,
			k: 2.0,
		};
		let screen = t.graph_to_screen(Position::new(5.0, 5.0));
		assert_eq!(screen, Position::new(50.0, 0.0));
		assert_eq!(t.screen_to_graph(screen), Position::new(5.0, 5.0));
	}
}
