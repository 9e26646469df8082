//! Force-directed placement of entities.
//!
//! Entities start on a namespace grid (one cell per namespace, a sub-grid
//! of entities inside each cell) and are then relaxed by a fixed number of
//! spring/repulsion passes:
//!
//! - every pair repels with `repulsion / d²` (d floored at `min_distance`)
//! - every resolvable relationship pulls its endpoints together with
//!   `attraction * d`
//! - the net force times `damping` moves each node, then nodes are clamped
//!   back inside the canvas margins
//!
//! Repulsion is O(N²) per pass, fine for a few hundred entities. Larger
//! schemas want a Barnes-Hut quad-tree behind the same function.
//!
//! The result depends only on input order: there is no randomness.

use std::collections::HashMap;

use log::debug;

use super::types::Position;
use crate::config::LayoutConfig;
use crate::schema::{Entity, EntityId, EntityIndex, Relationship};

/// Final position of every entity, keyed by id.
pub type Layout = HashMap<EntityId, Position>;

/// Compute positions for `entities`. Relationships with an endpoint that
/// does not resolve (by id or qualified name) exert no force.
pub fn compute_layout(
	entities: &[Entity],
	relationships: &[Relationship],
	config: &LayoutConfig,
) -> Layout {
	if entities.is_empty() {
		return Layout::new();
	}

	let bounds = Bounds::from_config(config);
	let mut positions = grid_placement(entities, bounds);

	let index = EntityIndex::build(entities);
	let springs: Vec<(usize, usize)> = relationships
		.iter()
		.filter_map(|r| index.resolve_relationship(r))
		.filter(|(a, b)| a != b)
		.collect();

	let mut forces = vec![Position::default(); positions.len()];
	for _ in 0..config.iterations {
		forces.fill(Position::default());
		accumulate_repulsion(&positions, &mut forces, config);
		accumulate_attraction(&positions, &springs, &mut forces, config);
		for (p, f) in positions.iter_mut().zip(&forces) {
			p.x += f.x * config.damping;
			p.y += f.y * config.damping;
			*p = bounds.clamp(*p);
		}
	}

	debug!(
		"layout: {} entities, {} springs, {} iterations",
		entities.len(),
		springs.len(),
		config.iterations
	);

	let mut layout = Layout::with_capacity(entities.len());
	for (entity, p) in entities.iter().zip(positions) {
		layout.entry(entity.id.clone()).or_insert(p);
	}
	layout
}

/// Inner rectangle nodes are kept inside.
#[derive(Clone, Copy, Debug)]
struct Bounds {
	min_x: f64,
	max_x: f64,
	min_y: f64,
	max_y: f64,
}

impl Bounds {
	fn from_config(config: &LayoutConfig) -> Self {
		let min_x = config.margin_x;
		let min_y = config.margin_y;
		Self {
			min_x,
			max_x: (config.canvas_width - config.margin_x).max(min_x),
			min_y,
			max_y: (config.canvas_height - config.margin_y).max(min_y),
		}
	}

	fn clamp(&self, p: Position) -> Position {
		Position::new(
			p.x.clamp(self.min_x, self.max_x),
			p.y.clamp(self.min_y, self.max_y),
		)
	}
}

/// Smallest `(cols, rows)` grid holding `n` cells, roughly square.
fn grid_dims(n: usize) -> (usize, usize) {
	let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
	(cols, n.div_ceil(cols).max(1))
}

/// Namespace cells in first-seen order, entities on a sub-grid inside each.
/// Cells tile `bounds`, so every seed is already inside the margins and no
/// two entities share a seed.
fn grid_placement(entities: &[Entity], bounds: Bounds) -> Vec<Position> {
	let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
	for (i, entity) in entities.iter().enumerate() {
		match groups.iter_mut().find(|(ns, _)| *ns == entity.namespace) {
			Some((_, members)) => members.push(i),
			None => groups.push((entity.namespace.as_str(), vec![i])),
		}
	}

	let (cols, rows) = grid_dims(groups.len());
	let cell_w = (bounds.max_x - bounds.min_x) / cols as f64;
	let cell_h = (bounds.max_y - bounds.min_y) / rows as f64;

	let mut positions = vec![Position::default(); entities.len()];
	for (g, (_, members)) in groups.iter().enumerate() {
		let cell_x = bounds.min_x + (g % cols) as f64 * cell_w;
		let cell_y = bounds.min_y + (g / cols) as f64 * cell_h;
		let (sub_cols, sub_rows) = grid_dims(members.len());
		let step_x = cell_w / sub_cols as f64;
		let step_y = cell_h / sub_rows as f64;
		for (k, &i) in members.iter().enumerate() {
			positions[i] = Position::new(
				cell_x + ((k % sub_cols) as f64 + 0.5) * step_x,
				cell_y + ((k / sub_cols) as f64 + 0.5) * step_y,
			);
		}
	}
	positions
}

fn accumulate_repulsion(positions: &[Position], forces: &mut [Position], config: &LayoutConfig) {
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let delta = positions[i] - positions[j];
			let actual = (delta.x * delta.x + delta.y * delta.y).sqrt();
			// coincident nodes get pushed apart along x, lower index to the right
			let (ux, uy) = if actual > 0.0 {
				(delta.x / actual, delta.y / actual)
			} else {
				(1.0, 0.0)
			};
			let distance = actual.max(config.min_distance);
			let magnitude = config.repulsion_strength / (distance * distance);
			forces[i].x += ux * magnitude;
			forces[i].y += uy * magnitude;
			forces[j].x -= ux * magnitude;
			forces[j].y -= uy * magnitude;
		}
	}
}

fn accumulate_attraction(
	positions: &[Position],
	springs: &[(usize, usize)],
	forces: &mut [Position],
	config: &LayoutConfig,
) {
	for &(a, b) in springs {
		let delta = positions[b] - positions[a];
		let fx = delta.x * config.attraction_strength;
		let fy = delta.y * config.attraction_strength;
		forces[a].x += fx;
		forces[a].y += fy;
		forces[b].x -= fx;
		forces[b].y -= fy;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distance(a: Position, b: Position) -> f64 {
		let d = a - b;
		(d.x * d.x + d.y * d.y).sqrt()
	}

	fn sample_entities() -> Vec<Entity> {
		let mut entities = Vec::new();
		for (ns, count) in [("Sales", 5), ("Crm", 3), ("Stock", 4)] {
			for i in 0..count {
				entities.push(Entity::new(format!("{ns}-{i}"), ns, &format!("E{i}")));
			}
		}
		entities
	}

	fn sample_relationships() -> Vec<Relationship> {
		vec![
			Relationship::new("r1", "a", "Sales-0", "Crm.E1"),
			Relationship::new("r2", "b", "Stock.E2", "Sales-3"),
			Relationship::new("r3", "c", "Crm-2", "Crm-0"),
		]
	}

	#[test]
	fn empty_input_gives_empty_layout() {
		assert!(compute_layout(&[], &[], &LayoutConfig::default()).is_empty());
	}

	#[test]
	fn layout_is_deterministic() {
		let config = LayoutConfig::default();
		let a = compute_layout(&sample_entities(), &sample_relationships(), &config);
		let b = compute_layout(&sample_entities(), &sample_relationships(), &config);
		assert_eq!(a, b);
		assert_eq!(a.len(), 12);
	}

	#[test]
	fn positions_stay_inside_margins() {
		let config = LayoutConfig {
			repulsion_strength: 5_000_000.0,
			..LayoutConfig::default()
		};
		let layout = compute_layout(&sample_entities(), &sample_relationships(), &config);
		for p in layout.values() {
			assert!((100.0..=1100.0).contains(&p.x), "x out of bounds: {p:?}");
			assert!((50.0..=750.0).contains(&p.y), "y out of bounds: {p:?}");
		}
	}

	#[test]
	fn unresolvable_relationship_exerts_no_force() {
		let config = LayoutConfig::default();
		let entities = sample_entities();
		let base = compute_layout(&entities, &sample_relationships(), &config);
		let mut with_dangling = sample_relationships();
		with_dangling.push(Relationship::new("r9", "gone", "Sales-0", "Nowhere.Thing"));
		with_dangling.push(Relationship::new("r10", "gone too", "missing-id", "Crm-1"));
		assert_eq!(compute_layout(&entities, &with_dangling, &config), base);
	}

	#[test]
	fn relationship_pulls_endpoints_closer() {
		let config = LayoutConfig::default();
		let entities = vec![Entity::new("a", "A", "One"), Entity::new("b", "A", "Two")];
		let loose = compute_layout(&entities, &[], &config);
		let tied = compute_layout(&entities, &[Relationship::new("r", "r", "a", "A.Two")], &config);
		let id = |s: &str| EntityId::from(s);
		assert!(distance(tied[&id("a")], tied[&id("b")]) < distance(loose[&id("a")], loose[&id("b")]));
	}

	#[test]
	fn grid_placement_clusters_namespaces() {
		let config = LayoutConfig::default();
		let entities = sample_entities();
		let placed = grid_placement(&entities, Bounds::from_config(&config));
		// three namespaces on a 2x2 grid of 500x350 cells from (100, 50)
		assert!(placed[..5].iter().all(|p| p.x < 600.0 && p.y < 400.0));
		assert!(placed[5..8].iter().all(|p| p.x >= 600.0 && p.y < 400.0));
		assert!(placed[8..].iter().all(|p| p.x < 600.0 && p.y >= 400.0));
	}

	#[test]
	fn grid_seeds_are_distinct_and_inside_margins() {
		let config = LayoutConfig::default();
		let bounds = Bounds::from_config(&config);
		let mut entities = Vec::new();
		for ns in 0..36 {
			for i in 0..7 {
				entities.push(Entity::new(format!("n{ns}-{i}"), &format!("Ns{ns}"), &format!("E{i}")));
			}
		}
		let placed = grid_placement(&entities, bounds);
		for p in &placed {
			assert_eq!(bounds.clamp(*p), *p, "seed outside margins: {p:?}");
		}
		for (i, a) in placed.iter().enumerate() {
			for b in &placed[i + 1..] {
				assert!(distance(*a, *b) > 1.0, "coincident seeds at {a:?}");
			}
		}
	}

	#[test]
	fn coincident_nodes_are_separated() {
		let config = LayoutConfig {
			iterations: 1,
			..LayoutConfig::default()
		};
		let positions = vec![Position::new(500.0, 400.0); 2];
		let mut forces = vec![Position::default(); 2];
		accumulate_repulsion(&positions, &mut forces, &config);
		assert_eq!(forces[0], Position::new(5000.0, 0.0));
		assert_eq!(forces[1], Position::new(-5000.0, 0.0));
	}

	#[test]
	fn grid_dims_are_roughly_square() {
		assert_eq!(grid_dims(1), (1, 1));
		assert_eq!(grid_dims(3), (2, 2));
		assert_eq!(grid_dims(5), (3, 2));
		assert_eq!(grid_dims(9), (3, 3));
	}
}
