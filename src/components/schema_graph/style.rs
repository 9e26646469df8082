use crate::schema::RelationshipKind;

pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_WIDTH: f64 = 140.0;
pub const NODE_HEIGHT: f64 = 44.0;

const EDGE_COLOR: &str = "rgba(100, 180, 255, 0.7)";
const CROSS_EDGE_COLOR: &str = "rgba(255, 170, 80, 0.8)";
const HIGHLIGHT_COLOR: &str = "rgba(255, 255, 255, 0.95)";

pub fn namespace_color(index: usize) -> &'static str {
	COLORS[index % COLORS.len()]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: &'static str,
	pub width: f64,
	/// `(dash, gap)` for dashed lines.
	pub dash: Option<(f64, f64)>,
}

pub fn edge_style(kind: RelationshipKind, cross_namespace: bool, highlighted: bool) -> EdgeStyle {
	EdgeStyle {
		color: match (highlighted, cross_namespace) {
			(true, _) => HIGHLIGHT_COLOR,
			(false, true) => CROSS_EDGE_COLOR,
			(false, false) => EDGE_COLOR,
		},
		width: if highlighted { 2.5 } else { 1.5 },
		dash: match kind {
			RelationshipKind::Reference => None,
			RelationshipKind::ReferenceSet => Some((8.0, 4.0)),
		},
	}
}
