//! Fanout routing from device terminals to probe pads.
//!
//! Assignment is deterministic: by default each terminal takes the nearest
//! free pad, where cost is Manhattan distance plus a penalty for pads behind
//! the terminal's exit direction, ties breaking toward the lower pad index.
//! The alternative [`PadAssignment::Positional`] policy first classifies
//! pads by which side of the terminal cloud they sit on and connects the
//! terminals exiting a side to that side's pads in matching geometric order,
//! which keeps the wires of ladder-style devices from crossing; a terminal
//! whose positional pad is unusable (or that has none) falls back to the
//! nearest-pad cost order. Routed wires occupy swept rectangular corridors;
//! a candidate route is rejected if its corridor (grown by the configured
//! clearance) overlaps any committed corridor, keepout, or foreign pad.
//! Styles are tried in the configured fallback order for every candidate
//! pad, and a terminal that exhausts all pads and styles fails the whole
//! fanout, so a device either routes completely or not at all.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use maskgeom::bbox::{Bbox, BoundBox};
use maskgeom::{Dims, Point, Rect, Shape, Side, Sides};

use crate::error::{Error, Result};
use crate::pdk::UM;
use crate::shapes;

/// The electrical function of a device terminal.
///
/// Role order is the routing priority order within a device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum TerminalRole {
    Gate,
    Source,
    Drain,
    /// A numbered auxiliary contact (Hall probes, TLM fingers).
    Contact(u8),
}

/// A connection point on a device edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Terminal {
    /// A unique name, e.g. `d3.gate`.
    pub name: ArcStr,
    pub role: TerminalRole,
    /// The index of the owning device within its array cell.
    pub device: usize,
    /// The attachment point, on the device outline.
    pub at: Point,
    /// The side of the device this terminal exits from.
    pub exit: Side,
    /// The attachable metal width at `at`.
    pub width: i64,
}

/// Corner treatment for probe pads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChamferStyle {
    #[default]
    None,
    /// 45-degree corner cuts.
    Straight,
    /// Quarter-circle corner rounding.
    Round,
}

/// A probe pad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pad {
    pub center: Point,
    pub dims: Dims,
    /// Corner cut size; ignored for [`ChamferStyle::None`].
    pub chamfer: i64,
    pub style: ChamferStyle,
}

impl Pad {
    pub fn new(center: Point, dims: Dims) -> Self {
        Self {
            center,
            dims,
            chamfer: 0,
            style: ChamferStyle::None,
        }
    }

    pub fn with_chamfer(mut self, style: ChamferStyle, chamfer: i64) -> Self {
        self.style = style;
        self.chamfer = chamfer;
        self
    }

    /// The pad's bounding rectangle.
    pub fn brect(&self) -> Rect {
        Rect::centered(self.center, self.dims)
    }

    /// The pad outline shape, applying the chamfer style.
    pub fn outline(&self) -> Result<Shape> {
        match self.style {
            ChamferStyle::None => Ok(shapes::rectangle(self.center, self.dims)),
            ChamferStyle::Straight => shapes::octagon(self.center, self.dims, self.chamfer),
            ChamferStyle::Round => shapes::rounded_rect(self.center, self.dims, self.chamfer),
        }
    }

    /// The wire landing point on the given side of the pad.
    pub fn entry(&self, side: Side) -> Point {
        self.brect().edge_center(side)
    }
}

/// Builds a ring of pads around `core`.
///
/// `counts` gives the number of pads on each side; pads sit `standoff` away
/// from the core edge and are spread evenly along it. Pad indices run left,
/// right, bottom, top, and along each side in ascending coordinate order.
pub fn pad_ring(core: Rect, counts: Sides<usize>, dims: Dims, standoff: i64) -> Vec<Pad> {
    let mut pads = Vec::new();
    for side in [Side::Left, Side::Right, Side::Bot, Side::Top] {
        let n = counts[side];
        if n == 0 {
            continue;
        }
        let along = side.edge_dir();
        let mut span = core.span(along);
        // A narrow core cannot fit n pads side by side; spread them over a
        // widened span instead, keeping the core centered.
        let required = n as i64 * dims.dim(along) * 5 / 4;
        if span.length() < required {
            span = span.expand_all((required - span.length()) / 2);
        }
        let offset = standoff + dims.dim(side.coord_dir()) / 2;
        let base = core.side(side) + side.sign().as_int() * offset;
        for k in 0..n {
            // Even spread: pad k sits at fraction (2k + 1) / 2n of the edge.
            let pos = span.start() + span.length() * (2 * k as i64 + 1) / (2 * n as i64);
            let center = match along {
                maskgeom::Dir::Horiz => Point::new(pos, base),
                maskgeom::Dir::Vert => Point::new(base, pos),
            };
            pads.push(Pad::new(center, dims));
        }
    }
    pads
}

/// The wire geometry family for one route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RouteStyle {
    /// A tapered straight run from terminal to pad.
    Straight,
    /// A bowed Bezier wire.
    Curved,
    /// A Manhattan wire with one right-angle bend.
    Stepped,
}

/// How terminals pick their pads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PadAssignment {
    /// Nearest free pad under the direction-aware cost metric, ties toward
    /// the lower pad index.
    #[default]
    Nearest,
    /// Rank-preserving per-side assignment: the k-th terminal exiting a
    /// side takes the k-th pad on that side. Suits pad rings built to match
    /// the terminal layout, where nearest-pad assignment would cross wires.
    Positional,
}

/// Router tuning knobs, in database units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouterConfig {
    /// The drawn wire width.
    pub track_width: i64,
    /// Minimum clearance between a wire corridor and anything else.
    pub clearance: i64,
    /// Minimum bend radius for curved wires.
    pub bend_radius: i64,
    /// Style fallback order; each is tried in turn for every candidate pad.
    pub styles: Vec<RouteStyle>,
    pub assignment: PadAssignment,
    /// Allows several terminals to land on one pad.
    pub shared_pads: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            track_width: 5 * UM,
            clearance: 5 * UM,
            bend_radius: 10 * UM,
            styles: vec![RouteStyle::Straight, RouteStyle::Curved, RouteStyle::Stepped],
            assignment: PadAssignment::default(),
            shared_pads: false,
        }
    }
}

/// One completed terminal-to-pad connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub terminal: ArcStr,
    /// Index into the pad list handed to [`Router::route`].
    pub pad: usize,
    pub style: RouteStyle,
    pub wire: Shape,
}

/// Greedy deterministic fanout router.
pub struct Router {
    cfg: RouterConfig,
    committed: Vec<Rect>,
    keepouts: Vec<Rect>,
}

impl Router {
    pub fn new(cfg: RouterConfig) -> Self {
        Self {
            cfg,
            committed: Vec::new(),
            keepouts: Vec::new(),
        }
    }

    /// Adds regions no wire corridor may cross (device bodies, marks).
    pub fn add_keepouts(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.keepouts.extend(rects);
    }

    /// Connects every terminal to a pad, or fails without emitting anything.
    ///
    /// Terminals are processed in (device, role) order regardless of input
    /// order; output routes follow processing order.
    pub fn route(&mut self, terminals: &[Terminal], pads: &[Pad]) -> Result<Vec<Route>> {
        if terminals.is_empty() {
            return Ok(Vec::new());
        }
        let mut order: Vec<usize> = (0..terminals.len()).collect();
        order.sort_by_key(|&i| (terminals[i].device, terminals[i].role));

        let preferred = match self.cfg.assignment {
            PadAssignment::Nearest => vec![None; terminals.len()],
            PadAssignment::Positional => positional_assignment(terminals, pads),
        };
        let mut taken = vec![false; pads.len()];
        let mut routes = Vec::with_capacity(terminals.len());
        // Committed corridors from this call, rolled back wholesale on
        // failure so a failed fanout leaves the router untouched.
        let checkpoint = self.committed.len();

        for &ti in &order {
            let t = &terminals[ti];
            match self.route_one(t, pads, &taken, preferred[ti]) {
                Some((pad, style, wire, corridors)) => {
                    taken[pad] = true;
                    self.committed.extend(corridors);
                    crate::log::debug!(
                        "routed terminal {} to pad {} ({:?})",
                        t.name,
                        pad,
                        style
                    );
                    routes.push(Route {
                        terminal: t.name.clone(),
                        pad,
                        style,
                        wire,
                    });
                }
                None => {
                    self.committed.truncate(checkpoint);
                    return Err(Error::RoutingConflict {
                        terminal: t.name.clone(),
                    });
                }
            }
        }
        Ok(routes)
    }

    /// Tries the positional pad first, then every other available pad in
    /// cost order, and every style in fallback order per pad.
    fn route_one(
        &self,
        t: &Terminal,
        pads: &[Pad],
        taken: &[bool],
        preferred: Option<usize>,
    ) -> Option<(usize, RouteStyle, Shape, Vec<Rect>)> {
        let mut candidates: Vec<(i64, usize)> = pads
            .iter()
            .enumerate()
            .filter(|(i, _)| self.cfg.shared_pads || !taken[*i])
            .map(|(i, p)| (self.cost(t, p), i))
            .collect();
        // Ties break toward the lower pad index.
        candidates.sort();
        if let Some(p) = preferred {
            if let Some(at) = candidates.iter().position(|&(_, i)| i == p) {
                let c = candidates.remove(at);
                candidates.insert(0, c);
            }
        }

        for (_, pi) in candidates {
            for &style in &self.cfg.styles {
                if let Some((wire, corridors)) = self.try_style(t, &pads[pi], style) {
                    if self.clear(&corridors, pads, pi) {
                        return Some((pi, style, wire, corridors));
                    }
                }
            }
        }
        None
    }

    /// Manhattan distance, doubled for displacement behind the exit side.
    fn cost(&self, t: &Terminal, pad: &Pad) -> i64 {
        let d = t.at.manhattan_distance(pad.center);
        let v = pad.center - t.at;
        let along = v.x * t.exit.outward().x + v.y * t.exit.outward().y;
        d + 2 * (-along).max(0)
    }

    fn try_style(&self, t: &Terminal, pad: &Pad, style: RouteStyle) -> Option<(Shape, Vec<Rect>)> {
        let entry_side = facing_side(pad.center, t.at);
        let entry = pad.entry(entry_side);
        let w = self.cfg.track_width;
        match style {
            RouteStyle::Straight => {
                // Taper from the terminal's attachable width down to the
                // track width at the pad edge.
                let half_t = (t.width.min(pad.dims.dim(entry_side.edge_dir())) / 2).max(w / 2);
                let (a1, a2) = edge_points(t.at, t.exit, half_t);
                let (b1, b2) = edge_points(entry, entry_side, w / 2);
                let wire = shapes::taper(a1, a2, b1, b2);
                let corridor = wire.brect();
                Some((wire, vec![corridor]))
            }
            RouteStyle::Curved => {
                let dist = t.at.manhattan_distance(entry);
                if dist == 0 {
                    return None;
                }
                let bow = max_bow(dist, self.cfg.bend_radius);
                if bow == 0 {
                    return None;
                }
                let wire = shapes::curved_wire(t.at, entry, w, bow, 16).ok()?;
                let corridor = wire.brect();
                Some((wire, vec![corridor]))
            }
            RouteStyle::Stepped => {
                let horiz_first = t.exit.coord_dir() == maskgeom::Dir::Horiz;
                let wire = shapes::stepped_wire(t.at, entry, w, horiz_first).ok()?;
                let corridors = match &wire {
                    Shape::Path(p) => p
                        .points
                        .windows(2)
                        .map(|seg| Rect::new(seg[0], seg[1]).expand(w / 2))
                        .collect(),
                    _ => vec![wire.brect()],
                };
                Some((wire, corridors))
            }
        }
    }

    /// Checks the candidate corridors against all committed corridors
    /// (grown by the clearance), keepouts, and foreign pad bodies (both
    /// ungrown, since terminals and landing points sit flush against their
    /// shapes). Zero-area contact is allowed.
    fn clear(&self, corridors: &[Rect], pads: &[Pad], dest: usize) -> bool {
        for c in corridors {
            let grown = c.expand(self.cfg.clearance);
            for other in self.committed.iter() {
                if overlaps(&grown, other) {
                    return false;
                }
            }
            for ko in self.keepouts.iter() {
                if overlaps(c, ko) {
                    return false;
                }
            }
            for (i, pad) in pads.iter().enumerate() {
                if i != dest && overlaps(c, &pad.brect()) {
                    return false;
                }
            }
        }
        true
    }
}

/// The rank-preserving pad preference: for each side of the terminal cloud,
/// the k-th terminal exiting that side (in ascending edge coordinate) prefers
/// the k-th pad on that side. Terminals past the side's pad count get no
/// preference.
fn positional_assignment(terminals: &[Terminal], pads: &[Pad]) -> Vec<Option<usize>> {
    let cloud = terminals
        .iter()
        .fold(Bbox::empty(), |acc, t| acc.union(t.at.bbox()))
        .into_rect();
    let mut side_pads: Sides<Vec<usize>> =
        Sides::new(Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for (i, p) in pads.iter().enumerate() {
        side_pads[cloud_side(p.center, cloud)].push(i);
    }

    let mut preferred = vec![None; terminals.len()];
    for side in [Side::Top, Side::Right, Side::Bot, Side::Left] {
        let along = side.edge_dir();
        side_pads[side].sort_by_key(|&i| pads[i].center.coord(along));
        let mut ts: Vec<usize> = (0..terminals.len())
            .filter(|&i| terminals[i].exit == side)
            .collect();
        ts.sort_by_key(|&i| terminals[i].at.coord(along));
        for (k, &ti) in ts.iter().enumerate() {
            if let Some(&pi) = side_pads[side].get(k) {
                preferred[ti] = Some(pi);
            }
        }
    }
    preferred
}

/// The side of the terminal cloud a pad sits on: the side with the largest
/// outward clearance from the cloud's bounding box, ties to vertical.
fn cloud_side(p: Point, cloud: Rect) -> Side {
    // max_by_key keeps the last maximum, so the vertical sides win ties.
    let residuals = [
        (p.x - cloud.right(), Side::Right),
        (cloud.left() - p.x, Side::Left),
        (p.y - cloud.top(), Side::Top),
        (cloud.bottom() - p.y, Side::Bot),
    ];
    residuals
        .into_iter()
        .max_by_key(|&(r, _)| r)
        .map(|(_, s)| s)
        .unwrap_or(Side::Top)
}

/// The bow for a curved wire of chord length `dist`: nominally 30% of the
/// chord, clamped down so the apex curvature radius (about `chord^2 /
/// (8 * bow)`) stays at or above `bend_radius`.
fn max_bow(dist: i64, bend_radius: i64) -> i64 {
    (dist * 3 / 10).min(dist * dist / (8 * bend_radius.max(1)))
}

/// Strict overlap: shared area, not merely a shared edge.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.intersection(b)
        .map(|r| r.width() > 0 && r.height() > 0)
        .unwrap_or(false)
}

/// The side of a pad at `center` that faces a point `from`; ties prefer the
/// vertical sides.
fn facing_side(center: Point, from: Point) -> Side {
    let v = from - center;
    if v.x.abs() > v.y.abs() {
        if v.x >= 0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if v.y >= 0 {
        Side::Top
    } else {
        Side::Bot
    }
}

/// The two endpoints of a `2 * half`-long edge segment centered at `at`,
/// running along the edge of side `side`.
fn edge_points(at: Point, side: Side, half: i64) -> (Point, Point) {
    match side.edge_dir() {
        maskgeom::Dir::Horiz => (Point::new(at.x - half, at.y), Point::new(at.x + half, at.y)),
        maskgeom::Dir::Vert => (Point::new(at.x, at.y - half), Point::new(at.x, at.y + half)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, device: usize, role: TerminalRole, at: Point, exit: Side) -> Terminal {
        Terminal {
            name: ArcStr::from(name),
            role,
            device,
            at,
            exit,
            width: UM,
        }
    }

    #[test]
    fn test_pad_outline_chamfer_limit() {
        let p = Pad::new(Point::zero(), Dims::square(100 * UM))
            .with_chamfer(ChamferStyle::Straight, 60 * UM);
        assert!(p.outline().is_err());
        let p = Pad::new(Point::zero(), Dims::square(100 * UM))
            .with_chamfer(ChamferStyle::Round, 20 * UM);
        assert!(p.outline().is_ok());
    }

    #[test]
    fn test_pad_ring_counts_and_order() {
        let core = Rect::new(Point::zero(), Point::new(100 * UM, 100 * UM));
        let pads = pad_ring(
            core,
            Sides::new(1, 2, 0, 1),
            Dims::square(80 * UM),
            50 * UM,
        );
        assert_eq!(pads.len(), 4);
        // Left pad first, then right (ascending y), then top.
        assert!(pads[0].center.x < 0);
        assert!(pads[1].center.x > 100 * UM && pads[2].center.x > 100 * UM);
        assert!(pads[1].center.y < pads[2].center.y);
        assert!(pads[3].center.y > 100 * UM);
    }

    #[test]
    fn test_route_prefers_facing_pad() {
        let mut router = Router::new(RouterConfig::default());
        let pads = vec![
            Pad::new(Point::new(-200 * UM, 0), Dims::square(80 * UM)),
            Pad::new(Point::new(200 * UM, 0), Dims::square(80 * UM)),
        ];
        let terms = vec![term("d0.source", 0, TerminalRole::Source, Point::new(-10 * UM, 0), Side::Left)];
        let routes = router.route(&terms, &pads).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pad, 0);
        assert_eq!(routes[0].style, RouteStyle::Straight);
    }

    #[test]
    fn test_nearest_pad_wins_by_default() {
        let mut router = Router::new(RouterConfig::default());
        let pads = vec![
            Pad::new(Point::new(0, 800 * UM), Dims::square(80 * UM)),
            Pad::new(Point::new(400 * UM, 800 * UM), Dims::square(80 * UM)),
        ];
        let terms = vec![term(
            "d0.gate",
            0,
            TerminalRole::Gate,
            Point::new(300 * UM, 10 * UM),
            Side::Top,
        )];
        let routes = router.route(&terms, &pads).unwrap();
        // Pad 1 is 200 um cheaper under the cost metric.
        assert_eq!(routes[0].pad, 1);
    }

    #[test]
    fn test_positional_assignment_preserves_rank() {
        let mut cfg = RouterConfig::default();
        cfg.assignment = PadAssignment::Positional;
        let mut router = Router::new(cfg);
        let pads = vec![
            Pad::new(Point::new(-200 * UM, 300 * UM), Dims::square(80 * UM)),
            Pad::new(Point::new(0, 300 * UM), Dims::square(80 * UM)),
            Pad::new(Point::new(200 * UM, 300 * UM), Dims::square(80 * UM)),
        ];
        // The nearest pad for the leftmost terminal would be the middle
        // one; positional assignment keeps left-to-right order instead.
        let terms = vec![
            term("d0.c1", 0, TerminalRole::Contact(0), Point::new(-40 * UM, 10 * UM), Side::Top),
            term("d0.c2", 0, TerminalRole::Contact(1), Point::new(0, 10 * UM), Side::Top),
            term("d0.c3", 0, TerminalRole::Contact(2), Point::new(40 * UM, 10 * UM), Side::Top),
        ];
        let routes = router.route(&terms, &pads).unwrap();
        let pads_taken: Vec<usize> = routes.iter().map(|r| r.pad).collect();
        assert_eq!(pads_taken, vec![0, 1, 2]);
    }

    #[test]
    fn test_curved_bow_bounded_by_bend_radius() {
        let dist = 100 * UM;
        // A small minimum radius leaves the nominal 30% bow untouched.
        assert_eq!(max_bow(dist, 10 * UM), 30 * UM);
        // A large minimum radius clamps the bow down, not up.
        let bow = max_bow(dist, 200 * UM);
        assert!(bow < 30 * UM);
        assert!(8 * 200 * UM * bow <= dist * dist);
    }

    #[test]
    fn test_route_orders_by_device_then_role() {
        let mut router = Router::new(RouterConfig::default());
        let pads = vec![
            Pad::new(Point::new(-300 * UM, 0), Dims::square(80 * UM)),
            Pad::new(Point::new(300 * UM, 0), Dims::square(80 * UM)),
            Pad::new(Point::new(0, -300 * UM), Dims::square(80 * UM)),
        ];
        let terms = vec![
            term("d0.drain", 0, TerminalRole::Drain, Point::new(10 * UM, 0), Side::Right),
            term("d0.gate", 0, TerminalRole::Gate, Point::new(0, -10 * UM), Side::Bot),
            term("d0.source", 0, TerminalRole::Source, Point::new(-10 * UM, 0), Side::Left),
        ];
        let routes = router.route(&terms, &pads).unwrap();
        let names: Vec<&str> = routes.iter().map(|r| r.terminal.as_str()).collect();
        assert_eq!(names, vec!["d0.gate", "d0.source", "d0.drain"]);
    }

    #[test]
    fn test_route_all_or_nothing() {
        let mut router = Router::new(RouterConfig::default());
        // One pad, two terminals, sharing disabled.
        let pads = vec![Pad::new(Point::new(200 * UM, 0), Dims::square(80 * UM))];
        let terms = vec![
            term("d0.source", 0, TerminalRole::Source, Point::new(-10 * UM, 0), Side::Left),
            term("d0.drain", 0, TerminalRole::Drain, Point::new(10 * UM, 0), Side::Right),
        ];
        let err = router.route(&terms, &pads).unwrap_err();
        assert!(matches!(err, Error::RoutingConflict { .. }));
        // The failed call must not leave corridors behind.
        let single = vec![term("d0.drain", 0, TerminalRole::Drain, Point::new(10 * UM, 0), Side::Right)];
        assert!(router.route(&single, &pads).is_ok());
    }

    #[test]
    fn test_shared_pads_allows_reuse() {
        let mut cfg = RouterConfig::default();
        cfg.shared_pads = true;
        cfg.clearance = 0;
        let mut router = Router::new(cfg);
        let pads = vec![Pad::new(Point::new(0, 300 * UM), Dims::square(80 * UM))];
        // Approach the shared pad from opposite flanks so the two wire
        // corridors stay disjoint.
        let terms = vec![
            term("d0.v1", 0, TerminalRole::Contact(0), Point::new(-400 * UM, 10 * UM), Side::Top),
            term("d0.v2", 0, TerminalRole::Contact(1), Point::new(400 * UM, 10 * UM), Side::Top),
        ];
        let routes = router.route(&terms, &pads).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].pad, 0);
        assert_eq!(routes[1].pad, 0);
    }

    #[test]
    fn test_keepout_forces_fallback_style() {
        let mut cfg = RouterConfig::default();
        cfg.clearance = UM;
        let mut router = Router::new(cfg);
        // A blocking bar between terminal and pad that a straight or curved
        // wire must cross, but a stepped wire can go around.
        router.add_keepouts([Rect::new(
            Point::new(50 * UM, -20 * UM),
            Point::new(60 * UM, 200 * UM),
        )]);
        let pads = vec![Pad::new(Point::new(200 * UM, -150 * UM), Dims::square(60 * UM))];
        let terms = vec![term(
            "d0.drain",
            0,
            TerminalRole::Drain,
            Point::new(0, 0),
            Side::Bot,
        )];
        let routes = router.route(&terms, &pads).unwrap();
        assert_eq!(routes[0].style, RouteStyle::Stepped);
    }

    #[test]
    fn test_route_determinism() {
        let pads = vec![
            Pad::new(Point::new(-200 * UM, 0), Dims::square(80 * UM)),
            Pad::new(Point::new(200 * UM, 0), Dims::square(80 * UM)),
        ];
        let terms = vec![
            term("d0.source", 0, TerminalRole::Source, Point::new(-10 * UM, 0), Side::Left),
            term("d0.drain", 0, TerminalRole::Drain, Point::new(10 * UM, 0), Side::Right),
        ];
        let a = Router::new(RouterConfig::default()).route(&terms, &pads).unwrap();
        let b = Router::new(RouterConfig::default()).route(&terms, &pads).unwrap();
        assert_eq!(a, b);
    }
}
