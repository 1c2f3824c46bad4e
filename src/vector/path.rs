//! Path mini-language: tokenizing and sampling into points.
//!
//! Parsing is lenient. Unparseable numbers are dropped, letters outside the
//! known command set are skipped with their operands, and a command whose
//! last operand group is incomplete keeps only its complete groups.

use kurbo::{Arc, CubicBez, ParamCurve, PathEl, Point, QuadBez, SvgArc, Vec2};

/// Fewest samples taken along one curve segment.
pub const MIN_CURVE_STEPS: usize = 4;

/// Tolerance for converting SVG arcs to cubics, in source units.
const ARC_TOLERANCE: f64 = 0.1;

/// One command letter with the numbers that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub letter: char,
    pub operands: Vec<f64>,
}

/// Split path data into commands. Any leading numbers without a command are dropped.
pub fn tokenize(data: &str) -> Vec<Command> {
    let mut commands: Vec<Command> = Vec::new();
    let bytes = data.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_alphabetic() {
            commands.push(Command {
                letter: c as char,
                operands: Vec::new(),
            });
            i += 1;
        } else if c.is_ascii_digit() || matches!(c, b'.' | b'-' | b'+') {
            let end = number_end(bytes, i);
            let parsed = data[i..end].parse::<f64>().ok().filter(|v| v.is_finite());
            if let (Some(value), Some(cmd)) = (parsed, commands.last_mut()) {
                cmd.operands.push(value);
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }
    commands
}

/// End of the numeric token starting at `start`:
/// sign, digits, one decimal point, then an optional exponent.
fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if matches!(bytes.get(i), Some(b'-' | b'+')) {
        i += 1;
    }
    let mut seen_dot = false;
    while let Some(&c) = bytes.get(i) {
        if c.is_ascii_digit() {
            i += 1;
        } else if c == b'.' && !seen_dot {
            seen_dot = true;
            i += 1;
        } else {
            break;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
            while bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Number of operands one repetition of a command consumes.
fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'Z' => Some(0),
        'H' | 'V' => Some(1),
        'M' | 'L' | 'T' => Some(2),
        'S' | 'Q' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        _ => None,
    }
}

/// Walks commands and accumulates sampled points in source space.
#[derive(Debug)]
pub struct PathSampler {
    curve_steps: usize,
    points: Vec<Point>,
    current: Point,
    subpath_start: Point,
    /// Second control point of the previous cubic, for `S`.
    last_cubic_ctrl: Option<Point>,
    /// Control point of the previous quadratic, for `T`.
    last_quad_ctrl: Option<Point>,
}

impl PathSampler {
    pub fn new(curve_steps: usize) -> Self {
        Self {
            curve_steps: curve_steps.max(MIN_CURVE_STEPS),
            points: Vec::new(),
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    /// Sample one path's data, appending to the points gathered so far.
    pub fn sample(&mut self, data: &str) {
        self.current = Point::ZERO;
        self.subpath_start = Point::ZERO;
        for command in tokenize(data) {
            self.apply(&command);
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    fn apply(&mut self, command: &Command) {
        let Some(n) = arity(command.letter) else {
            return;
        };
        let relative = command.letter.is_ascii_lowercase();
        let upper = command.letter.to_ascii_uppercase();
        if n == 0 {
            self.close();
            return;
        }
        for (i, args) in command.operands.chunks_exact(n).enumerate() {
            // Pairs after the first moveto are implicit linetos.
            let letter = if upper == 'M' && i > 0 { 'L' } else { upper };
            self.segment(letter, args, relative);
        }
    }

    fn segment(&mut self, letter: char, args: &[f64], relative: bool) {
        let origin = if relative { self.current.to_vec2() } else { Vec2::ZERO };
        let at = |x: f64, y: f64| Point::new(x, y) + origin;
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match letter {
            'M' => {
                let p = at(args[0], args[1]);
                self.points.push(p);
                self.current = p;
                self.subpath_start = p;
            }
            'L' => self.line_to(at(args[0], args[1])),
            'H' => {
                let x = if relative { self.current.x + args[0] } else { args[0] };
                self.line_to(Point::new(x, self.current.y));
            }
            'V' => {
                let y = if relative { self.current.y + args[0] } else { args[0] };
                self.line_to(Point::new(self.current.x, y));
            }
            'C' => {
                let (c1, c2) = (at(args[0], args[1]), at(args[2], args[3]));
                self.cubic_to(c1, c2, at(args[4], args[5]));
                cubic_ctrl = Some(c2);
            }
            'S' => {
                let c1 = self.reflect(self.last_cubic_ctrl);
                let c2 = at(args[0], args[1]);
                self.cubic_to(c1, c2, at(args[2], args[3]));
                cubic_ctrl = Some(c2);
            }
            'Q' => {
                let c = at(args[0], args[1]);
                self.quad_to(c, at(args[2], args[3]));
                quad_ctrl = Some(c);
            }
            'T' => {
                let c = self.reflect(self.last_quad_ctrl);
                self.quad_to(c, at(args[0], args[1]));
                quad_ctrl = Some(c);
            }
            'A' => {
                let arc = SvgArc {
                    from: self.current,
                    to: at(args[5], args[6]),
                    radii: Vec2::new(args[0].abs(), args[1].abs()),
                    x_rotation: args[2].to_radians(),
                    large_arc: args[3] != 0.0,
                    sweep: args[4] != 0.0,
                };
                self.arc_to(&arc);
            }
            _ => {}
        }
        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
    }

    fn reflect(&self, ctrl: Option<Point>) -> Point {
        match ctrl {
            Some(c) => self.current + (self.current - c),
            None => self.current,
        }
    }

    fn line_to(&mut self, p: Point) {
        self.points.push(p);
        self.current = p;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        let curve = CubicBez::new(self.current, c1, c2, end);
        self.push_samples(|t| curve.eval(t));
        self.current = end;
    }

    fn quad_to(&mut self, c: Point, end: Point) {
        let curve = QuadBez::new(self.current, c, end);
        self.push_samples(|t| curve.eval(t));
        self.current = end;
    }

    fn arc_to(&mut self, svg_arc: &SvgArc) {
        let Some(arc) = Arc::from_svg_arc(svg_arc) else {
            // Zero radii or coincident endpoints: a straight line.
            self.line_to(svg_arc.to);
            return;
        };
        for el in arc.append_iter(ARC_TOLERANCE) {
            if let PathEl::CurveTo(c1, c2, end) = el {
                self.cubic_to(c1, c2, end);
            }
        }
        self.current = svg_arc.to;
    }

    /// Samples at t = 1/steps .. 1, so the start point is never repeated.
    fn push_samples(&mut self, eval: impl Fn(f64) -> Point) {
        let steps = self.curve_steps;
        self.points
            .extend((1..=steps).map(|i| eval(i as f64 / steps as f64)));
    }

    fn close(&mut self) {
        if self.current != self.subpath_start {
            self.points.push(self.subpath_start);
        }
        self.current = self.subpath_start;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }
}

/// Sample path data into source-space points.
pub fn sample_path(data: &str, curve_steps: usize) -> Vec<Point> {
    let mut sampler = PathSampler::new(curve_steps);
    sampler.sample(data);
    sampler.into_points()
}
