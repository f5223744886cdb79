//! Transform string parsing.
//!
//! Two notations are accepted and may be mixed:
//!
//! ```text
//! x:1 y:2 rz:90deg          named components, separated by spaces, `;` or `,`
//! translate(1, 2, 0) rotateZ(90deg) scale(2)
//! ```
//!
//! Rotation values are radians unless suffixed with `deg`. Only the
//! components that appear in the string are populated, so a transform can
//! describe a partial update.

use serde::{Deserialize, Serialize};

/// Named numeric transform components. `None` means "not mentioned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformComponents {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub rx: Option<f32>,
    pub ry: Option<f32>,
    pub rz: Option<f32>,
    pub sx: Option<f32>,
    pub sy: Option<f32>,
    pub sz: Option<f32>,
}

impl TransformComponents {
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    #[must_use]
    pub fn has_rotation(&self) -> bool {
        self.rx.is_some() || self.ry.is_some() || self.rz.is_some()
    }

    #[must_use]
    pub fn has_scale(&self) -> bool {
        self.sx.is_some() || self.sy.is_some() || self.sz.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.has_position() || self.has_rotation() || self.has_scale())
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ';' || c == ','
}

/// Parses a transform string. Unknown names and unparseable values are
/// skipped with a warning.
#[must_use]
pub fn parse_transform(text: &str) -> TransformComponents {
    let mut out = TransformComponents::default();
    let mut rest = text;

    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c == ':' || c == '(' || is_separator(c))
            .unwrap_or(rest.len());
        if name_end == 0 {
            // Stray `:` or `(`: skip it.
            rest = &rest[1..];
            continue;
        }
        let name = &rest[..name_end];
        let after = rest[name_end..].trim_start();

        if let Some(args) = after.strip_prefix('(') {
            let Some(close) = args.find(')') else {
                log::warn!("Unterminated transform function `{name}` in `{text}`");
                break;
            };
            let values: Vec<&str> = args[..close].split(is_separator).filter(|s| !s.is_empty()).collect();
            apply_function(&mut out, name, &values);
            rest = &args[close + 1..];
        } else if let Some(value) = after.strip_prefix(':') {
            let value = value.trim_start();
            let value_end = value.find(is_separator).unwrap_or(value.len());
            apply_component(&mut out, name, &value[..value_end]);
            rest = &value[value_end..];
        } else {
            log::warn!("Ignoring transform token `{name}` in `{text}`");
            rest = after;
        }
    }

    out
}

fn parse_number(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok()
}

fn parse_angle(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Some(deg) = value.strip_suffix("deg") {
        return parse_number(deg).map(f32::to_radians);
    }
    parse_number(value.strip_suffix("rad").unwrap_or(value))
}

fn apply_component(out: &mut TransformComponents, name: &str, value: &str) {
    let slot = match name {
        "x" => &mut out.x,
        "y" => &mut out.y,
        "z" => &mut out.z,
        "rx" => &mut out.rx,
        "ry" => &mut out.ry,
        "rz" => &mut out.rz,
        "sx" => &mut out.sx,
        "sy" => &mut out.sy,
        "sz" => &mut out.sz,
        _ => {
            log::warn!("Unknown transform component `{name}`");
            return;
        }
    };

    let parsed = if name.starts_with('r') {
        parse_angle(value)
    } else {
        parse_number(value)
    };

    match parsed {
        Some(v) => *slot = Some(v),
        None => log::warn!("Invalid value `{value}` for transform component `{name}`"),
    }
}

fn apply_function(out: &mut TransformComponents, name: &str, args: &[&str]) {
    let numbers: Vec<f32> = args.iter().filter_map(|a| parse_number(a)).collect();
    let angles: Vec<f32> = args.iter().filter_map(|a| parse_angle(a)).collect();

    match name.to_ascii_lowercase().as_str() {
        "translate" | "translate3d" => {
            out.x = numbers.first().copied().or(out.x);
            out.y = numbers.get(1).copied().or(out.y);
            out.z = numbers.get(2).copied().or(out.z);
        }
        "translatex" => out.x = numbers.first().copied().or(out.x),
        "translatey" => out.y = numbers.first().copied().or(out.y),
        "translatez" => out.z = numbers.first().copied().or(out.z),
        "rotate" | "rotate3d" => {
            if let [rx, ry, rz] = angles[..] {
                out.rx = Some(rx);
                out.ry = Some(ry);
                out.rz = Some(rz);
            } else {
                out.rz = angles.first().copied().or(out.rz);
            }
        }
        "rotatex" => out.rx = angles.first().copied().or(out.rx),
        "rotatey" => out.ry = angles.first().copied().or(out.ry),
        "rotatez" => out.rz = angles.first().copied().or(out.rz),
        "scale" | "scale3d" => match numbers[..] {
            [s] => {
                out.sx = Some(s);
                out.sy = Some(s);
                out.sz = Some(s);
            }
            _ => {
                out.sx = numbers.first().copied().or(out.sx);
                out.sy = numbers.get(1).copied().or(out.sy);
                out.sz = numbers.get(2).copied().or(out.sz);
            }
        },
        "scalex" => out.sx = numbers.first().copied().or(out.sx),
        "scaley" => out.sy = numbers.first().copied().or(out.sy),
        "scalez" => out.sz = numbers.first().copied().or(out.sz),
        _ => log::warn!("Unknown transform function `{name}`"),
    }
}
