use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, trace};

use crate::mesh::{Polygon, Polyhedron};
use crate::point2d::Point2D;
use crate::point3d::Point3D;

pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Polyhedron> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mesh = parse_obj(BufReader::new(file)).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!("loaded {} polygons from {}", mesh.polygons.len(), path.display());
    Ok(mesh)
}

#[derive(Default)]
struct ObjData {
    positions: Vec<Point3D>,
    texcoords: Vec<Point2D>,
    polygons: Vec<Polygon>,
}

impl ObjData {
    fn record(&mut self, tokens: &[&str]) -> Result<()> {
        match tokens[0] {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&tokens[1..])?;
                self.positions.push(Point3D::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&tokens[1..])?;
                self.texcoords.push(Point2D::new(u, v));
            }
            "f" => {
                let face = parse_face(&tokens[1..], &self.positions, &self.texcoords)?;
                self.polygons.push(face);
            }
            other => trace!("skipping obj record {other}"),
        }
        Ok(())
    }
}

/// Reads `v`, `vt` and `f` records into one polygon per face. Other records
/// are ignored.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Polyhedron> {
    let mut data = ObjData::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue;
        }
        data.record(&tokens)
            .with_context(|| format!("line {}: {line}", line_no + 1))?;
    }

    Ok(Polyhedron::new(data.polygons))
}

fn parse_floats<const N: usize>(tokens: &[&str]) -> Result<[f32; N]> {
    if tokens.len() < N {
        bail!("expected {N} numbers, found {}", tokens.len());
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse()?;
    }
    Ok(out)
}

fn parse_face(tokens: &[&str], positions: &[Point3D], texcoords: &[Point2D]) -> Result<Polygon> {
    if tokens.len() < 3 {
        bail!("face needs at least 3 vertices");
    }
    let mut points = Vec::with_capacity(tokens.len());
    let mut uvs = Vec::with_capacity(tokens.len());

    for part in tokens {
        let (v_index, vt_index) = parse_face_vertex(part)?;
        points.push(positions[resolve_index(v_index, positions.len())?]);
        if let Some(vt) = vt_index {
            uvs.push(texcoords[resolve_index(vt, texcoords.len())?]);
        }
    }

    // UVs only count when every corner has one
    if uvs.len() == points.len() {
        Ok(Polygon::textured(points, uvs))
    } else {
        Ok(Polygon::new(points))
    }
}

fn parse_face_vertex(s: &str) -> Result<(i64, Option<i64>)> {
    let parts: Vec<&str> = s.split('/').collect();
    let v = parts.first().ok_or_else(|| anyhow!("Missing vertex index"))?.parse::<i64>()?;
    let vt = match parts.get(1) {
        Some(&"") | None => None,
        Some(s) => Some(s.parse::<i64>()?),
    };
    Ok((v, vt))
}

/// 1-based index, or negative index counting back from the last element.
fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index - 1 };
    if index == 0 || resolved < 0 || resolved >= len as i64 {
        bail!("index {index} out of range (have {len})");
    }
    Ok(resolved as usize)
}
