//! Line-by-line Wavefront OBJ reader.
//!
//! Each record is parsed on its own, so a malformed line is skipped and counted
//! instead of failing the whole file. Only a face index past the end of the
//! vertex data is fatal. `tobj` loads whole files and cannot skip records one
//! at a time, so it is not used here.

use crate::core::geometry::Face;
use crate::error::{RenderError, Result};
use crate::scene::mesh::Mesh;
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2};
use std::fs;
use std::path::Path;

/// Loads an OBJ file into a [`Mesh`].
///
/// Only `v`, `vt` and `f` records contribute to the mesh. Unreadable files fail with
/// [`RenderError::Io`]; faces pointing past the end of the vertex data fail with
/// [`RenderError::InvalidFaceIndex`] / [`RenderError::InvalidTexcoordIndex`].
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&source)
}

/// Parses OBJ text. Malformed lines are skipped and counted, never fatal.
pub fn parse_obj(source: &str) -> Result<Mesh> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut texcoords: Vec<Vector2<f32>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();
    let mut skipped = 0usize;

    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        let parsed = match keyword {
            "v" => parse_floats::<3>(tokens).map(|[x, y, z]| positions.push(Point3::new(x, y, z))),
            "vt" => parse_floats::<2>(tokens).map(|[u, v]| texcoords.push(Vector2::new(u, v))),
            "f" => parse_face(tokens, positions.len(), texcoords.len()).map(|polygon| {
                if polygon.len() < 3 {
                    warn!(
                        "line {}: face with {} vertices skipped",
                        line_no + 1,
                        polygon.len()
                    );
                } else {
                    triangulate_fan(&polygon, &mut faces);
                }
            }),
            // vn (normals are recomputed from geometry), o, g, s, usemtl, comments...
            _ => Some(()),
        };

        if parsed.is_none() {
            debug!("line {}: skipping malformed record '{}'", line_no + 1, line);
            skipped += 1;
        }
    }

    info!(
        "OBJ parsed: {} vertices, {} texcoords, {} triangles, {} malformed lines skipped",
        positions.len(),
        texcoords.len(),
        faces.len(),
        skipped
    );

    Mesh::new(positions, texcoords, faces)
}

/// One face corner: position index and optional texcoord index, both 0-based.
type Corner = (usize, Option<usize>);

/// Reads the first `N` tokens as floats. Extra tokens (e.g. a `w` component) are
/// ignored.
fn parse_floats<'a, const N: usize>(mut tokens: impl Iterator<Item = &'a str>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    position_count: usize,
    texcoord_count: usize,
) -> Option<Vec<Corner>> {
    tokens
        .map(|token| parse_corner(token, position_count, texcoord_count))
        .collect()
}

/// Parses `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn parse_corner(token: &str, position_count: usize, texcoord_count: usize) -> Option<Corner> {
    let mut parts = token.split('/');
    let position = resolve_index(parts.next()?, position_count)?;
    let texcoord = match parts.next() {
        None | Some("") => None,
        Some(t) => Some(resolve_index(t, texcoord_count)?),
    };
    Some((position, texcoord))
}

/// Converts a 1-based OBJ index to 0-based. Negative indices count back from the
/// records read so far. Zero, or a relative index reaching before the first record,
/// is malformed. Positive indices are not range-checked here.
fn resolve_index(token: &str, count: usize) -> Option<usize> {
    let index: i64 = token.parse().ok()?;
    match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => {
            let resolved = count as i64 + i;
            if resolved < 0 { None } else { Some(resolved as usize) }
        }
    }
}

/// Splits a polygon into triangles (0, i, i + 1).
fn triangulate_fan(polygon: &[Corner], faces: &mut Vec<Face>) {
    let (first_pos, first_tex) = polygon[0];
    for pair in polygon[1..].windows(2) {
        let (p1, t1) = pair[0];
        let (p2, t2) = pair[1];
        faces.push(Face {
            vertices: [first_pos, p1, p2],
            texcoords: [first_tex, t1, t2],
        });
    }
}
