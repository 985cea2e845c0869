use glam::Vec3;

use crate::{AssetError, Result};

/// Parse Wavefront OBJ text into a flat triangle list.
///
/// Handles the subset the heart asset uses: `v` positions and `f`
/// faces (fan-triangulated when they have more than three corners).
/// Face indices may carry `/vt/vn` suffixes and may be negative
/// (relative to the end of the vertex list); only the position index
/// is kept. Everything else (`vn`, `vt`, `o`, `g`, `s`, `usemtl`,
/// comments) is skipped.
pub fn parse_obj(text: &str) -> Result<Vec<Vec3>> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<Vec3> = Vec::new();

    for (line_idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let v = parse_vertex(line_idx, fields)?;
                vertices.push(v);
            }
            Some("f") => {
                let corners = fields
                    .map(|field| resolve_index(line_idx, field, vertices.len()))
                    .collect::<Result<Vec<usize>>>()?;
                if corners.len() < 3 {
                    return Err(AssetError::Parse {
                        line: line_idx + 1,
                        message: format!("face with {} corners", corners.len()),
                    });
                }
                for i in 1..corners.len() - 1 {
                    triangles.push(vertices[corners[0]]);
                    triangles.push(vertices[corners[i]]);
                    triangles.push(vertices[corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if triangles.is_empty() {
        return Err(AssetError::EmptyMesh);
    }
    Ok(triangles)
}

fn parse_vertex<'a>(line_idx: usize, mut fields: impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let mut out = [0.0f32; 3];
    for slot in &mut out {
        let field = fields.next().ok_or_else(|| AssetError::Parse {
            line: line_idx + 1,
            message: "vertex with fewer than 3 components".into(),
        })?;
        *slot = field.parse().map_err(|_| AssetError::Parse {
            line: line_idx + 1,
            message: format!("bad vertex component {field:?}"),
        })?;
    }
    Ok(Vec3::from_array(out))
}

/// Resolve one face corner (`7`, `7/1/3`, `-2`) to a vertex index.
fn resolve_index(line_idx: usize, field: &str, vertex_count: usize) -> Result<usize> {
    let position = field.split('/').next().unwrap_or(field);
    let value: i64 = position.parse().map_err(|_| AssetError::Parse {
        line: line_idx + 1,
        message: format!("bad face index {field:?}"),
    })?;
    let resolved = if value > 0 {
        value - 1
    } else if value < 0 {
        vertex_count as i64 + value
    } else {
        -1
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return Err(AssetError::Parse {
            line: line_idx + 1,
            message: format!("face index {value} out of range"),
        });
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn parses_vertices_and_fan_triangulates() {
        let tris = parse_obj(QUAD).unwrap();
        assert_eq!(tris.len(), 6); // quad -> two triangles
        assert_eq!(tris[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(tris[3], Vec3::new(0.0, 0.0, 0.0)); // fan anchor repeats
        assert_eq!(tris[5], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn slash_forms_keep_only_position_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n";
        let tris = parse_obj(text).unwrap();
        assert_eq!(tris.len(), 3);
        assert_eq!(tris[1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let tris = parse_obj(text).unwrap();
        assert_eq!(tris[2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let text = "v 0 0 0\nf 1 2 3\n";
        let err = parse_obj(text).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 2, .. }));
    }

    #[test]
    fn garbage_vertex_is_an_error() {
        let text = "v 0 zero 0\n";
        let err = parse_obj(text).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn no_faces_means_empty_mesh() {
        let err = parse_obj("v 0 0 0\n").unwrap_err();
        assert!(matches!(err, AssetError::EmptyMesh));
    }

    #[test]
    fn unknown_directives_are_skipped() {
        let text = "o heart\ns off\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1 2 3\n";
        assert_eq!(parse_obj(text).unwrap().len(), 3);
    }
}
