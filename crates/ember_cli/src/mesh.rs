//! OBJ mesh loading into triangle primitives.

use anyhow::{Context, Result};
use ember_tracer::{Material, PrimitiveList, Triangle, Vec3};
use std::path::Path;
use std::sync::Arc;

/// Load every model of an OBJ file as triangles, scaled then offset.
///
/// Meshes that carry vertex normals become smooth triangles; the rest are
/// flat. Degenerate faces are skipped.
pub fn load_obj(
    path: &Path,
    scale: f32,
    offset: Vec3,
    material: Arc<Material>,
) -> Result<PrimitiveList> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to load OBJ {}", path.display()))?;

    if models.is_empty() {
        anyhow::bail!("No models found in OBJ file {}", path.display());
    }

    let mut triangles = PrimitiveList::new();
    let mut skipped = 0usize;

    for model in &models {
        let mesh = &model.mesh;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        log::debug!(
            "Model '{}': {} faces, normals: {}",
            model.name,
            mesh.indices.len() / 3,
            has_normals
        );

        let position = |i: u32| {
            let i = i as usize * 3;
            Vec3::from_slice(&mesh.positions[i..i + 3]) * scale + offset
        };
        let normal = |i: u32| {
            let i = i as usize * 3;
            Vec3::from_slice(&mesh.normals[i..i + 3])
        };

        for face in mesh.indices.chunks_exact(3) {
            let vertices = [position(face[0]), position(face[1]), position(face[2])];
            let triangle = if has_normals {
                Triangle::smooth(
                    vertices,
                    [normal(face[0]), normal(face[1]), normal(face[2])],
                    material.clone(),
                )
            } else {
                Triangle::new(vertices[0], vertices[1], vertices[2], material.clone())
            };

            if triangle.area() <= f32::EPSILON {
                skipped += 1;
                continue;
            }
            triangles.add(triangle);
        }
    }

    log::info!(
        "Loaded {} triangles from {} ({} degenerate skipped)",
        triangles.len(),
        path.display(),
        skipped
    );

    Ok(triangles)
}
