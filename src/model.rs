//! Model loading.
//!
//! Loads a Wavefront OBJ file into a flat triangle soup with one
//! [`SubMesh`] per mesh in the file, carrying the material's diffuse color.

use std::path::Path;

use glam::Vec3;
use glow::HasContext;
use thiserror::Error;

use crate::abs::Vertex;

/// Diffuse color applied to meshes without a usable material.
pub const DEFAULT_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.8);

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load OBJ: {0}")]
    Load(#[from] tobj::LoadError),
    #[error("model contains no vertices")]
    Empty,
    #[error("model has zero spatial extent")]
    Degenerate,
}

/// A single vertex holding only a position.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl Vertex for PositionVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                0,
                3,
                glow::FLOAT,
                false,
                std::mem::size_of::<PositionVertex>() as i32,
                0,
            );
        }
    }
}

/// Axis-aligned bounding box over a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Computes the bounding box of a flat `[x, y, z, x, y, z, ..]` position
    /// array. Returns `None` for an empty array.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut chunks = positions.chunks_exact(3);
        let first = chunks.next()?;
        let first = Vec3::new(first[0], first[1], first[2]);
        let (min, max) = chunks.fold((first, first), |(min, max), p| {
            let p = Vec3::new(p[0], p[1], p[2]);
            (min.min(p), max.max(p))
        });
        Some(Self { min, max })
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// The largest of the three axis extents.
    pub fn max_extent(&self) -> f32 {
        self.extent().max_element()
    }
}

/// A contiguous vertex range of the model drawn with one color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubMesh {
    pub offset: usize,
    pub vertex_count: usize,
    pub color: Vec3,
}

/// A loaded OBJ model: triangulated positions partitioned into submeshes.
pub struct ObjModel {
    positions: Vec<f32>,
    submeshes: Vec<SubMesh>,
    aabb: Aabb,
}

impl ObjModel {
    /// Loads and triangulates the OBJ file at `path`. A missing or broken
    /// MTL file downgrades every affected mesh to [`DEFAULT_COLOR`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let materials = match materials {
            Ok(materials) => materials,
            Err(e) => {
                log::warn!("Failed to load materials for {}: {}", path.display(), e);
                Vec::new()
            }
        };
        Self::from_models(&models, &materials)
    }

    /// Builds the model from already-parsed OBJ data.
    pub fn from_models(
        models: &[tobj::Model],
        materials: &[tobj::Material],
    ) -> Result<Self, ModelError> {
        let mut positions = Vec::new();
        let mut submeshes = Vec::new();
        for model in models {
            let mesh = &model.mesh;
            let offset = positions.len() / 3;
            for &index in &mesh.indices {
                let i = index as usize * 3;
                positions.extend_from_slice(&mesh.positions[i..i + 3]);
            }
            let color = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(|material| Vec3::from(material.diffuse))
                .unwrap_or(DEFAULT_COLOR);
            submeshes.push(SubMesh {
                offset,
                vertex_count: positions.len() / 3 - offset,
                color,
            });
        }

        let aabb = Aabb::from_positions(&positions).ok_or(ModelError::Empty)?;
        if aabb.max_extent() <= 0.0 {
            return Err(ModelError::Degenerate);
        }

        Ok(Self {
            positions,
            submeshes,
            aabb,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// The vertex data as uploaded to the GPU.
    pub fn vertices(&self) -> Vec<PositionVertex> {
        self.positions
            .chunks_exact(3)
            .map(|p| PositionVertex {
                position: Vec3::new(p[0], p[1], p[2]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MESH_OBJ: &str = "\
o body
v 0.0 0.0 0.0
v 2.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
o wheel
v 0.0 0.0 -1.0
v 1.0 0.0 3.0
v 0.0 4.0 0.0
f 4 5 6
";

    fn load_str(obj: &str) -> ObjModel {
        let mut reader = std::io::BufReader::new(obj.as_bytes());
        let (models, materials) = tobj::load_obj_buf(
            &mut reader,
            &tobj::GPU_LOAD_OPTIONS,
            |_| -> tobj::MTLLoadResult { Ok(Default::default()) },
        )
        .unwrap();
        ObjModel::from_models(&models, &materials.unwrap()).unwrap()
    }

    #[test]
    fn submeshes_tile_the_vertex_array() {
        let model = load_str(TWO_MESH_OBJ);
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(model.submeshes().len(), 2);
        assert_eq!(model.submeshes()[0].offset, 0);
        assert_eq!(model.submeshes()[0].vertex_count, 3);
        assert_eq!(model.submeshes()[1].offset, 3);
        assert_eq!(model.submeshes()[1].vertex_count, 3);
        let total: usize = model.submeshes().iter().map(|s| s.vertex_count).sum();
        assert_eq!(total, model.vertex_count());
    }

    #[test]
    fn meshes_without_materials_get_the_default_color() {
        let model = load_str(TWO_MESH_OBJ);
        assert!(model.submeshes().iter().all(|s| s.color == DEFAULT_COLOR));
    }

    #[test]
    fn diffuse_color_is_taken_from_the_material() {
        let mut mesh = tobj::Mesh::default();
        mesh.positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        mesh.indices = vec![0, 1, 2];
        mesh.material_id = Some(0);
        let mut material = tobj::Material::default();
        material.diffuse = [1.0, 0.2, 0.1];
        let model =
            ObjModel::from_models(&[tobj::Model::new(mesh, "body".to_string())], &[material])
                .unwrap();
        assert_eq!(model.submeshes()[0].color, Vec3::new(1.0, 0.2, 0.1));
    }

    #[test]
    fn aabb_covers_all_meshes() {
        let model = load_str(TWO_MESH_OBJ);
        let aabb = model.aabb();
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(aabb.extent(), Vec3::new(2.0, 4.0, 4.0));
        assert_eq!(aabb.max_extent(), 4.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(matches!(
            ObjModel::from_models(&[], &[]),
            Err(ModelError::Empty)
        ));
    }

    #[test]
    fn zero_extent_model_is_rejected() {
        let mut mesh = tobj::Mesh::default();
        mesh.positions = vec![1.0, 1.0, 1.0];
        mesh.indices = vec![0, 0, 0];
        let result = ObjModel::from_models(&[tobj::Model::new(mesh, "point".to_string())], &[]);
        assert!(matches!(result, Err(ModelError::Degenerate)));
    }

    #[test]
    fn vertices_match_the_expanded_positions() {
        let model = load_str(TWO_MESH_OBJ);
        let vertices = model.vertices();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(vertices[5].position, Vec3::new(0.0, 4.0, 0.0));
    }
}
