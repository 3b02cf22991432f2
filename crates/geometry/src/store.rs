use crate::{Material, MeshData};
use carscene_common::{GeometryHandle, MaterialHandle};
use std::collections::BTreeMap;

/// Registry of geometries and materials, addressed by handle.
///
/// Handles are allocated sequentially and never reused. Registering the same
/// data twice yields two handles; sharing is explicit, by passing the handle
/// around.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    geometries: BTreeMap<GeometryHandle, MeshData>,
    materials: BTreeMap<MaterialHandle, Material>,
    next_id: u64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a geometry and return its handle.
    pub fn add_geometry(&mut self, mesh: MeshData) -> GeometryHandle {
        let handle = GeometryHandle(self.allocate());
        tracing::debug!(
            handle = handle.0,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "registered geometry"
        );
        self.geometries.insert(handle, mesh);
        handle
    }

    /// Register a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.allocate());
        tracing::debug!(handle = handle.0, name = %material.name, "registered material");
        self.materials.insert(handle, material);
        handle
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&MeshData> {
        self.geometries.get(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle)
    }

    pub fn geometries(&self) -> &BTreeMap<GeometryHandle, MeshData> {
        &self.geometries
    }

    pub fn materials(&self) -> &BTreeMap<MaterialHandle, Material> {
        &self.materials
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
