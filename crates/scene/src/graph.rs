use carscene_common::{Color, GeometryHandle, MaterialHandle, NodeId, Transform};
use carscene_geometry::{AssetStore, Material, MeshData};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a node is. Every kind carries a transform and may have children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure transform node.
    Group,
    /// Geometry drawn with a material.
    Mesh {
        geometry: GeometryHandle,
        material: MaterialHandle,
    },
    /// Parallel light shining from the node's position toward `target`.
    DirectionalLight {
        color: Color,
        intensity: f32,
        target: Vec3,
    },
    /// Debug visualisation of a directional light: a square of side `size`
    /// at the light's position and a line to its target, drawn in the
    /// colour of `material`.
    LightHelper {
        light: NodeId,
        size: f32,
        material: MaterialHandle,
    },
}

/// A node in the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }
}

/// A record of every structural change to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Node was created (detached).
    Created { id: NodeId, name: String },
    /// Node was attached under `parent`, or directly under the scene root
    /// when `parent` is `None`.
    Attached { id: NodeId, parent: Option<NodeId> },
    /// Node was detached from its parent or from the root.
    Detached { id: NodeId },
}

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle { child: NodeId, parent: NodeId },
    #[error("geometry {0:?} is not registered")]
    UnknownGeometry(GeometryHandle),
    #[error("material {0:?} is not registered")]
    UnknownMaterial(MaterialHandle),
    #[error("node {0} is not a directional light")]
    NotALight(NodeId),
}

/// The scene: node storage, root list and the asset store the meshes draw
/// from.
///
/// Nodes are created detached and become part of the rendered scene once
/// they are attached, directly or through ancestors, to the root.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
    assets: AssetStore,
    event_log: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn add_geometry(&mut self, mesh: MeshData) -> GeometryHandle {
        self.assets.add_geometry(mesh)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.assets.add_material(material)
    }

    /// Total number of nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes attached directly under the root, in attachment order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    /// Every structural change since the scene was created, oldest first.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Create a detached node.
    pub fn create(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let name = name.into();
        self.event_log.push(SceneEvent::Created {
            id,
            name: name.clone(),
        });
        self.nodes.insert(
            id,
            Node {
                name,
                kind,
                transform: Transform::default(),
                visible: true,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn create_group(&mut self, name: impl Into<String>) -> NodeId {
        self.create(name, NodeKind::Group)
    }

    /// Create a detached mesh node; both handles must be registered.
    pub fn create_mesh(
        &mut self,
        name: impl Into<String>,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> Result<NodeId, SceneError> {
        if self.assets.geometry(geometry).is_none() {
            return Err(SceneError::UnknownGeometry(geometry));
        }
        if self.assets.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
        Ok(self.create(name, NodeKind::Mesh { geometry, material }))
    }

    /// Create a detached helper for an existing directional light.
    pub fn create_light_helper(
        &mut self,
        name: impl Into<String>,
        light: NodeId,
        size: f32,
        material: MaterialHandle,
    ) -> Result<NodeId, SceneError> {
        if !matches!(self.node(light)?.kind, NodeKind::DirectionalLight { .. }) {
            return Err(SceneError::NotALight(light));
        }
        if self.assets.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
        Ok(self.create(
            name,
            NodeKind::LightHelper {
                light,
                size,
                material,
            },
        ))
    }

    /// Attach `child` under `parent`, or under the root when `parent` is
    /// `None`. A node that is already attached somewhere is moved.
    pub fn add(&mut self, parent: Option<NodeId>, child: NodeId) -> Result<(), SceneError> {
        self.node(child)?;
        if let Some(p) = parent {
            self.node(p)?;
            if p == child || self.is_ancestor(child, p) {
                tracing::debug!(%child, parent = %p, "rejected attach that would form a cycle");
                return Err(SceneError::WouldCycle { child, parent: p });
            }
        }
        self.detach(child)?;
        match parent {
            Some(p) => self.node_mut(p)?.children.push(child),
            None => self.roots.push(child),
        }
        self.node_mut(child)?.parent = parent;
        tracing::trace!(%child, ?parent, "attached");
        self.event_log.push(SceneEvent::Attached { id: child, parent });
        Ok(())
    }

    /// Attach `child` directly under the root.
    pub fn add_to_root(&mut self, child: NodeId) -> Result<(), SceneError> {
        self.add(None, child)
    }

    /// Remove `id` from its parent (or the root). The node and its subtree
    /// stay in storage and can be attached again.
    pub fn detach(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.node(id)?.parent;
        let was_attached = match parent {
            Some(p) => {
                let siblings = &mut self.node_mut(p)?.children;
                let before = siblings.len();
                siblings.retain(|c| *c != id);
                siblings.len() != before
            }
            None => {
                let before = self.roots.len();
                self.roots.retain(|c| *c != id);
                self.roots.len() != before
            }
        };
        self.node_mut(id)?.parent = None;
        if was_attached {
            tracing::trace!(%id, "detached");
            self.event_log.push(SceneEvent::Detached { id });
        }
        Ok(())
    }

    /// True if `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.nodes.get(&p).and_then(|n| n.parent);
        }
        false
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(self.node(id)?.children())
    }

    pub fn transform(&self, id: NodeId) -> Result<Transform, SceneError> {
        Ok(self.node(id)?.transform)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        self.node_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.position = position;
        Ok(())
    }

    /// Add `delta` to the node's position.
    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.position += delta;
        Ok(())
    }

    /// Add `delta` (Euler XYZ, radians) to the node's rotation.
    pub fn rotate(&mut self, id: NodeId, delta: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.rotation += delta;
        Ok(())
    }

    /// Local-to-world matrix: the product of the parent chain, root first.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let node = self.node(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(p) => Ok(self.world_matrix(p)? * local),
            None => Ok(local),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.world_matrix(id)?.transform_point3(Vec3::ZERO))
    }

    /// Depth-first walk over every visible node reachable from the root,
    /// parents before children, yielding each node's world matrix. A hidden
    /// node hides its subtree.
    pub fn walk(&self) -> Vec<(NodeId, &Node, Mat4)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            out.push((id, node, world));
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        out
    }

    /// Find the first attached node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|(_, node, _)| node.name == name)
            .map(|(id, _, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carscene_common::radians;
    use carscene_geometry::plane;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert_eq!(s.node_count(), 0);
        assert!(s.roots().is_empty());
        assert!(s.walk().is_empty());
    }

    #[test]
    fn created_nodes_are_detached_until_added() {
        let mut s = Scene::new();
        let g = s.create_group("car");
        assert!(s.walk().is_empty());
        s.add_to_root(g).unwrap();
        assert_eq!(s.walk().len(), 1);
    }

    #[test]
    fn ids_are_sequential() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
    }

    #[test]
    fn add_rejects_missing_nodes() {
        let mut s = Scene::new();
        let g = s.create_group("g");
        assert!(matches!(
            s.add(Some(NodeId(42)), g),
            Err(SceneError::NodeNotFound(NodeId(42)))
        ));
        assert!(matches!(
            s.add_to_root(NodeId(7)),
            Err(SceneError::NodeNotFound(NodeId(7)))
        ));
    }

    #[test]
    fn add_rejects_cycles() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        let c = s.create_group("c");
        s.add(Some(a), b).unwrap();
        s.add(Some(b), c).unwrap();
        assert!(matches!(s.add(Some(c), a), Err(SceneError::WouldCycle { .. })));
        assert!(matches!(s.add(Some(a), a), Err(SceneError::WouldCycle { .. })));
        // failed attach leaves the hierarchy untouched
        assert_eq!(s.children(a).unwrap(), &[b]);
        assert_eq!(s.get(a).unwrap().parent(), None);
    }

    #[test]
    fn add_moves_between_parents() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        let child = s.create_group("child");
        s.add(Some(a), child).unwrap();
        s.add(Some(b), child).unwrap();
        assert!(s.children(a).unwrap().is_empty());
        assert_eq!(s.children(b).unwrap(), &[child]);
        assert_eq!(s.get(child).unwrap().parent(), Some(b));
    }

    #[test]
    fn create_mesh_checks_handles() {
        let mut s = Scene::new();
        let geometry = s.add_geometry(plane(1.0, 1.0).unwrap());
        let material = s.add_material(Material::default());
        assert!(s.create_mesh("ok", geometry, material).is_ok());
        assert!(matches!(
            s.create_mesh("bad", GeometryHandle(99), material),
            Err(SceneError::UnknownGeometry(_))
        ));
        assert!(matches!(
            s.create_mesh("bad", geometry, MaterialHandle(99)),
            Err(SceneError::UnknownMaterial(_))
        ));
    }

    #[test]
    fn light_helper_requires_light_and_material() {
        let mut s = Scene::new();
        let material = s.add_material(Material::line_basic("helper", Color::WHITE));
        let g = s.create_group("g");
        assert!(matches!(
            s.create_light_helper("helper", g, 5.0, material),
            Err(SceneError::NotALight(_))
        ));
        let light = s.create(
            "sun",
            NodeKind::DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                target: Vec3::ZERO,
            },
        );
        assert!(matches!(
            s.create_light_helper("helper", light, 5.0, MaterialHandle(99)),
            Err(SceneError::UnknownMaterial(_))
        ));
        assert!(s.create_light_helper("helper", light, 5.0, material).is_ok());
    }

    #[test]
    fn world_matrix_composes_parent_first() {
        let mut s = Scene::new();
        let parent = s.create_group("parent");
        let child = s.create_group("child");
        s.add_to_root(parent).unwrap();
        s.add(Some(parent), child).unwrap();

        s.set_transform(
            parent,
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
                .with_rotation(Vec3::new(0.0, radians(90.0), 0.0)),
        )
        .unwrap();
        s.set_position(child, Vec3::new(0.0, 0.0, 1.0)).unwrap();

        // a quarter turn about Y maps +Z to +X
        assert!(approx(
            s.world_position(child).unwrap(),
            Vec3::new(11.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn translate_and_rotate_accumulate() {
        let mut s = Scene::new();
        let g = s.create_group("g");
        s.translate(g, Vec3::Z).unwrap();
        s.translate(g, Vec3::Z).unwrap();
        s.rotate(g, Vec3::new(0.0, 0.5, 0.0)).unwrap();
        let t = s.transform(g).unwrap();
        assert_eq!(t.position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(t.rotation.y, 0.5);
    }

    #[test]
    fn walk_skips_hidden_subtrees() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        let c = s.create_group("c");
        s.add_to_root(a).unwrap();
        s.add(Some(a), b).unwrap();
        s.add(Some(b), c).unwrap();
        assert_eq!(s.walk().len(), 3);
        s.get_mut(b).unwrap().visible = false;
        let ids: Vec<NodeId> = s.walk().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![a]);
    }

    #[test]
    fn walk_is_depth_first_in_attachment_order() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let a1 = s.create_group("a1");
        let b = s.create_group("b");
        s.add_to_root(a).unwrap();
        s.add_to_root(b).unwrap();
        s.add(Some(a), a1).unwrap();
        let ids: Vec<NodeId> = s.walk().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![a, a1, b]);
        assert_eq!(s.find_by_name("a1"), Some(a1));
        assert_eq!(s.find_by_name("missing"), None);
    }

    #[test]
    fn events_are_recorded() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        s.add_to_root(a).unwrap();
        s.add(Some(a), b).unwrap();
        s.add_to_root(b).unwrap();
        // 2 creates, 3 attaches, 1 detach (b leaves a)
        assert_eq!(s.events().len(), 6);
        assert!(s.events().contains(&SceneEvent::Detached { id: b }));
        assert_eq!(
            s.events()[0],
            SceneEvent::Created {
                id: a,
                name: "a".into()
            }
        );
    }

    #[test]
    fn rejected_attach_records_nothing() {
        let mut s = Scene::new();
        let a = s.create_group("a");
        let b = s.create_group("b");
        s.add(Some(a), b).unwrap();
        let before = s.events().len();
        assert!(s.add(Some(b), a).is_err());
        assert_eq!(s.events().len(), before);
    }
}
