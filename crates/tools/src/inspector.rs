use carscene_common::NodeId;
use carscene_scene::{NodeKind, Scene};
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Read-only queries used by the CLI output and the desktop HUD.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut summary = SceneSummary {
            nodes: scene.node_count(),
            attached: 0,
            meshes: 0,
            lights: 0,
            geometries: scene.assets().geometries().len(),
            materials: scene.assets().materials().len(),
            triangles: 0,
            events: scene.events().len(),
        };
        for (_, node, _) in scene.walk() {
            summary.attached += 1;
            match &node.kind {
                NodeKind::Mesh { geometry, .. } => {
                    summary.meshes += 1;
                    summary.triangles += scene
                        .assets()
                        .geometry(*geometry)
                        .map_or(0, |m| m.triangle_count());
                }
                NodeKind::DirectionalLight { .. } => summary.lights += 1,
                NodeKind::Group | NodeKind::LightHelper { .. } => {}
            }
        }
        summary
    }

    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        let node = scene.get(id)?;
        let t = node.transform;
        let world = scene.world_position(id).ok()?;
        Some(NodeInfo {
            id: id.0,
            name: node.name.clone(),
            kind: kind_name(&node.kind).to_string(),
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            world_position: world.to_array(),
            children: node.children().len(),
        })
    }

    /// Every attached node, parents first.
    pub fn list_nodes(scene: &Scene) -> Vec<NodeInfo> {
        scene
            .walk()
            .into_iter()
            .filter_map(|(id, _, _)| Self::inspect_node(scene, id))
            .collect()
    }
}

fn kind_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Group => "group",
        NodeKind::Mesh { .. } => "mesh",
        NodeKind::DirectionalLight { .. } => "directional_light",
        NodeKind::LightHelper { .. } => "light_helper",
    }
}

/// Summary of scene contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub nodes: usize,
    /// Nodes reachable from the root and visible.
    pub attached: usize,
    pub meshes: usize,
    pub lights: usize,
    pub geometries: usize,
    pub materials: usize,
    /// Triangles drawn per frame.
    pub triangles: usize,
    /// Structural changes recorded since the scene was created.
    pub events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} attached={} meshes={} lights={} geometries={} materials={} triangles={} events={}",
            self.nodes,
            self.attached,
            self.meshes,
            self.lights,
            self.geometries,
            self.materials,
            self.triangles,
            self.events
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub world_position: [f32; 3],
    pub children: usize,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} ({}) pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3})",
            self.id,
            self.name,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carscene_common::{Color, Transform};
    use carscene_geometry::{CylinderParams, Material, cylinder};
    use glam::Vec3;

    fn wheel_scene() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(cylinder(&CylinderParams::new(5.0, 3.0, 10)).unwrap());
        let material = scene.add_material(Material::toon("tire", Color::BLACK));
        let car = scene.create_group("car");
        scene
            .set_transform(car, Transform::from_position(Vec3::new(0.0, 0.0, 10.0)))
            .unwrap();
        scene.add_to_root(car).unwrap();
        let wheel = scene.create_mesh("wheel", geometry, material).unwrap();
        scene
            .set_transform(wheel, Transform::from_position(Vec3::new(8.5, 5.0, 8.0)))
            .unwrap();
        scene.add(Some(car), wheel).unwrap();
        (scene, car, wheel)
    }

    #[test]
    fn summary_empty_scene() {
        let summary = SceneInspector::summary(&Scene::new());
        assert_eq!(summary.nodes, 0);
        assert_eq!(summary.triangles, 0);
        assert_eq!(summary.events, 0);
    }

    #[test]
    fn summary_counts_meshes_and_triangles() {
        let (mut scene, _, _) = wheel_scene();
        // detached nodes count as nodes but are not drawn
        scene.create_group("orphan");
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.attached, 2);
        assert_eq!(summary.meshes, 1);
        assert_eq!(summary.geometries, 1);
        assert_eq!(summary.materials, 1);
        assert_eq!(summary.triangles, 40);
    }

    #[test]
    fn summary_counts_structural_events() {
        let (mut scene, car, wheel) = wheel_scene();
        // two creates and two attaches
        assert_eq!(SceneInspector::summary(&scene).events, 4);
        scene.add_to_root(wheel).unwrap();
        // the wheel leaves the car, then joins the root
        assert_eq!(SceneInspector::summary(&scene).events, 6);
        assert!(scene.add(Some(wheel), car).is_ok());
        assert!(scene.add(Some(car), wheel).is_err());
        assert_eq!(SceneInspector::summary(&scene).events, 8);
    }

    #[test]
    fn inspect_node_reports_world_position() {
        let (scene, _, wheel) = wheel_scene();
        let info = SceneInspector::inspect_node(&scene, wheel).unwrap();
        assert_eq!(info.kind, "mesh");
        assert_eq!(info.position, [8.5, 5.0, 8.0]);
        assert_eq!(info.world_position, [8.5, 5.0, 18.0]);
    }

    #[test]
    fn inspect_missing_node() {
        let (scene, _, _) = wheel_scene();
        assert!(SceneInspector::inspect_node(&scene, NodeId(999)).is_none());
    }

    #[test]
    fn list_nodes_parents_first() {
        let (scene, car, wheel) = wheel_scene();
        let ids: Vec<u64> = SceneInspector::list_nodes(&scene).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![car.0, wheel.0]);
    }

    #[test]
    fn summary_serializes_to_json() {
        let (scene, _, _) = wheel_scene();
        let json = serde_json::to_string(&SceneInspector::summary(&scene)).unwrap();
        assert!(json.contains("\"meshes\":1"));
    }

    #[test]
    fn display_formats() {
        let (scene, car, _) = wheel_scene();
        let s = SceneInspector::summary(&scene).to_string();
        assert!(s.contains("meshes=1"));
        assert!(s.ends_with("events=4"));
        let info = SceneInspector::inspect_node(&scene, car).unwrap().to_string();
        assert!(info.contains("car (group)"));
    }
}
