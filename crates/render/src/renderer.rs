use crate::OrbitCamera;
use carscene_common::NodeId;
use carscene_scene::{NodeKind, Scene};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and the camera, then produces output. It
/// never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &Scene, camera: &OrbitCamera) -> Self::Output;
}

/// Renders the scene tree as indented text.
///
/// Used by the CLI and by tests to inspect what a frame would show.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_node(out: &mut String, scene: &Scene, id: NodeId, depth: usize) {
        let Some(node) = scene.get(id) else {
            return;
        };
        let p = node.transform.position;
        let r = node.transform.rotation;
        let kind = match &node.kind {
            NodeKind::Group => "group".to_string(),
            NodeKind::Mesh { geometry, material } => {
                format!("mesh geometry={} material={}", geometry.0, material.0)
            }
            NodeKind::DirectionalLight {
                color, intensity, ..
            } => format!("light #{:06x} x{intensity:.2}", color.to_hex()),
            NodeKind::LightHelper {
                light,
                size,
                material,
            } => format!("helper of {light} size={size} material={}", material.0),
        };
        let hidden = if node.visible { "" } else { " (hidden)" };
        out.push_str(&format!(
            "{:indent$}{id} {} [{kind}] pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}){hidden}\n",
            "",
            node.name,
            p.x,
            p.y,
            p.z,
            r.x,
            r.y,
            r.z,
            indent = depth * 2
        ));
        for child in node.children() {
            Self::write_node(out, scene, *child, depth + 1);
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &OrbitCamera) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Scene ({} nodes) ===\n", scene.node_count()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov,
            camera.aspect
        ));
        for root in scene.roots() {
            Self::write_node(&mut out, scene, *root, 1);
        }
        out
    }
}
