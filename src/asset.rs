//! Doll model loading (glTF 2.0 / GLB)
//!
//! The document is parsed from bytes, external buffers are fetched relative
//! to the model path, and every triangle primitive of the default scene is
//! flattened into one coloured [`Mesh`] with node transforms baked in.
//! Textures are ignored; colour comes from `baseColorFactor` and `COLOR_0`.

use glam::{Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;

use crate::error::AssetError;
use crate::renderer::geometry::Mesh;

/// Where a glTF buffer's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferSource {
    /// The GLB binary chunk
    Blob,
    /// A file next to the model
    External(String),
}

/// Parse a `.gltf` or `.glb` document
pub fn parse_document(bytes: &[u8]) -> Result<gltf::Gltf, AssetError> {
    Ok(gltf::Gltf::from_slice(bytes)?)
}

/// List buffer sources in index order. Embedded data URIs are rejected.
pub fn buffer_sources(document: &gltf::Document) -> Result<Vec<BufferSource>, AssetError> {
    document
        .buffers()
        .map(|buffer| match buffer.source() {
            Source::Bin => Ok(BufferSource::Blob),
            Source::Uri(uri) if uri.starts_with("data:") => Err(AssetError::UnsupportedUri(
                uri.chars().take(32).collect(),
            )),
            Source::Uri(uri) => Ok(BufferSource::External(uri.to_string())),
        })
        .collect()
}

/// Resolve a buffer URI against the directory of the model path
pub fn resolve_uri(model_path: &str, uri: &str) -> String {
    match model_path.rfind('/') {
        Some(slash) => format!("{}/{}", &model_path[..slash], uri),
        None => uri.to_string(),
    }
}

/// Flatten the default scene (or the first one) into a single mesh
pub fn build_mesh(document: &gltf::Document, buffers: &[Vec<u8>]) -> Result<Mesh, AssetError> {
    if let Some(missing) = document.buffers().find(|b| b.index() >= buffers.len()) {
        return Err(AssetError::MissingBuffer(missing.index()));
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::Empty)?;

    let mut mesh = Mesh::new();
    for node in scene.nodes() {
        append_node(&node, Mat4::IDENTITY, buffers, &mut mesh)?;
    }

    if mesh.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(mesh)
}

fn append_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[Vec<u8>],
    out: &mut Mesh,
) -> Result<(), AssetError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed");
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::debug!("Skipping {:?} primitive in mesh '{}'", primitive.mode(), name);
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingPositions(name.to_string()))?
                .map(|p| world.transform_point3(Vec3::from(p)))
                .collect();

            let base = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            let colors: Vec<[f32; 4]> = match reader.read_colors(0) {
                Some(colors) => colors
                    .into_rgba_f32()
                    .map(|c| [c[0] * base[0], c[1] * base[1], c[2] * base[2], c[3] * base[3]])
                    .collect(),
                None => vec![base; positions.len()],
            };

            let indices: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize).collect(),
                None => (0..positions.len()).collect(),
            };

            for tri in indices.chunks_exact(3) {
                let (Some(&a), Some(&b), Some(&c)) = (
                    positions.get(tri[0]),
                    positions.get(tri[1]),
                    positions.get(tri[2]),
                ) else {
                    continue;
                };
                let color = colors.get(tri[0]).copied().unwrap_or(base);
                out.push_triangle(a, b, c, color);
            }
        }
    }

    for child in node.children() {
        append_node(&child, world, buffers, out)?;
    }
    Ok(())
}

/// Fetch and flatten a model over HTTP
#[cfg(target_arch = "wasm32")]
pub async fn load_model(path: &str) -> Result<Mesh, AssetError> {
    let bytes = fetch_bytes(path).await?;
    let gltf = parse_document(&bytes)?;

    let mut buffers = Vec::new();
    for (index, source) in buffer_sources(&gltf.document)?.into_iter().enumerate() {
        let data = match source {
            BufferSource::Blob => gltf.blob.clone().ok_or(AssetError::MissingBuffer(index))?,
            BufferSource::External(uri) => fetch_bytes(&resolve_uri(path, &uri)).await?,
        };
        buffers.push(data);
    }

    build_mesh(&gltf.document, &buffers)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| AssetError::Fetch {
        path: path.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(format!("{e:?}")))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fail("not a Response".to_string()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let promise = response.array_buffer().map_err(|e| fail(format!("{e:?}")))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|e| fail(format!("{e:?}")))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Read and flatten a model from disk
#[cfg(not(target_arch = "wasm32"))]
pub fn load_model_file(path: &str) -> Result<Mesh, AssetError> {
    let read = |path: &str| {
        std::fs::read(path).map_err(|e| AssetError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    };

    let bytes = read(path)?;
    let gltf = parse_document(&bytes)?;

    let mut buffers = Vec::new();
    for (index, source) in buffer_sources(&gltf.document)?.into_iter().enumerate() {
        let data = match source {
            BufferSource::Blob => gltf.blob.clone().ok_or(AssetError::MissingBuffer(index))?,
            BufferSource::External(uri) => read(&resolve_uri(path, &uri))?,
        };
        buffers.push(data);
    }

    build_mesh(&gltf.document, &buffers)
}
