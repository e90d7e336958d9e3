use crate::asset::types::{
    AnimChannel, AnimClip, ChannelValues, CpuMesh, CpuTexture, Interpolation, LoadedAsset,
    NodeDesc,
};
use crate::scene::Aabb;
use anyhow::{Context, Result, bail};
use nalgebra_glm as glm;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Where the asset comes from. http(s) sources must be self-contained `.glb`
/// files; file sources may be `.gltf` with sidecar buffers and images.
#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::Path(PathBuf::from(raw))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Source::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Url(url) => url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(url)
                .to_string(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Messages the loader task sends back to the frame loop.
pub enum LoadResult {
    Progress(f32),
    Success(Box<LoadedAsset>),
    Error(String),
}

/// Kick off the background load. Completion arrives over `sender`; the
/// channel is drained once per frame by the app.
pub fn spawn_load(handle: &tokio::runtime::Handle, source: Source, sender: Sender<LoadResult>) {
    handle.spawn(async move {
        match load_asset(&source, &sender).await {
            Ok(asset) => {
                let _ = sender.send(LoadResult::Success(Box::new(asset)));
            }
            Err(e) => {
                let _ = sender.send(LoadResult::Error(format!("{e:#}")));
            }
        }
    });
}

async fn load_asset(source: &Source, progress: &Sender<LoadResult>) -> Result<LoadedAsset> {
    let _ = progress.send(LoadResult::Progress(0.0));
    let (doc, buffers, images) = match source {
        Source::Path(path) => {
            let path = path.clone();
            // gltf::import reads sidecar files synchronously
            tokio::task::spawn_blocking(move || gltf::import(&path))
                .await
                .context("import task panicked")?
                .with_context(|| format!("import {source}"))?
        }
        Source::Url(url) => {
            if !url.ends_with(".glb") {
                bail!("only self-contained .glb assets can be fetched over http: {url}");
            }
            let bytes = download(url, progress).await?;
            gltf::import_slice(&bytes).with_context(|| format!("parse {url}"))?
        }
    };
    let _ = progress.send(LoadResult::Progress(1.0));
    build_asset(source.display_name(), &doc, &buffers, &images)
}

async fn download(url: &str, progress: &Sender<LoadResult>) -> Result<Vec<u8>> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("download {url}"))?;
    if !response.status().is_success() {
        bail!("HTTP {} from {url}", response.status());
    }
    let total = response.content_length().unwrap_or(0);
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("read response from {url}"))?
    {
        bytes.extend_from_slice(&chunk);
        if total > 0 {
            let _ = progress.send(LoadResult::Progress(bytes.len() as f32 / total as f32));
        }
    }
    Ok(bytes)
}

fn build_asset(
    name: String,
    doc: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<LoadedAsset> {
    let mut nodes: Vec<NodeDesc> = doc
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            NodeDesc {
                name: node.name().unwrap_or("").to_string(),
                parent: None,
                translation: glm::make_vec3(&t),
                rotation: glm::Quat::new(r[3], r[0], r[1], r[2]),
                scale: glm::make_vec3(&s),
            }
        })
        .collect();
    for node in doc.nodes() {
        for child in node.children() {
            if let Some(desc) = nodes.get_mut(child.index()) {
                desc.parent = Some(node.index());
            }
        }
    }

    let textures: Vec<CpuTexture> = images.iter().map(to_rgba8).collect();

    let mut meshes = Vec::new();
    for node in doc.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        for prim in mesh.primitives() {
            let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let positions: Vec<[f32; 3]> = match reader.read_positions() {
                Some(it) => it.collect(),
                None => continue,
            };
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(it) => it.collect(),
                None => vec![[0.0, 1.0, 0.0]; positions.len()],
            };
            let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                Some(tc) => tc.into_f32().collect(),
                None => vec![[0.0, 0.0]; positions.len()],
            };
            let indices: Vec<u32> = match reader.read_indices() {
                Some(ri) => ri.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let bb = prim.bounding_box();
            let texture = prim
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .map(|info| info.texture().source().index())
                .filter(|&i| i < textures.len());
            meshes.push(CpuMesh {
                node: node.index(),
                positions,
                normals,
                uvs,
                indices,
                texture,
                bounds: Aabb::new(glm::make_vec3(&bb.min), glm::make_vec3(&bb.max)),
            });
        }
    }
    if meshes.is_empty() {
        bail!("no renderable geometry in {name}");
    }

    let mut clips = Vec::new();
    for anim in doc.animations() {
        let mut channels = Vec::new();
        let mut duration = 0.0f32;
        for channel in anim.channels() {
            let reader = channel.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let times: Vec<f32> = match reader.read_inputs() {
                Some(it) => it.collect(),
                None => continue,
            };
            if times.is_empty() {
                continue;
            }
            let raw_interp = channel.sampler().interpolation();
            let cubic = raw_interp == gltf::animation::Interpolation::CubicSpline;
            let interpolation = match raw_interp {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                // Cubic spline tangents are dropped; the value track still
                // plays back linearly.
                _ => Interpolation::Linear,
            };
            use gltf::animation::util::ReadOutputs;
            let values = match reader.read_outputs() {
                Some(ReadOutputs::Translations(it)) => {
                    ChannelValues::Translation(pick_values(it.collect(), cubic))
                }
                Some(ReadOutputs::Rotations(rot)) => {
                    ChannelValues::Rotation(pick_values(rot.into_f32().collect(), cubic))
                }
                Some(ReadOutputs::Scales(it)) => {
                    ChannelValues::Scale(pick_values(it.collect(), cubic))
                }
                // Morph target weights are not part of this viewer.
                _ => continue,
            };
            if values.len() != times.len() {
                log::warn!(
                    "skipping animation channel with {} keys but {} values",
                    times.len(),
                    values.len()
                );
                continue;
            }
            duration = duration.max(*times.last().unwrap_or(&0.0));
            channels.push(AnimChannel {
                node: channel.target().node().index(),
                times,
                values,
                interpolation,
            });
        }
        if !channels.is_empty() {
            clips.push(AnimClip {
                name: anim.name().unwrap_or("clip").to_string(),
                duration,
                channels,
            });
        }
    }

    Ok(LoadedAsset {
        name,
        nodes,
        meshes,
        textures,
        clips,
    })
}

/// Cubic spline samplers store in-tangent / value / out-tangent triplets;
/// keep only the value element so the track aligns with its keyframe times.
fn pick_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.chunks(3).filter_map(|c| c.get(1).copied()).collect()
    } else {
        values
    }
}

fn to_rgba8(data: &gltf::image::Data) -> CpuTexture {
    use gltf::image::Format;
    let pixel_count = (data.width * data.height) as usize;
    let rgba = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for px in data.pixels.chunks(3) {
                out.extend_from_slice(px);
                out.push(255);
            }
            out
        }
        Format::R8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for &v in &data.pixels {
                out.extend_from_slice(&[v, v, v, 255]);
            }
            out
        }
        Format::R8G8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for px in data.pixels.chunks(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
            out
        }
        other => {
            log::warn!("unsupported texture format {other:?}, using white");
            return CpuTexture {
                rgba: vec![255, 255, 255, 255],
                width: 1,
                height: 1,
            };
        }
    };
    CpuTexture {
        rgba,
        width: data.width,
        height: data.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urls_and_paths() {
        assert!(matches!(
            Source::parse("https://example.com/fan.glb"),
            Source::Url(_)
        ));
        assert!(matches!(Source::parse("models/scene.gltf"), Source::Path(_)));
        assert_eq!(
            Source::parse("https://example.com/models/fan.glb").display_name(),
            "fan.glb"
        );
        assert_eq!(Source::parse("models/scene.gltf").display_name(), "scene.gltf");
    }

    #[test]
    fn cubic_values_keep_middle_of_triplet() {
        let picked = pick_values(vec![0, 1, 2, 3, 4, 5], true);
        assert_eq!(picked, vec![1, 4]);
        let passthrough = pick_values(vec![0, 1, 2], false);
        assert_eq!(passthrough, vec![0, 1, 2]);
    }
}
