use image::{Rgb, RgbImage};
use log::{debug, trace, warn};

use crate::geometry::{ScreenTriangle, is_backfacing, ndc_to_screen, perspective_divide};
use crate::matrix::Matrix4x4;
use crate::mesh::{Polygon, Polyhedron, VertexNormals, calculate_smooth_normals};
use crate::point2d::{Point2D, blend2};
use crate::point3d::{Point3D, blend3, dot3, normalize};
use crate::screen::FrameBuffer;
use crate::shading::{
    GOURAUD_AMBIENT, Light, ShadingMode, TOON_AMBIENT, lambert, scale_color, toon_band,
};
use crate::texture::Texture;

pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Depth-buffered triangle rasterizer.
///
/// One frame is `clear()`, any number of draw calls, then a read of
/// `color_image()`. Visibility is resolved per pixel, so the order of draw
/// calls within a frame does not change the result.
#[derive(Debug, Clone)]
pub struct Rasterizer<'t> {
    frame: FrameBuffer,
    background: Rgb<u8>,
    texture: Option<&'t Texture>,
}

impl<'t> Rasterizer<'t> {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, DEFAULT_BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: Rgb<u8>) -> Self {
        debug!("creating {width}x{height} rasterizer");
        let mut rasterizer = Self {
            frame: FrameBuffer::new(width, height),
            background,
            texture: None,
        };
        rasterizer.clear();
        rasterizer
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    pub fn set_background(&mut self, background: Rgb<u8>) {
        self.background = background;
    }

    /// Background color everywhere, depth +inf everywhere.
    pub fn clear(&mut self) {
        self.frame.clear(self.background);
    }

    pub fn bind_texture(&mut self, texture: &'t Texture) {
        self.texture = Some(texture);
    }

    pub fn unbind_texture(&mut self) {
        self.texture = None;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn color_image(&self) -> RgbImage {
        self.frame.to_image()
    }

    pub fn depth_image(&self) -> RgbImage {
        self.frame.depth_visualization()
    }

    /// Solid-color triangle.
    pub fn rasterize_triangle(&mut self, points: [Point3D; 3], color: Rgb<u8>, mvp: &Matrix4x4, cull_backfaces: bool) {
        let clip = points.map(|p| mvp.transform(p));
        fill_triangle(&mut self.frame, clip, cull_backfaces, |_| color);
    }

    /// Triangle colored from the bound texture. Does nothing without one.
    pub fn rasterize_triangle_with_texture(
        &mut self,
        points: [Point3D; 3],
        uvs: [Point2D; 3],
        mvp: &Matrix4x4,
        cull_backfaces: bool,
    ) {
        let Some(texture) = self.texture else {
            trace!("textured draw without a bound texture");
            return;
        };
        let clip = points.map(|p| mvp.transform(p));
        let [t1, t2, t3] = uvs;
        fill_triangle(&mut self.frame, clip, cull_backfaces, |weights| {
            let uv = blend2(t1, t2, t3, weights);
            texture.sample(uv.x, uv.y)
        });
    }

    /// Lambert lighting evaluated once per vertex, intensity interpolated
    /// across the triangle. Back faces are always culled.
    pub fn rasterize_triangle_gouraud(
        &mut self,
        points: [Point3D; 3],
        normals: [Point3D; 3],
        color: Rgb<u8>,
        mvp: &Matrix4x4,
        model: &Matrix4x4,
        light: &Light,
    ) {
        let intensity = |p: Point3D, n: Point3D| {
            let world_pos = model.transform(p);
            let world_normal = normalize(model.transform(n.as_direction()));
            lambert(world_normal, world_pos, light)
        };
        let intensities = Point3D::direction(
            intensity(points[0], normals[0]),
            intensity(points[1], normals[1]),
            intensity(points[2], normals[2]),
        );

        let clip = points.map(|p| mvp.transform(p));
        fill_triangle(&mut self.frame, clip, true, |weights| {
            let pixel_intensity = dot3(intensities, weights);
            scale_color(color, pixel_intensity * light.intensity, GOURAUD_AMBIENT)
        });
    }

    /// World position and normal interpolated per pixel, Lambert term
    /// quantized into three bands. Back faces are always culled.
    pub fn rasterize_triangle_toon(
        &mut self,
        points: [Point3D; 3],
        normals: [Point3D; 3],
        color: Rgb<u8>,
        mvp: &Matrix4x4,
        model: &Matrix4x4,
        light: &Light,
    ) {
        let [wp1, wp2, wp3] = points.map(|p| model.transform(p));
        let [wn1, wn2, wn3] = normals.map(|n| normalize(model.transform(n.as_direction())));

        let clip = points.map(|p| mvp.transform(p));
        fill_triangle(&mut self.frame, clip, true, |weights| {
            let world_pos = blend3(wp1, wp2, wp3, weights);
            // interpolated unit vectors are shorter than unit length
            let normal = normalize(blend3(wn1, wn2, wn3, weights));
            let diff = TOON_AMBIENT + lambert(normal, world_pos, light);
            scale_color(color, toon_band(diff) * light.intensity, 0.0)
        });
    }

    /// Fan-triangulates a convex polygon and fills it with one color.
    pub fn rasterize_polygon(&mut self, polygon: &Polygon, color: Rgb<u8>, mvp: &Matrix4x4, cull_backfaces: bool) {
        let pts = &polygon.points;
        for [a, b, c] in polygon.fan() {
            self.rasterize_triangle([pts[a], pts[b], pts[c]], color, mvp, cull_backfaces);
        }
    }

    /// Fan-triangulates a convex polygon and textures it with its UVs.
    /// Polygons without one UV per vertex are skipped.
    pub fn rasterize_polygon_with_texture(&mut self, polygon: &Polygon, mvp: &Matrix4x4, cull_backfaces: bool) {
        let Some(uvs) = polygon.uvs() else {
            if polygon.tex_coords.is_some() {
                warn!(
                    "polygon has {} texture coordinates for {} vertices, skipping",
                    polygon.tex_coords.as_ref().map_or(0, Vec::len),
                    polygon.points.len()
                );
            }
            return;
        };
        let pts = &polygon.points;
        for [a, b, c] in polygon.fan() {
            self.rasterize_triangle_with_texture([pts[a], pts[b], pts[c]], [uvs[a], uvs[b], uvs[c]], mvp, cull_backfaces);
        }
    }

    /// Draws every polygon of `mesh` with one shading policy. Smooth normals
    /// are computed once here when the policy is lit.
    pub fn draw_polyhedron(
        &mut self,
        mesh: &Polyhedron,
        mode: &ShadingMode,
        mvp: &Matrix4x4,
        model: &Matrix4x4,
        light: &Light,
    ) {
        trace!("drawing {} polygons ({})", mesh.polygons.len(), mode.name());
        let normals = if mode.needs_normals() {
            calculate_smooth_normals(mesh)
        } else {
            VertexNormals::default()
        };

        for polygon in &mesh.polygons {
            match *mode {
                ShadingMode::Flat { color, cull_backfaces } => {
                    self.rasterize_polygon(polygon, color, mvp, cull_backfaces)
                }
                ShadingMode::Textured { cull_backfaces } => {
                    self.rasterize_polygon_with_texture(polygon, mvp, cull_backfaces)
                }
                ShadingMode::Gouraud { color } => {
                    for (points, vertex_normals) in lit_triangles(polygon, &normals) {
                        self.rasterize_triangle_gouraud(points, vertex_normals, color, mvp, model, light);
                    }
                }
                ShadingMode::Toon { color } => {
                    for (points, vertex_normals) in lit_triangles(polygon, &normals) {
                        self.rasterize_triangle_toon(points, vertex_normals, color, mvp, model, light);
                    }
                }
            }
        }
    }
}

/// Fan triangles of `polygon` paired with the smoothed normal of each vertex.
fn lit_triangles<'a>(
    polygon: &'a Polygon,
    normals: &'a VertexNormals,
) -> impl Iterator<Item = ([Point3D; 3], [Point3D; 3])> + 'a {
    polygon.fan().map(move |idx| {
        let points = idx.map(|i| polygon.points[i]);
        (points, points.map(|p| normals.get(p)))
    })
}

/// Shared scan loop of every draw call. `clip` holds the three vertices after
/// the MVP transform; `shade` receives the barycentric weights of each pixel
/// that passes the depth test.
fn fill_triangle<F>(frame: &mut FrameBuffer, clip: [Point3D; 3], cull_backfaces: bool, mut shade: F)
where
    F: FnMut(Point3D) -> Rgb<u8>,
{
    let [v1, v2, v3] = clip.map(perspective_divide);

    if cull_backfaces && is_backfacing(v1, v2, v3) {
        return;
    }

    let (width, height) = (frame.width, frame.height);
    let Some(tri) = ScreenTriangle::new(
        ndc_to_screen(v1, width, height),
        ndc_to_screen(v2, width, height),
        ndc_to_screen(v3, width, height),
    ) else {
        return;
    };
    let Some(rect) = tri.bounds(width, height) else {
        return;
    };

    for y in rect.min_y..=rect.max_y {
        for x in rect.min_x..=rect.max_x {
            let Some(weights) = tri.weights(x as i32, y as i32) else {
                continue;
            };
            let z = tri.depth(weights);
            frame.test_and_set(x, y, z, || shade(weights));
        }
    }
}
