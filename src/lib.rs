//! Software z-buffer rasterizer: vector and matrix primitives, polygon meshes
//! with smooth normals, an orbit camera and a depth-buffered triangle filler
//! with flat, textured, Gouraud and toon shading.

pub mod camera;
pub mod geometry;
pub mod matrix;
pub mod mesh;
pub mod obj;
pub mod point2d;
pub mod point3d;
pub mod rasterizer;
pub mod rectangle;
pub mod screen;
pub mod shading;
pub mod shapes;
pub mod texture;
pub mod transform;

pub use camera::OrbitCamera;
pub use matrix::Matrix4x4;
pub use mesh::{Polygon, Polyhedron, VertexNormals, calculate_smooth_normals};
pub use point2d::Point2D;
pub use point3d::Point3D;
pub use rasterizer::Rasterizer;
pub use shading::{Light, ShadingMode};
pub use texture::Texture;
