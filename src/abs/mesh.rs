//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing vertex data on the
//! GPU side. Vertices should implement the [`Vertex`] trait. The viewer's
//! model is a triangle soup uploaded once, so meshes are non-indexed and
//! static; [`Mesh::draw_range`] draws a contiguous run of vertices, which is
//! how per-submesh material colors are applied from a single buffer.

use std::sync::Arc;

use glow::HasContext;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl Mesh {
    /// Creates a new mesh from the given vertex data.
    pub fn new<V: Vertex>(gl: &Arc<glow::Context>, vertices: &[V]) -> Self {
        unsafe {
            let vao = gl.create_vertex_array().unwrap();
            let vbo = gl.create_buffer().unwrap();

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    vertices.len() * std::mem::size_of::<V>(),
                ),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
            }
        }
    }

    /// Draws `count` vertices starting at `first` as triangles.
    pub fn draw_range(&self, first: usize, count: usize) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_arrays(glow::TRIANGLES, first as i32, count as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
