//! WebGL2 presenter for the Limitless canvas.
//!
//! Three small programs: additive points for the particle cloud, additive
//! line segments for the comet trails, and a full-screen quad that overlays
//! translucent black so the preserved drawing buffer fades instead of
//! clearing.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{EulerRot, Mat4, Vec3};
use js_sys::{Float32Array, Object, Reflect};
use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::render;
use crate::config::LimitlessConfig;
use crate::error::{Result, VizError};
use crate::limitless::{ClearPolicy, FrameOutput, LimitlessField};

const POINTS_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;
layout(location = 2) in float a_size;
uniform mat4 u_projection;
uniform mat4 u_model_view;
uniform float u_point_size;
uniform float u_scale;
out vec3 v_color;
void main() {
    vec4 eye = u_model_view * vec4(a_position, 1.0);
    gl_Position = u_projection * eye;
    gl_PointSize = u_point_size * a_size * u_scale / max(-eye.z, 0.001);
    v_color = a_color;
}
"#;

const POINTS_FS: &str = r#"#version 300 es
precision mediump float;
in vec3 v_color;
out vec4 out_color;
void main() {
    vec2 c = gl_PointCoord - 0.5;
    if (dot(c, c) > 0.25) discard;
    out_color = vec4(v_color, 1.0);
}
"#;

const LINES_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;
uniform mat4 u_projection;
uniform mat4 u_model_view;
out vec3 v_color;
void main() {
    gl_Position = u_projection * u_model_view * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINES_FS: &str = r#"#version 300 es
precision mediump float;
in vec3 v_color;
uniform float u_opacity;
out vec4 out_color;
void main() {
    out_color = vec4(v_color, u_opacity);
}
"#;

const FADE_VS: &str = r#"#version 300 es
layout(location = 0) in vec2 a_corner;
void main() {
    gl_Position = vec4(a_corner, 0.0, 1.0);
}
"#;

const FADE_FS: &str = r#"#version 300 es
precision mediump float;
uniform float u_alpha;
out vec4 out_color;
void main() {
    out_color = vec4(0.0, 0.0, 0.0, u_alpha);
}
"#;

const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| VizError::Shader("unable to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(VizError::Shader(log))
    }
}

fn link(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram> {
    let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| VizError::Shader("unable to create program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(VizError::Shader(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn create_buffer(gl: &GL) -> Result<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| VizError::Shader("unable to create buffer".into()))
}

fn create_vao(gl: &GL) -> Result<WebGlVertexArrayObject> {
    gl.create_vertex_array()
        .ok_or_else(|| VizError::Shader("unable to create vertex array".into()))
}

/// Binds `buffer` to attribute `location` of the current vertex array.
fn attribute(gl: &GL, buffer: &WebGlBuffer, location: u32, components: i32) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
}

fn upload(gl: &GL, buffer: &WebGlBuffer, data: &[f32]) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    let view = Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::DYNAMIC_DRAW);
}

struct Uniforms {
    projection: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
    extra: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn lookup(gl: &GL, program: &WebGlProgram, extra: &str) -> Self {
        Self {
            projection: gl.get_uniform_location(program, "u_projection"),
            model_view: gl.get_uniform_location(program, "u_model_view"),
            extra: gl.get_uniform_location(program, extra),
            scale: gl.get_uniform_location(program, "u_scale"),
        }
    }
}

struct Pass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    uniforms: Uniforms,
}

impl Pass {
    fn new(gl: &GL, vertex: &str, fragment: &str, layout: &[i32], extra: &str) -> Result<Self> {
        let program = link(gl, vertex, fragment)?;
        let vao = create_vao(gl)?;
        gl.bind_vertex_array(Some(&vao));
        let buffers = layout
            .iter()
            .enumerate()
            .map(|(location, &components)| {
                let buffer = create_buffer(gl)?;
                attribute(gl, &buffer, location as u32, components);
                Ok(buffer)
            })
            .collect::<Result<Vec<_>>>()?;
        gl.bind_vertex_array(None);
        let uniforms = Uniforms::lookup(gl, &program, extra);
        Ok(Self {
            program,
            vao,
            buffers,
            uniforms,
        })
    }
}

pub struct LimitlessView {
    field: LimitlessField,
    canvas: HtmlCanvasElement,
    gl: GL,
    points: Pass,
    trails: Pass,
    fade: Pass,
    aspect: f32,
    label: Option<Element>,
    context_lost: bool,
}

impl LimitlessView {
    pub fn new(canvas: HtmlCanvasElement, config: LimitlessConfig, seed: u64) -> Result<Self> {
        let options = Object::new();
        Reflect::set(&options, &"preserveDrawingBuffer".into(), &JsValue::TRUE)?;
        Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)?;
        Reflect::set(&options, &"alpha".into(), &JsValue::TRUE)?;
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or(VizError::ContextUnavailable("WebGL2"))?
            .dyn_into()
            .map_err(|_| VizError::ContextUnavailable("WebGL2"))?;

        let points = Pass::new(&gl, POINTS_VS, POINTS_FS, &[3, 3, 1], "u_point_size")?;
        let trails = Pass::new(&gl, LINES_VS, LINES_FS, &[3, 3], "u_opacity")?;
        let fade = Pass::new(&gl, FADE_VS, FADE_FS, &[2], "u_alpha")?;
        upload(&gl, &fade.buffers[0], &QUAD);

        let label = canvas
            .owner_document()
            .and_then(|doc| doc.get_element_by_id("gojoTechniqueName"));

        let mut view = Self {
            field: LimitlessField::new(config, seed),
            canvas,
            gl,
            points,
            trails,
            fade,
            aspect: 1.0,
            label,
            context_lost: false,
        };
        view.resize();
        view.show_label();
        Ok(view)
    }

    /// Showing the panel wipes the preserved drawing buffer so the previous
    /// visit's last frame does not fade in under the new one.
    pub fn set_active(&mut self, active: bool) {
        let showing = active && !self.field.is_active();
        self.field.set_active(active);
        if showing {
            self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
            self.gl.clear(GL::COLOR_BUFFER_BIT);
        }
    }

    pub fn step_technique(&mut self, direction: i32) {
        self.field.step(direction);
        self.show_label();
    }

    fn show_label(&self) {
        if let Some(label) = &self.label {
            label.set_text_content(Some(self.field.display_name()));
        }
    }

    pub fn resize(&mut self) {
        let (width, height) = render::fit_canvas(&self.canvas, render::pixel_ratio());
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Starts the resize listener and the animation loop.
    pub fn start(view: Rc<RefCell<Self>>) -> Result<()> {
        let resized = view.clone();
        render::on_resize(move || resized.borrow_mut().resize())?;
        render::animate(move |now| {
            let mut view = view.borrow_mut();
            if view.gl.is_context_lost() {
                if !view.context_lost {
                    error!("limitless: WebGL context lost, skipping frames");
                    view.context_lost = true;
                }
                return;
            }
            view.frame(now);
        })?;
        info!("limitless presenter started");
        Ok(())
    }

    fn frame(&mut self, now: f64) {
        let Some(output) = self.field.tick(now, self.aspect) else {
            return;
        };
        self.clear(&output);

        let camera = &self.field.config().camera;
        let projection = Mat4::perspective_rh_gl(
            camera.fov_degrees.to_radians(),
            self.aspect,
            camera.near,
            camera.far,
        );
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -camera.distance));
        let r = self.field.rotation();
        let model_view = view * Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z);

        let gl = &self.gl;
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.disable(GL::DEPTH_TEST);

        let buffer = self.field.buffer();
        gl.use_program(Some(&self.points.program));
        gl.bind_vertex_array(Some(&self.points.vao));
        upload(gl, &self.points.buffers[0], buffer.positions());
        upload(gl, &self.points.buffers[1], buffer.colors());
        upload(gl, &self.points.buffers[2], buffer.sizes());
        let u = &self.points.uniforms;
        gl.uniform_matrix4fv_with_f32_array(u.projection.as_ref(), false, &projection.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(u.model_view.as_ref(), false, &model_view.to_cols_array());
        gl.uniform1f(u.extra.as_ref(), output.point_size);
        gl.uniform1f(u.scale.as_ref(), self.canvas.height() as f32 / 2.0);
        gl.draw_arrays(GL::POINTS, 0, buffer.len() as i32);

        if output.trail_segments > 0 {
            let trails = self.field.trails();
            let vertices = output.trail_segments * 2;
            gl.use_program(Some(&self.trails.program));
            gl.bind_vertex_array(Some(&self.trails.vao));
            upload(gl, &self.trails.buffers[0], &trails.positions()[..vertices * 3]);
            upload(gl, &self.trails.buffers[1], &trails.colors()[..vertices * 3]);
            let u = &self.trails.uniforms;
            gl.uniform_matrix4fv_with_f32_array(u.projection.as_ref(), false, &projection.to_cols_array());
            gl.uniform_matrix4fv_with_f32_array(u.model_view.as_ref(), false, &model_view.to_cols_array());
            gl.uniform1f(u.extra.as_ref(), self.field.config().trails.comet_opacity);
            gl.draw_arrays(GL::LINES, 0, vertices as i32);
        }

        gl.bind_vertex_array(None);
    }

    fn clear(&self, output: &FrameOutput) {
        let gl = &self.gl;
        match output.clear {
            ClearPolicy::Fade => {
                gl.enable(GL::BLEND);
                gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
                gl.use_program(Some(&self.fade.program));
                gl.bind_vertex_array(Some(&self.fade.vao));
                gl.uniform1f(self.fade.uniforms.extra.as_ref(), self.field.config().trails.fade_alpha);
                gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
            }
            ClearPolicy::Clear => {
                let alpha = if output.opaque_background { 1.0 } else { 0.0 };
                gl.clear_color(0.0, 0.0, 0.0, alpha);
                gl.clear(GL::COLOR_BUFFER_BIT);
            }
        }
    }
}
