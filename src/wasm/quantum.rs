use std::cell::RefCell;
use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use glam::Vec2;
use log::{error, info};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

use super::render;
use crate::config::QuantumConfig;
use crate::error::Result;
use crate::quantum::{BlochFrame, BlochScene, Qubit, Tint};

fn dot(ctx: &CanvasRenderingContext2d, at: Vec2, radius: f32) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(f64::from(at.x), f64::from(at.y), f64::from(radius.max(0.0)), 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn polyline(ctx: &CanvasRenderingContext2d, points: &[Vec2]) {
    let mut points = points.iter();
    let Some(first) = points.next() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(f64::from(first.x), f64::from(first.y));
    for p in points {
        ctx.line_to(f64::from(p.x), f64::from(p.y));
    }
    ctx.stroke();
}

/// Radial glow fading from `alpha` at the centre to transparent.
fn glow(
    ctx: &CanvasRenderingContext2d,
    at: Vec2,
    radius: f32,
    tint: Tint,
    alpha: f32,
) -> Result<(), JsValue> {
    let (x, y) = (f64::from(at.x), f64::from(at.y));
    let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, f64::from(radius.max(0.0)))?;
    gradient.add_color_stop(0.0, &tint.css(alpha))?;
    gradient.add_color_stop(1.0, &tint.css(0.0))?;
    ctx.set_fill_style_canvas_gradient(&gradient);
    dot(ctx, at, radius)
}

pub struct QuantumView {
    scene: BlochScene,
    qubit: Qubit,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    label: Option<Element>,
}

impl QuantumView {
    pub fn new(canvas: HtmlCanvasElement, config: QuantumConfig, seed: u64) -> Result<Self> {
        let ctx = render::context_2d(&canvas)?;
        let label = canvas
            .owner_document()
            .and_then(|doc| doc.get_element_by_id("quantumInfo"));
        let mut view = Self {
            scene: BlochScene::new(config, seed),
            qubit: Qubit::ZERO,
            canvas,
            ctx,
            label,
        };
        view.resize();
        view.show_label();
        Ok(view)
    }

    fn resize(&mut self) {
        let (w, h) = render::fit_canvas(&self.canvas, 1.0);
        self.scene.resize(w as f32, h as f32);
    }

    /// Applies a gate (or reset) to the displayed qubit.
    pub fn apply(&mut self, gate: impl FnOnce(&mut Qubit)) {
        gate(&mut self.qubit);
        self.show_label();
    }

    fn show_label(&self) {
        if let Some(label) = &self.label {
            label.set_text_content(Some(&self.qubit.label()));
        }
    }

    pub fn start(view: Rc<RefCell<Self>>) -> Result<()> {
        let canvas = view.borrow().canvas.clone();

        let v = view.clone();
        render::on_resize(move || v.borrow_mut().resize())?;

        let (v, c) = (view.clone(), canvas.clone());
        render::listen(&canvas, "mousemove", move |e: MouseEvent| {
            v.borrow_mut().scene.orbit_mut().pointer_moved(render::pointer(&c, &e));
        })?;
        let v = view.clone();
        render::listen(&canvas, "mousedown", move |_: MouseEvent| {
            v.borrow_mut().scene.orbit_mut().begin_drag();
        })?;
        for event in ["mouseup", "mouseleave"] {
            let v = view.clone();
            render::listen(&canvas, event, move |_: MouseEvent| {
                v.borrow_mut().scene.orbit_mut().end_drag();
            })?;
        }

        render::animate(move |_| {
            let mut view = view.borrow_mut();
            view.scene.tick();
            if let Err(err) = view.draw() {
                error!("quantum frame failed: {err:?}");
            }
        })?;
        info!("quantum presenter started");
        Ok(())
    }

    fn draw(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        ctx.set_fill_style_str("rgba(20, 25, 35, 0.3)");
        ctx.fill_rect(0.0, 0.0, w, h);

        let frame = self.scene.frame(&self.qubit);
        for d in &frame.surface {
            ctx.set_fill_style_str(&d.tint.css(d.alpha));
            dot(ctx, d.at, d.radius)?;
        }
        ctx.set_stroke_style_str("rgba(136, 192, 208, 0.15)");
        ctx.set_line_width(0.5);
        for line in &frame.wireframe {
            polyline(ctx, line);
        }

        self.draw_particles(&frame)?;
        self.draw_states(&frame)?;

        for d in &frame.interference {
            ctx.set_fill_style_str(&d.tint.css(d.alpha));
            dot(ctx, d.at, d.radius)?;
        }

        ctx.set_stroke_style_str(&Tint::Mauve.css(0.6));
        ctx.set_line_width(3.0);
        polyline(ctx, &frame.wave);
        Ok(())
    }

    fn draw_particles(&self, frame: &BlochFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for d in &frame.trails {
            ctx.set_fill_style_str(&d.tint.css(d.alpha));
            dot(ctx, d.at, d.radius)?;
        }
        for &(at, life, tint) in &frame.particles {
            glow(ctx, at.xy(), 8.0 * at.scale, tint, life * 0.8)?;
            ctx.set_fill_style_str(&tint.css(life));
            dot(ctx, at.xy(), 3.0 * at.scale)?;
        }
        Ok(())
    }

    fn draw_states(&self, frame: &BlochFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for d in &frame.fields {
            ctx.set_fill_style_str(&d.tint.css(d.alpha));
            dot(ctx, d.at, d.radius)?;
        }

        ctx.set_line_cap("round");
        for arrow in &frame.arrows {
            let (start, end) = (arrow.start, arrow.end.xy());
            let gradient = ctx.create_linear_gradient(
                f64::from(start.x),
                f64::from(start.y),
                f64::from(end.x),
                f64::from(end.y),
            );
            gradient.add_color_stop(0.0, &arrow.tint.css(1.0))?;
            gradient.add_color_stop(1.0, &arrow.tint.css(0.0))?;
            ctx.set_stroke_style_canvas_gradient(&gradient);
            ctx.set_line_width(f64::from(3.0 * arrow.end.scale));
            polyline(ctx, &[start, end]);

            let heading = f64::from((end.y - start.y).atan2(end.x - start.x));
            let head = f64::from(15.0 * arrow.end.scale);
            let (ex, ey) = (f64::from(end.x), f64::from(end.y));
            ctx.set_fill_style_str(&arrow.tint.css(1.0));
            ctx.begin_path();
            ctx.move_to(ex, ey);
            ctx.line_to(ex - head * (heading - PI / 6.0).cos(), ey - head * (heading - PI / 6.0).sin());
            ctx.line_to(ex - head * (heading + PI / 6.0).cos(), ey - head * (heading + PI / 6.0).sin());
            ctx.close_path();
            ctx.fill();
        }

        for cloud in &frame.clouds {
            let radius = frame.radius * 0.4 * cloud.pulse;
            for layer in (1..=5).rev() {
                let layer = layer as f32;
                let layer_radius = radius * (layer / 5.0) * cloud.at.scale;
                let alpha = cloud.prob * 0.15 / layer;
                let (x, y) = (f64::from(cloud.at.x), f64::from(cloud.at.y));
                let gradient =
                    ctx.create_radial_gradient(x, y, 0.0, x, y, f64::from(layer_radius.max(0.0)))?;
                gradient.add_color_stop(0.0, &cloud.tint.css(alpha))?;
                gradient.add_color_stop(0.6, &cloud.tint.css(alpha * 0.6))?;
                gradient.add_color_stop(1.0, &cloud.tint.css(0.0))?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                dot(ctx, cloud.at.xy(), layer_radius)?;
            }
            for p in &cloud.orbiters {
                let size = 2.0 * p.scale;
                glow(ctx, p.xy(), size * 3.0, cloud.tint, cloud.prob * 0.9)?;
                ctx.set_fill_style_str(&cloud.tint.css(cloud.prob * 0.8));
                dot(ctx, p.xy(), size)?;
            }
        }
        Ok(())
    }
}
