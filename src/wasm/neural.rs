use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use crate::config::NeuralConfig;
use crate::error::Result;
use crate::neural::{NeuralFrame, NeuralScene};

pub struct NeuralView {
    scene: NeuralScene,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    perspective: f32,
}

impl NeuralView {
    pub fn new(canvas: HtmlCanvasElement, config: NeuralConfig, seed: u64) -> Result<Self> {
        let ctx = render::context_2d(&canvas)?;
        let perspective = config.perspective;
        let mut view = Self {
            scene: NeuralScene::new(config, seed),
            canvas,
            ctx,
            perspective,
        };
        view.resize();
        Ok(view)
    }

    fn resize(&mut self) {
        let (w, h) = render::fit_canvas(&self.canvas, 1.0);
        self.scene.resize(w as f32, h as f32);
    }

    pub fn start(view: Rc<RefCell<Self>>) -> Result<()> {
        let canvas = view.borrow().canvas.clone();

        let v = view.clone();
        render::on_resize(move || v.borrow_mut().resize())?;

        let (v, c) = (view.clone(), canvas.clone());
        render::listen(&canvas, "mousemove", move |e: MouseEvent| {
            v.borrow_mut().scene.pointer_moved(render::pointer(&c, &e));
        })?;
        let v = view.clone();
        render::listen(&canvas, "mousedown", move |_: MouseEvent| {
            v.borrow_mut().scene.pointer_down();
        })?;
        for event in ["mouseup", "mouseleave"] {
            let v = view.clone();
            render::listen(&canvas, event, move |_: MouseEvent| {
                v.borrow_mut().scene.pointer_up();
            })?;
        }
        let (v, c) = (view.clone(), canvas.clone());
        render::listen(&canvas, "click", move |e: MouseEvent| {
            v.borrow_mut().scene.click(render::pointer(&c, &e));
        })?;

        render::animate(move |_| {
            let mut view = view.borrow_mut();
            view.scene.tick();
            if let Err(err) = view.draw() {
                error!("neural frame failed: {err:?}");
            }
        })?;
        info!("neural presenter started");
        Ok(())
    }

    fn draw(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        ctx.set_fill_style_str("rgba(46, 52, 64, 0.2)");
        ctx.fill_rect(0.0, 0.0, w, h);

        let frame = self.scene.frame();
        self.draw_connections(&frame)?;
        self.draw_neurons(&frame)?;
        self.draw_data(&frame)?;

        ctx.set_line_width(2.0);
        for ring in &frame.pulses {
            ctx.set_stroke_style_str(&format!("hsla(200, 100%, 70%, {})", ring.alpha));
            ctx.begin_path();
            ctx.arc(
                f64::from(ring.center.x),
                f64::from(ring.center.y),
                f64::from(ring.radius),
                0.0,
                TAU,
            )?;
            ctx.stroke();
        }
        Ok(())
    }

    fn draw_connections(&self, frame: &NeuralFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_line_cap("round");
        for link in &frame.connections {
            let (a, b) = (link.from, link.to);
            let gradient = ctx.create_linear_gradient(
                f64::from(a.x),
                f64::from(a.y),
                f64::from(b.x),
                f64::from(b.y),
            );
            let hue = link.hue;
            let mid = link.strength * 0.4 * a.scale;
            gradient.add_color_stop(0.0, &format!("hsla({hue}, 100%, 50%, 0)"))?;
            gradient.add_color_stop(0.5, &format!("hsla({hue}, 100%, 50%, {mid})"))?;
            gradient.add_color_stop(1.0, &format!("hsla({hue}, 100%, 50%, 0)"))?;
            ctx.set_stroke_style_canvas_gradient(&gradient);
            ctx.set_line_width(f64::from((1.0 + link.strength * 2.0) * a.scale));
            ctx.begin_path();
            ctx.move_to(f64::from(a.x), f64::from(a.y));
            ctx.line_to(f64::from(b.x), f64::from(b.y));
            ctx.stroke();
        }
        Ok(())
    }

    fn draw_neurons(&self, frame: &NeuralFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for sprite in &frame.neurons {
            let at = sprite.at;
            let (x, y) = (f64::from(at.x), f64::from(at.y));
            let size = (3.0 + sprite.glow * 8.0) * at.scale;
            let hue = sprite.hue;

            for i in (1..=3).rev() {
                let i = i as f32;
                let glow_size = size * (i + 2.0) * (1.0 + sprite.pulse * 0.3);
                let alpha = sprite.glow * 0.3 / i * (1.0 + sprite.pulse * 0.5) * at.scale;
                let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, f64::from(glow_size))?;
                gradient.add_color_stop(0.0, &format!("hsla({hue}, 100%, 60%, {alpha})"))?;
                gradient.add_color_stop(
                    0.5,
                    &format!("hsla({}, 100%, 70%, {})", hue + 20.0, alpha * 0.5),
                )?;
                gradient.add_color_stop(1.0, &format!("hsla({hue}, 100%, 60%, 0)"))?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(x, y, f64::from(glow_size), 0.0, TAU)?;
                ctx.fill();
            }

            let shade = (1.0 + at.z / self.perspective).max(0.3);
            let offset = f64::from(size * 0.3);
            let core =
                ctx.create_radial_gradient(x - offset, y - offset, 0.0, x, y, f64::from(size))?;
            core.add_color_stop(0.0, &format!("hsl({}, 100%, {}%)", hue + 40.0, 75.0 * shade))?;
            core.add_color_stop(0.7, &format!("hsl({hue}, 100%, {}%)", 55.0 * shade))?;
            core.add_color_stop(1.0, &format!("hsl({}, 80%, {}%)", hue - 20.0, 45.0 * shade))?;
            ctx.set_fill_style_canvas_gradient(&core);
            ctx.begin_path();
            ctx.arc(x, y, f64::from(size), 0.0, TAU)?;
            ctx.fill();

            if sprite.glow > 0.3 {
                let alpha = sprite.glow * 0.6 * at.scale;
                ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
                ctx.begin_path();
                ctx.arc(x - offset, y - offset, offset, 0.0, TAU)?;
                ctx.fill();
            }
        }
        Ok(())
    }

    fn draw_data(&self, frame: &NeuralFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for sprite in &frame.data {
            let (x, y, scale) = (f64::from(sprite.at.x), f64::from(sprite.at.y), f64::from(sprite.at.scale));
            let hue = sprite.hue;
            let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, 6.0 * scale)?;
            glow.add_color_stop(0.0, &format!("hsla({hue}, 100%, 70%, 0.8)"))?;
            glow.add_color_stop(1.0, &format!("hsla({hue}, 100%, 70%, 0)"))?;
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.begin_path();
            ctx.arc(x, y, 6.0 * scale, 0.0, TAU)?;
            ctx.fill();

            ctx.set_fill_style_str(&format!("hsl({hue}, 100%, 60%)"));
            ctx.begin_path();
            ctx.arc(x, y, 3.0 * scale, 0.0, TAU)?;
            ctx.fill();
        }
        Ok(())
    }
}
