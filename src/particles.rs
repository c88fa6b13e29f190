//! Hero dust field: a few faint particles drifting and pulsing on a canvas.

#[cfg(test)]
#[path = "particles_test.rs"]
mod particles_test;

use std::f64::consts::TAU;

use rand::Rng;

pub const PARTICLE_COUNT: usize = 25;

/// Distance past an edge before a particle wraps to the opposite side.
pub const WRAP_MARGIN: f64 = 10.0;

/// Glow radius as a multiple of particle size.
pub const GLOW_SCALE: f64 = 4.0;

/// Accent color components.
pub const ACCENT: (u8, u8, u8) = (0, 255, 65);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Core radius in pixels, 1 to 3.
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    /// Peak opacity, 0.05 to 0.25.
    pub opacity: f64,
    /// Radians per frame.
    pub pulse_speed: f64,
    pub pulse_phase: f64,
}

impl Particle {
    /// A particle at a random position inside `width × height`.
    pub fn spawn<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            size: rng.random::<f64>() * 2.0 + 1.0,
            speed_x: (rng.random::<f64>() - 0.5) * 0.3,
            speed_y: (rng.random::<f64>() - 0.5) * 0.2,
            opacity: rng.random::<f64>() * 0.2 + 0.05,
            pulse_speed: rng.random::<f64>() * 0.01 + 0.005,
            pulse_phase: rng.random::<f64>() * TAU,
        }
    }

    /// Opacity after pulsing: between half and all of the peak.
    pub fn drawn_opacity(&self) -> f64 {
        let pulse = self.pulse_phase.sin() * 0.5 + 0.5;
        self.opacity * (0.5 + pulse * 0.5)
    }

    pub fn glow_radius(&self) -> f64 {
        self.size * GLOW_SCALE
    }

    /// Advance one frame inside a `width × height` field.
    pub fn advance(&mut self, width: f64, height: f64) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        self.pulse_phase += self.pulse_speed;

        if self.x < -WRAP_MARGIN {
            self.x = width + WRAP_MARGIN;
        }
        if self.x > width + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }
        if self.y < -WRAP_MARGIN {
            self.y = height + WRAP_MARGIN;
        }
        if self.y > height + WRAP_MARGIN {
            self.y = -WRAP_MARGIN;
        }
    }
}

/// `rgba(...)` in the accent color.
pub fn accent_rgba(alpha: f64) -> String {
    let (r, g, b) = ACCENT;
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// All particles plus the field they wrap within.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let particles = (0..PARTICLE_COUNT).map(|_| Particle::spawn(rng, width, height)).collect();
        Self { width, height, particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Change the field bounds. Particles keep their positions and wrap
    /// into the new bounds as they drift.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.advance(self.width, self.height);
        }
    }
}

#[cfg(feature = "csr")]
pub use browser::{attach, draw};

#[cfg(feature = "csr")]
mod browser {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tilt::host::MotionGate;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

    use super::{ParticleField, accent_rgba};
    use crate::settings::DocumentMotionGate;
    use crate::util::frame_loop;

    /// Draw every particle as a radial glow plus a solid core.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails.
    pub fn draw(ctx: &CanvasRenderingContext2d, field: &ParticleField) -> Result<(), JsValue> {
        let (width, height) = field.size();
        ctx.clear_rect(0.0, 0.0, width, height);
        for p in field.particles() {
            let alpha = p.drawn_opacity();
            let glow = p.glow_radius();

            ctx.save();
            let gradient = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, glow)?;
            gradient.add_color_stop(0.0, &accent_rgba(alpha * 0.5))?;
            gradient.add_color_stop(1.0, &accent_rgba(0.0))?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.begin_path();
            ctx.arc(p.x, p.y, glow, 0.0, TAU)?;
            ctx.fill();

            ctx.set_fill_style_str(&accent_rgba(alpha));
            ctx.begin_path();
            ctx.arc(p.x, p.y, p.size, 0.0, TAU)?;
            ctx.fill();
            ctx.restore();
        }
        Ok(())
    }

    fn parent_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        canvas
            .parent_element()
            .and_then(|parent| parent.dyn_ref::<HtmlElement>().map(|el| (el.offset_width(), el.offset_height())))
            .map_or((0, 0), |(w, h)| (w.max(0).unsigned_abs(), h.max(0).unsigned_abs()))
    }

    fn fit_to_parent(canvas: &HtmlCanvasElement, field: &mut ParticleField) {
        let (width, height) = parent_size(canvas);
        canvas.set_width(width);
        canvas.set_height(height);
        field.resize(f64::from(width), f64::from(height));
    }

    /// Start the particle loop on `canvas`, sized to its parent.
    pub fn attach(canvas: HtmlCanvasElement) {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => return,
            },
            Ok(None) => return,
            Err(err) => {
                log::warn!("particles: no 2d context: {err:?}");
                return;
            }
        };

        let mut rng = SmallRng::seed_from_u64(js_sys::Date::now().to_bits());
        let (width, height) = parent_size(&canvas);
        let field = Rc::new(RefCell::new(ParticleField::new(&mut rng, f64::from(width), f64::from(height))));
        canvas.set_width(width);
        canvas.set_height(height);

        if let Some(window) = web_sys::window() {
            let canvas_for_resize = canvas.clone();
            let field_for_resize = Rc::clone(&field);
            let on_resize = Closure::wrap(Box::new(move || {
                if let Ok(mut field) = field_for_resize.try_borrow_mut() {
                    fit_to_parent(&canvas_for_resize, &mut field);
                }
            }) as Box<dyn FnMut()>);
            match window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()) {
                // Lives as long as the page.
                Ok(()) => on_resize.forget(),
                Err(err) => log::warn!("particles: failed to listen for resize: {err:?}"),
            }
        }

        frame_loop::run(move |_ts| {
            let Ok(mut field) = field.try_borrow_mut() else {
                return true;
            };
            if DocumentMotionGate.motion_reduced() {
                let (width, height) = field.size();
                ctx.clear_rect(0.0, 0.0, width, height);
                return true;
            }
            field.step();
            if let Err(err) = draw(&ctx, &field) {
                log::warn!("particles: draw failed: {err:?}");
            }
            true
        });
        log::debug!("particles: started");
    }
}
