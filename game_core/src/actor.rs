use crate::{
    input::{InputEvent, Key},
    render::Rgba,
};

/// Tunables for the single player-controlled actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorParams {
    pub start: (f64, f64),
    pub color: Rgba,
    pub size: (u32, u32),
    /// Symmetric bound on each velocity component, units per tick.
    pub velocity_clamp: f64,
    /// Spring constant for pointer seeking: `dv = (target - pos) / divisor`.
    pub seek_divisor: f64,
    /// Velocity added per movement key press.
    pub impulse: f64,
}

impl Default for ActorParams {
    fn default() -> Self {
        Self {
            start: (0.0, 0.0),
            color: Rgba::opaque(0, 200, 60),
            size: (50, 50),
            velocity_clamp: 25.0,
            seek_divisor: 100.0,
            impulse: 1.0,
        }
    }
}

/// Kinematic state of the moving rectangle.
///
/// Velocity is the only accumulator: key impulses and the pointer spring both
/// add to it, and nothing but the clamp ever takes it away.
#[derive(Debug, Clone)]
pub struct Actor {
    params: ActorParams,

    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    tx: f64,
    ty: f64,

    prev_x: f64,
    prev_y: f64,
}

impl Actor {
    pub fn new(params: ActorParams) -> Self {
        let (x, y) = params.start;
        Self {
            params,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            tx: 0.0,
            ty: 0.0,
            prev_x: x,
            prev_y: y,
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        let impulse = self.params.impulse;
        match *event {
            InputEvent::KeyPress(key) => match key {
                Key::W => self.vy -= impulse,
                Key::S => self.vy += impulse,
                Key::A => self.vx -= impulse,
                Key::D => self.vx += impulse,
                Key::Escape | Key::Other(_) => {}
            },
            InputEvent::PointerMove { x, y } => {
                self.tx = x;
                self.ty = y;
            }
            InputEvent::KeyRelease(_) | InputEvent::Quit => {}
        }
    }

    /// Advances exactly one fixed step.
    pub fn update(&mut self) {
        let p = &self.params;

        self.vx += (self.tx - self.x) / p.seek_divisor;
        self.vy += (self.ty - self.y) / p.seek_divisor;

        self.vx = self.vx.clamp(-p.velocity_clamp, p.velocity_clamp);
        self.vy = self.vy.clamp(-p.velocity_clamp, p.velocity_clamp);

        self.prev_x = self.x;
        self.prev_y = self.y;

        self.x += self.vx;
        self.y += self.vy;
    }

    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Position before the most recent [`update`](Self::update).
    #[inline]
    pub fn previous_position(&self) -> (f64, f64) {
        (self.prev_x, self.prev_y)
    }

    #[inline]
    pub fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    #[inline]
    pub fn target(&self) -> (f64, f64) {
        (self.tx, self.ty)
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.params.color
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.params.size
    }

    #[inline]
    pub fn params(&self) -> &ActorParams {
        &self.params
    }
}
