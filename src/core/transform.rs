use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// Punto simple en 3D (usado también como vector).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Norma 3D completa (los tres ejes).
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    #[inline]
    fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Point3;
    #[inline]
    fn mul(self, value: f32) -> Point3 {
        Point3::new(self.x * value, self.y * value, self.z * value)
    }
}

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, other: Point3) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl SubAssign for Point3 {
    #[inline]
    fn sub_assign(&mut self, other: Point3) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl MulAssign<f32> for Point3 {
    #[inline]
    fn mul_assign(&mut self, value: f32) {
        self.x *= value;
        self.y *= value;
        self.z *= value;
    }
}

/// Distancia entre dos puntos en el plano XY; el eje Z no participa.
#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

// normaliza ángulo a (-pi, pi]
#[inline]
pub fn normalize_angle(mut a: f32) -> f32 {
    while a > PI {
        a -= TAU;
    }
    while a <= -PI {
        a += TAU;
    }
    a
}

/// Ángulo con signo en `apex` entre (apex -> a) y (apex -> b), CCW positivo.
pub fn angle(apex: &Point3, a: &Point3, b: &Point3) -> f32 {
    let first = (a.y - apex.y).atan2(a.x - apex.x);
    let second = (b.y - apex.y).atan2(b.x - apex.x);
    normalize_angle(second - first)
}

/// Gira un punto alrededor del origen (0, 0) en el plano XY; Z no cambia.
pub fn rotate(point: &mut Point3, rotation: f32) {
    let len = (point.x * point.x + point.y * point.y).sqrt();
    if len == 0.0 {
        return;
    }
    let a = point.y.atan2(point.x) + rotation;
    point.x = a.cos() * len;
    point.y = a.sin() * len;
}

/// Posición + orientación. Composición plana, sin jerarquías de tipos.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transform {
    pub position: Point3,
    pub rotation_x: f32, // pitch: inclina la vista / da la pendiente del avance
    pub rotation_y: f32, // yaw
    pub rotation_z: f32, // roll, solo visual
}

impl Transform {
    /// Vector "adelante": unitario en XY; la Z es un término de pendiente aparte
    /// que NO se normaliza junto con el plano.
    #[inline]
    pub fn forward(&self, angle_offset: f32) -> Point3 {
        Point3::new(
            (self.rotation_y + angle_offset).cos(),
            (self.rotation_y + angle_offset).sin(),
            self.rotation_x.sin(),
        )
    }

    /// Avanza por el vector adelante; solo mueve X e Y.
    pub fn advance(&mut self, amount: f32) {
        let fwd = self.forward(0.0);
        self.position.x += fwd.x * amount;
        self.position.y += fwd.y * amount;
    }
}
