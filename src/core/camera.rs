use crate::core::transform::Transform;

/// Cámara del motor: transformación + parámetros de proyección. Una por motor;
/// la aplicación la mueve entre frames.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub transform: Transform,
    pub fov: f32,             // campo de visión en radianes
    pub screen_width: usize,  // columnas de pantalla de la pasada
    pub screen_distance: f32, // distancia de proyección (escala vertical)
}

impl Camera {
    pub fn new() -> Self {
        Self {
            transform: Transform::default(),
            fov: std::f32::consts::FRAC_PI_2, // 90°
            screen_width: 800,
            screen_distance: 500.0,
        }
    }

    /// Ángulo de cámara del centro de una columna: la columna 0 mira a
    /// +fov/2 (izquierda) y la última a -fov/2.
    #[inline]
    pub fn angle_for_column(&self, column: f32) -> f32 {
        self.fov * 0.5 - (column + 0.5) * (self.fov / self.screen_width as f32)
    }

    /// Columna fraccionaria donde cae un ángulo relativo al "adelante".
    #[inline]
    pub fn column_for_angle(&self, angle: f32) -> f32 {
        ((self.fov * 0.5 - angle) / self.fov) * self.screen_width as f32
    }

    /// Ley del tamaño aparente: triángulos semejantes, sin modelo de lente.
    #[inline]
    pub fn apparent_size(&self, size: f32, distance: f32) -> f32 {
        if distance <= 0.0 {
            return 0.0;
        }
        (self.screen_distance / distance) * size
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn apparent_size_is_inverse_proportional() {
        let camera = Camera::new();
        let d1 = 2.5;
        let d2 = 7.0;
        let ratio = camera.apparent_size(3.0, d1) / camera.apparent_size(3.0, d2);
        assert_relative_eq!(ratio, d2 / d1, epsilon = 1e-5);
        assert_eq!(camera.apparent_size(3.0, 0.0), 0.0);
    }

    #[test]
    fn column_angle_round_trip() {
        let mut camera = Camera::new();
        camera.screen_width = 101;
        // columna central: ángulo 0
        assert_relative_eq!(camera.angle_for_column(50.0), 0.0, epsilon = 1e-6);
        for column in [0.0f32, 13.0, 50.0, 100.0] {
            let angle = camera.angle_for_column(column);
            assert_relative_eq!(camera.column_for_angle(angle), column + 0.5, epsilon = 1e-3);
        }
        // un ángulo CCW (izquierda) cae antes del centro
        assert!(camera.column_for_angle(0.3) < 50.0);
    }
}
