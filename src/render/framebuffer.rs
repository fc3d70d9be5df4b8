use raylib::core::texture::RaylibTexture2D; // trait necesario para .update_texture()
use raylib::prelude::*;

/// Framebuffer CPU: buffer de colores plano que luego se sube entero a una
/// textura persistente para presentarlo.
pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub current_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
            current_color: Color::WHITE,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = self.current_color;
        }
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline] pub fn set_current_color(&mut self, c: Color) { self.current_color = c; }
    #[inline] pub fn set_background_color(&mut self, c: Color) { self.background_color = c; }

    /// Columna vertical de 1 pixel con el color actual; los extremos se
    /// recortan a pantalla.
    pub fn draw_column(&mut self, x: i32, y0: f32, y1: f32) {
        if x < 0 || x >= self.width as i32 {
            return;
        }
        if y0.max(y1) < 0.0 || y0.min(y1) > self.height as f32 - 1.0 {
            return; // columna entera fuera de pantalla
        }
        let top = y0.min(y1).max(0.0) as u32;
        let bottom = (y0.max(y1).min(self.height as f32 - 1.0)).max(0.0) as u32;
        for y in top..=bottom {
            self.set_pixel(x as u32, y);
        }
    }

    /// Rectángulo relleno con el color actual.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        for yy in y.max(0)..(y + h as i32).min(self.height as i32) {
            for xx in x.max(0)..(x + w as i32).min(self.width as i32) {
                self.set_pixel(xx as u32, yy as u32);
            }
        }
    }

    /// Línea de Bresenham con el color actual.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            if x >= 0 && y >= 0 {
                self.set_pixel(x as u32, y as u32);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Sube los píxeles a una textura persistente (RGBA8, sin copiar).
    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        let bytes: &[u8] = unsafe {
            std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len)
        };
        let _ = tex.update_texture(bytes);
    }
}
