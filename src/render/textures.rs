use raylib::prelude::*;
use std::collections::HashMap;

/// Un pixmap inmutable (CPU) para samplear por pixel sin &mut Image.
#[derive(Clone)]
struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Pixmap {
    fn new(w: u32, h: u32, px: Vec<Color>) -> Self {
        Self { w, h, px }
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[(yi * self.w as usize) + xi]
    }
}

/// Registro de texturas por nombre. El motor nunca carga imágenes por su
/// cuenta: la aplicación registra aquí y el compositor samplea.
#[derive(Default)]
pub struct TextureManager {
    maps: HashMap<String, Pixmap>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self { maps: HashMap::new() }
    }

    /// Carga una imagen y la registra con ese nombre; si el fichero falta se
    /// avisa y se deja un checker de reserva.
    pub fn load_file(&mut self, name: &str, path: &str) {
        match Image::load_image(path) {
            Ok(img) => {
                let w = img.width().max(1) as u32;
                let h = img.height().max(1) as u32;
                let data = img.get_image_data().to_vec();
                self.maps.insert(name.to_string(), Pixmap::new(w, h, data));
            }
            Err(_) => {
                log::warn!("textura \"{name}\": no se pudo cargar \"{path}\", checker de reserva");
                self.insert_checker(name, Self::color_from_name(name));
            }
        }
    }

    /// Checker procedural (reserva y texturas de prueba).
    pub fn insert_checker(&mut self, name: &str, base: Color) {
        let (w, h) = (64u32, 64u32);
        let mut px = vec![base; (w * h) as usize];
        let cell = 8u32;
        for y in 0..h {
            for x in 0..w {
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    let i = (y * w + x) as usize;
                    px[i] = Self::mix(px[i], Color::WHITE, 24);
                }
            }
        }
        self.maps.insert(name.to_string(), Pixmap::new(w, h, px));
    }

    fn color_from_name(name: &str) -> Color {
        let k: u32 = name.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let r = ((k * 97) % 200 + 40) as u8;
        let g = ((k * 57) % 200 + 40) as u8;
        let b = ((k * 31) % 200 + 40) as u8;
        Color::new(r, g, b, 255)
    }

    #[inline]
    fn mix(a: Color, b: Color, t: u8) -> Color {
        let ta = t as u16;
        let na = 255u16 - ta;
        let mixc = |x: u8, y: u8| -> u8 { (((x as u16) * na + (y as u16) * ta) / 255) as u8 };
        Color::new(mixc(a.r, b.r), mixc(a.g, b.g), mixc(a.b, b.b), mixc(a.a, b.a))
    }

    /// Sample por pixel; sin textura registrada devuelve blanco.
    pub fn pixel(&self, name: &str, tx: u32, ty: u32) -> Color {
        if let Some(pm) = self.maps.get(name) {
            return pm.sample(tx, ty);
        }
        Color::WHITE
    }

    pub fn size(&self, name: &str) -> Option<(u32, u32)> {
        self.maps.get(name).map(|p| (p.w, p.h))
    }

    pub fn has(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }
}
