//! 3D renderer (column slabs + roofs + sprite slices).
use raylib::prelude::*;

use crate::raycast::engine::RaycastEngine;
use crate::raycast::ray::CollisionHit;
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::TextureManager;

// nombre de la textura del suelo en el registro
const GROUND_TEXTURE: &str = "ground";
// suelo plano de reserva si no hay textura
const GROUND_FILL: Color = Color::new(0, 0, 255, 255);

#[inline]
fn scale_color(c: Color, k: f32) -> Color {
    let s = k.max(0.0);
    let mul = |v: u8| -> u8 { ((v as f32 * s).min(255.0)) as u8 };
    Color::new(mul(c.r), mul(c.g), mul(c.b), 255)
}

/// Render 3D en perspectiva, columna a columna. Pide su propia pasada a la
/// resolución del framebuffer (la cámara debe llevar screen_width acorde) y
/// pinta cada columna de lejos a cerca: algoritmo del pintor.
pub fn render_3d(
    fb: &mut Framebuffer,
    engine: &RaycastEngine,
    texman: &TextureManager,
    threads: usize,
    frame: u64,
) {
    let h = fb.height as f32;
    let camera = engine.camera;
    let horizon = h * 0.5 + h * camera.transform.rotation_x.sin();
    let camera_z = camera.transform.position.z;

    // fondo + "suelo" bajo el horizonte
    fb.set_background_color(engine.background_color);
    fb.clear();
    let ground_top = horizon.max(0.0) as u32;
    if let Some((tw, th)) = texman.size(GROUND_TEXTURE) {
        // sampleo estático: el ancho de la textura cruza la pantalla una vez
        for y in ground_top..fb.height {
            let ty = (((y as f32 - horizon).max(0.0) / (h - horizon).max(1.0)) * th as f32) as u32;
            for x in 0..fb.width {
                let tx = (x * tw) / fb.width;
                fb.set_pixel_color(x, y, texman.pixel(GROUND_TEXTURE, tx, ty.min(th - 1)));
            }
        }
    } else {
        fb.set_current_color(GROUND_FILL);
        for y in ground_top..fb.height {
            for x in 0..fb.width {
                fb.set_pixel(x, y);
            }
        }
    }

    let pass = engine.cast_all(fb.width as usize, threads, frame);
    for ray in &pass.rays {
        // de lejos a cerca: lo cercano tapa a lo lejano
        for collision in ray.collisions().iter().rev() {
            let x = (ray.first_column() + collision.column) as i32;
            if x >= fb.width as i32 {
                continue;
            }
            match &collision.hit {
                CollisionHit::Wall {
                    material,
                    height: wall_height,
                    exit_distance,
                    ..
                } => {
                    // escala: píxeles por unidad de mundo a esta distancia
                    let scale = camera.apparent_size(1.0, collision.entry_distance);
                    let top = horizon + scale * (camera_z - wall_height);
                    let bottom = horizon + scale * camera_z;
                    let color = engine
                        .materials
                        .material(*material)
                        .map(|m| m.color_2d)
                        .unwrap_or(Color::WHITE);
                    // techo entre la altura aparente de entrada y la de salida
                    if top > horizon && *exit_distance > collision.entry_distance {
                        let far_scale = camera.apparent_size(1.0, *exit_distance);
                        let far_top = horizon + far_scale * (camera_z - wall_height);
                        fb.set_current_color(scale_color(color, 1.35));
                        fb.draw_column(x, far_top, top);
                    }
                    fb.set_current_color(color);
                    fb.draw_column(x, top, bottom);
                }
                CollisionHit::Object { index, tex_u } => {
                    let Some(object) = engine.objects.get(*index) else {
                        continue;
                    };
                    let scale = camera.apparent_size(1.0, collision.entry_distance);
                    let apparent_h = scale * object.height;
                    let center = horizon + scale * (camera_z - object.transform.position.z);
                    let top = center - apparent_h * 0.5;
                    let bottom = center + apparent_h * 0.5;
                    let texture = object.texture.as_deref().filter(|t| texman.has(t));
                    if let Some(texture) = texture {
                        // corte vertical de 1 pixel de la textura, elegido por tex_u
                        let (tw, th) = texman.size(texture).unwrap_or((64, 64));
                        let tx = (tex_u * tw as f32).clamp(0.0, tw as f32 - 1.0) as u32;
                        let y0 = top.max(0.0) as i32;
                        let y1 = bottom.min(h - 1.0) as i32;
                        for y in y0..=y1 {
                            let v = (y as f32 - top) / (bottom - top).max(1.0);
                            let ty = (v * th as f32).clamp(0.0, th as f32 - 1.0) as u32;
                            let color = texman.pixel(texture, tx, ty);
                            if color.a < 8 {
                                continue; // alfa: descartar transparente
                            }
                            fb.set_pixel_color(x as u32, y as u32, color);
                        }
                    } else if let Some(id) = object.material {
                        if let Some(material) = engine.materials.material(id) {
                            fb.set_current_color(material.color_2d);
                            fb.draw_column(x, top, bottom);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::Point3;

    fn engine_10x10(walls: &[(i32, i32, u32)]) -> RaycastEngine {
        let mut engine = RaycastEngine::new();
        if let Some(m) = engine.materials.create(1) {
            m.color_2d = Color::RED;
        }
        if let Some(m) = engine.materials.create(2) {
            m.color_2d = Color::YELLOW;
        }
        let mut rows = Vec::new();
        for y in 0..10 {
            let cells: Vec<String> = (0..10)
                .map(|x| {
                    walls
                        .iter()
                        .find(|w| w.0 == x && w.1 == y)
                        .map(|w| w.2.to_string())
                        .unwrap_or_else(|| "0".to_string())
                })
                .collect();
            rows.push(cells.join("_"));
        }
        engine
            .load_map_text(&format!("10;10;0;0;{}", rows.join("-")))
            .unwrap();
        engine.camera.screen_width = 60;
        engine.camera.transform.position = Point3::new(5.0, 5.5, 0.5);
        engine
    }

    #[test]
    fn background_and_ground_split_at_horizon() {
        let engine = engine_10x10(&[]);
        let texman = TextureManager::new();
        let mut fb = Framebuffer::new(60, 40);
        render_3d(&mut fb, &engine, &texman, 0, 1);
        // sin pitch el horizonte queda a media pantalla
        assert_eq!(fb.get_pixel(30, 5), engine.background_color);
        assert_eq!(fb.get_pixel(30, 35), GROUND_FILL);
    }

    #[test]
    fn wall_slab_covers_center_column() {
        let engine = engine_10x10(&[(7, 5, 1)]);
        let texman = TextureManager::new();
        let mut fb = Framebuffer::new(60, 40);
        render_3d(&mut fb, &engine, &texman, 0, 1);
        // pared a distancia 2: la losa cubre de sobra el centro de pantalla
        assert_eq!(fb.get_pixel(30, 20), Color::RED);
    }

    #[test]
    fn near_sprite_overdraws_far_sprite() {
        let mut engine = engine_10x10(&[]);
        for (name, x, id) in [("near", 8.0f32, 1u32), ("far", 11.0, 2)] {
            let object = engine.objects.create(name, "").unwrap();
            object.transform.position = Point3::new(x, 5.5, 0.5);
            object.material = Some(id);
        }
        let texman = TextureManager::new();
        let mut fb = Framebuffer::new(60, 40);
        render_3d(&mut fb, &engine, &texman, 0, 1);
        // ambos caen en la columna central; el cercano (rojo) tapa al lejano
        assert_eq!(fb.get_pixel(30, 20), Color::RED);
    }
}
