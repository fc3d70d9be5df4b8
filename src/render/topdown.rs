use raylib::prelude::*;

use crate::raycast::engine::RaycastEngine;
use crate::render::framebuffer::Framebuffer;

// rayos de depuración de la vista cenital
const DEBUG_RAYS: usize = 100;

const CAMERA_COLOR: Color = Color::new(0, 255, 0, 255);

/// Vista cenital de depuración: casillas como cuadrados planos del color 2D
/// de su material, una línea por rayo hasta su colisión más cercana y una
/// marca por objeto dinámico visible.
pub fn render_topdown(fb: &mut Framebuffer, engine: &RaycastEngine, frame: u64, cell_px: u32) {
    let map = engine.map();
    let surface_h = (map.height() as u32 * cell_px) as f32;
    let origin_x = map.origin_x();
    let origin_y = map.origin_y();

    fb.clear();

    // casillas; la Y de la map crece hacia arriba y la imagen hacia abajo
    for cell in map.iter_cells() {
        let Some(id) = cell.material else { continue };
        let Some(material) = engine.materials.material(id) else { continue };
        let x = (cell.x - origin_x) * cell_px as i32;
        let y = surface_h as i32 - (cell.y - origin_y) * cell_px as i32;
        fb.set_current_color(material.color_2d);
        fb.draw_rect(x, y, cell_px, cell_px);
    }

    // mundo -> pixel de la imagen
    let to_pixel = |wx: f32, wy: f32| -> (i32, i32) {
        (
            ((wx - origin_x as f32) * cell_px as f32) as i32,
            (surface_h - (wy - origin_y as f32) * cell_px as f32) as i32,
        )
    };

    // una pasada propia para las líneas de rayo
    let pass = engine.cast_all(DEBUG_RAYS, 0, frame);
    let camera = pass.camera.transform.position;
    let (cam_x, cam_y) = to_pixel(camera.x, camera.y);
    fb.set_current_color(CAMERA_COLOR);
    for ray in &pass.rays {
        if let Some(collision) = ray.nearest() {
            let (ex, ey) = to_pixel(collision.entry.x, collision.entry.y);
            fb.draw_line(cam_x, cam_y, ex, ey);
        }
    }
    fb.draw_rect(cam_x - 2, cam_y - 2, 5, 5);

    // marcas de los objetos dinámicos
    for object in engine.objects.iter() {
        if !object.visible {
            continue;
        }
        let Some(id) = object.material else { continue };
        let Some(material) = engine.materials.material(id) else { continue };
        let (ox, oy) = to_pixel(object.transform.position.x, object.transform.position.y);
        fb.set_current_color(material.color_2d);
        fb.draw_rect(ox - 2, oy - 2, 5, 5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::Point3;

    fn demo_engine() -> RaycastEngine {
        let mut engine = RaycastEngine::new();
        if let Some(m) = engine.materials.create(1) {
            m.color_2d = Color::RED;
        }
        engine.load_map_text("4;3;0;0;0_0_0_0-0_1_0_0-0_0_0_0").unwrap();
        engine.camera.screen_width = 40;
        engine.camera.transform.position = Point3::new(0.5, 1.5, 0.5);
        engine
    }

    #[test]
    fn cell_square_lands_flipped() {
        let engine = demo_engine();
        let mut fb = Framebuffer::new(40, 30);
        render_topdown(&mut fb, &engine, 1, 10);
        // casilla (1,1): x en [10,20), y en [20,30) tras el volteo
        assert_eq!(fb.get_pixel(15, 25), Color::RED);
        assert_eq!(fb.get_pixel(35, 5), fb.background_color);
    }

    #[test]
    fn camera_marker_is_painted() {
        let engine = demo_engine();
        let mut fb = Framebuffer::new(40, 30);
        render_topdown(&mut fb, &engine, 1, 10);
        // cámara en (0.5, 1.5) -> pixel (5, 15)
        assert_eq!(fb.get_pixel(5, 15), CAMERA_COLOR);
    }

    #[test]
    fn object_marker_uses_material_color() {
        let mut engine = demo_engine();
        if let Some(m) = engine.materials.create(2) {
            m.color_2d = Color::YELLOW;
        }
        let object = engine.objects.create("mark", "").unwrap();
        object.transform.position = Point3::new(3.5, 0.5, 0.0);
        object.material = Some(2);
        let mut fb = Framebuffer::new(40, 30);
        render_topdown(&mut fb, &engine, 1, 10);
        assert_eq!(fb.get_pixel(35, 25), Color::YELLOW);
    }
}
