// main.rs
#![allow(dead_code)]

mod core;
mod raycast;
mod render;

use rand::Rng;
use raylib::prelude::*;

use crate::core::jet::Jet;
use crate::core::objects::DynamicObject;
use crate::core::process_events::process_events;
use crate::core::transform::Point3;
use crate::raycast::engine::RaycastEngine;
use crate::render::framebuffer::Framebuffer;
use crate::render::render3d::render_3d;
use crate::render::topdown::render_topdown;
use crate::render::textures::TextureManager;

// resolución interna = ventana, 1 columna por pixel
const RENDER_W: u32 = 960;
const RENDER_H: u32 = 540;
// workers de la pasada de raycast (0 = secuencial)
const RAY_THREADS: usize = 4;
const CELL_PX: u32 = 40;

const BULLET_SPEED: f32 = 14.0;
const DRONE_SPEED: f32 = 1.6;

// arena de demo: la primera fila del texto es la fila de abajo (y = 0)
const DEFAULT_MAP: &str = "16;12;0;0;
1_1_1_1_1_1_1_1_1_1_1_1_1_1_1_1-
1_0_0_0_0_0_0_0_0_0_0_0_0_0_0_1-
1_0_0_0_0_0_2_0_0_0_0_0_0_0_0_1-
1_0_0_0_0_0_0_0_0_0_0_2_2_0_0_1-
1_0_0_3_0_0_0_0_0_0_0_0_2_0_0_1-
1_0_0_0_0_0_0_0_0_0_0_0_0_0_0_1-
1_0_0_0_0_0_0_0_3_3_0_0_0_0_0_1-
1_0_0_0_2_0_0_0_0_3_0_0_0_0_0_1-
1_0_0_0_0_0_0_0_0_0_0_0_0_0_0_1-
1_0_0_0_0_0_0_0_0_0_0_0_0_3_0_1-
1_0_0_0_0_0_0_0_0_0_0_0_0_0_0_1-
1_1_1_1_1_1_1_1_1_1_1_1_1_1_1_1";

fn setup_engine() -> RaycastEngine {
    let mut engine = RaycastEngine::new();
    engine.camera.screen_width = RENDER_W as usize;
    engine.camera.screen_distance = 300.0;

    if let Some(m) = engine.materials.create(1) {
        m.color_2d = Color::new(110, 110, 120, 255); // muro perimetral
    }
    if let Some(m) = engine.materials.create(2) {
        m.color_2d = Color::new(168, 66, 48, 255); // torres de ladrillo
    }
    if let Some(m) = engine.materials.create(3) {
        m.color_2d = Color::new(58, 110, 165, 255); // bloques azules
    }

    engine.objects.register_kind(
        "jet",
        Box::new(|name| {
            let mut object = DynamicObject::new(name);
            object.add_tag("jet");
            object.width = 1.4;
            object.height = 0.7;
            object
        }),
    );
    engine.objects.register_kind(
        "bullet",
        Box::new(|name| {
            let mut object = DynamicObject::new(name);
            object.add_tag("bullet");
            object.width = 0.15;
            object.height = 0.15;
            object
        }),
    );

    // map de fichero si existe; si no, la arena embebida
    let loaded = std::path::Path::new("map.txt").exists() && engine.load_map_file("map.txt").is_ok();
    if !loaded {
        engine
            .load_map_text(DEFAULT_MAP)
            .expect("la map de demo es válida");
    }
    engine
}

fn main() {
    env_logger::init();

    let (mut rl, raylib_thread) = raylib::init()
        .size(RENDER_W as i32, RENDER_H as i32)
        .title("Skycaster")
        .build();

    let mut texman = TextureManager::new();
    texman.load_file("ground", "assets/ground.png");
    texman.load_file("jet", "assets/jet.png");

    let mut engine = setup_engine();

    // el avión del jugador y un par de drones a la deriva
    if let Some(player) = engine.objects.create("player", "jet") {
        player.transform.position = Point3::new(3.5, 3.5, 0.5);
        player.material = Some(3);
        player.visible = false; // la cámara va dentro
    }
    let mut jet = Jet::new("player");
    for (name, x, y) in [("drone-1", 10.5f32, 8.5f32), ("drone-2", 12.5, 3.5)] {
        if let Some(drone) = engine.objects.create(name, "jet") {
            drone.transform.position = Point3::new(x, y, 0.6);
            drone.material = Some(2);
            drone.texture = Some("jet".to_string());
            drone.add_tag("drone");
        }
    }
    let mut fb = Framebuffer::new(RENDER_W, RENDER_H);
    let screen_image = Image::gen_image_color(RENDER_W as i32, RENDER_H as i32, Color::BLACK);
    let mut screen_tex = rl
        .load_texture_from_image(&raylib_thread, &screen_image)
        .expect("textura de pantalla");

    let mut rng = rand::thread_rng();
    let mut frame: u64 = 0;
    let mut topdown = false;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        let controls = process_events(&rl);
        if controls.toggle_view {
            topdown = !topdown;
        }

        // gancho por objeto: balas hacia delante, drones a la deriva
        engine.update_objects(|object| {
            if object.has_tag("bullet") {
                let ahead = object.transform.forward(0.0);
                object.transform.position += ahead * (BULLET_SPEED * dt);
            } else if object.has_tag("drone") {
                object.transform.rotation_y += rng.gen_range(-0.6..0.6) * dt;
                object.transform.advance(DRONE_SPEED * dt);
            }
        });

        // balas fuera de la map o dentro de un muro: se retiran
        let expired: Vec<String> = engine
            .objects
            .iter()
            .filter(|o| o.has_tag("bullet"))
            .filter(|o| {
                let p = o.transform.position;
                match engine.map().cell_at(p.x.floor() as i32, p.y.floor() as i32) {
                    Some(cell) => cell.material.is_some(),
                    None => true,
                }
            })
            .map(|o| o.name().to_string())
            .collect();
        for name in expired {
            engine.objects.remove(&name);
        }

        jet.update(
            &mut engine.objects,
            controls.turn,
            controls.pitch,
            controls.firing,
            dt,
        );

        // la cámara vuela con el avión
        if let Some(player) = engine.objects.find_by_name("player") {
            engine.camera.transform = player.transform;
        }

        frame += 1;
        if topdown {
            render_topdown(&mut fb, &engine, frame, CELL_PX);
        } else {
            render_3d(&mut fb, &engine, &texman, RAY_THREADS, frame);
        }
        fb.upload_to_texture(&mut screen_tex);

        let fps_now = rl.get_fps();
        {
            let mut d = rl.begin_drawing(&raylib_thread);
            d.clear_background(Color::BLACK);
            d.draw_texture(&screen_tex, 0, 0, Color::WHITE);
            d.draw_text(&format!("FPS: {}", fps_now), 10, 10, 20, Color::WHITE);
            d.draw_text("A/D girar  W/S picar  E fuego  M vista", 10, 34, 20, Color::LIGHTGRAY);
        }
    }
}
