use raylib::prelude::*;

/// Entrada de teclado de la demo, ya mapeada a órdenes del avión.
#[derive(Clone, Copy, Default)]
pub struct Controls {
    pub turn: f32,  // -1..1, positivo gira a la izquierda
    pub pitch: f32, // -1..1
    pub firing: bool,
    pub toggle_view: bool,
}

pub fn process_events(rl: &RaylibHandle) -> Controls {
    let mut controls = Controls::default();
    if rl.is_key_down(KeyboardKey::KEY_A) {
        controls.turn += 1.0;
    }
    if rl.is_key_down(KeyboardKey::KEY_D) {
        controls.turn -= 1.0;
    }
    if rl.is_key_down(KeyboardKey::KEY_W) {
        controls.pitch += 1.0;
    }
    if rl.is_key_down(KeyboardKey::KEY_S) {
        controls.pitch -= 1.0;
    }
    controls.firing = rl.is_key_down(KeyboardKey::KEY_E);
    controls.toggle_view = rl.is_key_pressed(KeyboardKey::KEY_M);
    controls
}
