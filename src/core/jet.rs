use std::f32::consts::FRAC_PI_2;

use crate::core::objects::ObjectRegistry;
use crate::core::transform::{Point3, Transform, rotate};

/// Física de vuelo del avión de la demo (empuje, giro con alabeo,
/// rozamiento) más su metralleta. Vive fuera del motor: solo toca su objeto
/// dinámico por nombre.
pub struct Jet {
    name: String,
    velocity: Point3,
    thrust: f32, // empuje total en N
    weight: f32, // kg
    bullets_fired: u32,
    fire_rate: f32, // disparos por segundo
    fire_cooldown: f32,
}

impl Jet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            velocity: Point3::default(),
            thrust: 150_000.0,
            weight: 3_680.0,
            bullets_fired: 0,
            fire_rate: 10.0,
            fire_cooldown: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Un paso de simulación; `turn` y `pitch` en [-1, 1], turn positivo gira
    /// a la izquierda.
    pub fn update(
        &mut self,
        registry: &mut ObjectRegistry,
        turn: f32,
        pitch: f32,
        firing: bool,
        dt: f32,
    ) {
        let mut spawn: Option<Transform> = None;
        {
            let Some(object) = registry.find_by_name_mut(&self.name) else {
                return;
            };
            let fwd = object.transform.forward(0.0);

            // empuje por el vector adelante
            self.velocity += fwd * ((self.thrust / self.weight) * dt);

            // el giro rota también la velocidad y cuesta algo de energía
            if turn != 0.0 {
                let da = turn * dt;
                rotate(&mut self.velocity, da);
                object.transform.rotation_y += da;
                object.transform.rotation_z += turn * FRAC_PI_2 * dt;
                self.velocity *= 1.0 - dt / 4.0;
            }
            object.transform.rotation_z = object.transform.rotation_z.clamp(-FRAC_PI_2, FRAC_PI_2);
            // el alabeo vuelve solo al neutro
            object.transform.rotation_z *= 1.0 - (dt * 3.0).min(1.0);

            object.transform.rotation_x = (object.transform.rotation_x + pitch * dt).clamp(-0.8, 0.8);

            // rozamiento hacia el vector adelante; la componente Z pesa doble
            let mut current = self.velocity;
            current.z *= 2.0;
            let mut brake = fwd;
            brake -= current;
            brake *= 0.1 * dt;
            self.velocity += brake;

            // aplicar el movimiento
            object.transform.position += self.velocity * (0.01 * dt);

            // metralleta con cadencia limitada
            self.fire_cooldown -= dt;
            if firing && self.fire_cooldown <= 0.0 {
                self.fire_cooldown = 1.0 / self.fire_rate;
                let mut at = object.transform;
                at.position += fwd * 4.0;
                spawn = Some(at);
            }
        }
        if let Some(at) = spawn {
            self.fire(registry, at);
        }
    }

    // deja una bala nueva en el registro, delante del avión
    fn fire(&mut self, registry: &mut ObjectRegistry, at: Transform) {
        let name = format!("{}-bala-{}", self.name, self.bullets_fired);
        self.bullets_fired += 1;
        if let Some(bullet) = registry.create(&name, "bullet") {
            bullet.transform = at;
        }
    }
}
