use crate::core::camera::Camera;
use crate::core::transform::Point3;

/// Con qué chocó el rayo: una cara de pared o un objeto dinámico.
/// Exactamente una de las dos cosas por colisión.
#[derive(Clone, Debug)]
pub enum CollisionHit {
    Wall {
        cell_x: i32,
        cell_y: i32,
        material: u32,
        height: f32,
        exit: Point3,
        exit_distance: f32,
    },
    Object {
        index: usize, // índice en el registro de objetos, válido este frame
        tex_u: f32,   // 0..1 a lo ancho del objeto, para el corte de textura
    },
}

/// Registro de una intersección. La distancia de entrada es euclídea en XY;
/// solo las paredes llevan punto de salida.
#[derive(Clone, Debug)]
pub struct Collision {
    pub entry: Point3,
    pub entry_distance: f32,
    pub column: usize, // desplazamiento de columna dentro del rayo dueño
    pub origin: Point3,
    pub hit: CollisionHit,
}

impl Collision {
    pub fn is_wall(&self) -> bool {
        matches!(self.hit, CollisionHit::Wall { .. })
    }
}

/// Un rayo: un grupo contiguo de columnas de pantalla, con el ángulo de cada
/// columna y las colisiones ordenadas de cerca a lejos.
#[derive(Clone, Debug, Default)]
pub struct Ray {
    first_column: usize,
    angles: Vec<f32>,
    collisions: Vec<Collision>,
}

impl Ray {
    pub fn new(first_column: usize, angles: Vec<f32>) -> Self {
        Self {
            first_column,
            angles,
            collisions: Vec::new(),
        }
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Añade una colisión; el orden se restablece con `sort_collisions`.
    pub fn add_collision(&mut self, collision: Collision) {
        self.collisions.push(collision);
    }

    /// Orden estable por distancia de entrada ascendente. Los empates
    /// conservan el orden de inserción (paredes antes que objetos del mismo
    /// frame a igual distancia).
    pub fn sort_collisions(&mut self) {
        self.collisions.sort_by(|a, b| {
            a.entry_distance
                .partial_cmp(&b.entry_distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// La colisión más cercana, si hay alguna (tras ordenar).
    pub fn nearest(&self) -> Option<&Collision> {
        self.collisions.first()
    }
}

/// Resultado completo de una pasada: instantánea de cámara + todos los rayos.
/// Transitorio, se reconstruye cada frame.
pub struct RaycastPass {
    pub camera: Camera,
    pub columns_per_ray: usize,
    pub rays: Vec<Ray>,
}
