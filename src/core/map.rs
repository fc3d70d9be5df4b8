use raylib::prelude::*;
use std::fmt;

/// Material de pared: id único + color para la vista 2D.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub id: u32,
    pub color_2d: Color,
}

/// Registro de materiales por id. Es el dueño de los materiales; las casillas
/// y los objetos solo guardan el id.
#[derive(Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self { materials: Vec::new() }
    }

    /// Crea un material nuevo; un id repetido se rechaza con aviso.
    pub fn create(&mut self, id: u32) -> Option<&mut Material> {
        if self.material(id).is_some() {
            log::warn!("el material con id {id} ya existe, creación ignorada");
            return None;
        }
        self.materials.push(Material {
            id,
            color_2d: Color::new(0, 0, 0, 255),
        });
        self.materials.last_mut()
    }

    pub fn material(&self, id: u32) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn material_mut(&mut self, id: u32) -> Option<&mut Material> {
        self.materials.iter_mut().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Una casilla de la rejilla. El material es una referencia débil (id) al
/// registro; la altura queda siempre en 1.0 de momento.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub material: Option<u32>,
    pub x: i32,
    pub y: i32,
    pub height: f32,
}

/// Error estructural del formato de map. Lo referencial (materiales
/// desconocidos) no pasa por aquí: se avisa y se sigue.
#[derive(Debug)]
pub enum MapError {
    MissingField(&'static str),
    BadNumber { field: &'static str, token: String },
    BadCell { token: String },
    Io(std::io::Error),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::MissingField(field) => write!(f, "falta el campo \"{field}\" en el texto de la map"),
            MapError::BadNumber { field, token } => {
                write!(f, "el campo \"{field}\" no es un número: \"{token}\"")
            }
            MapError::BadCell { token } => write!(f, "casilla ilegible en la map: \"{token}\""),
            MapError::Io(e) => write!(f, "no se pudo leer la map: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::Io(e)
    }
}

/// La rejilla completa: filas de casillas más un origen lógico.
/// Se sustituye entera al recargar.
pub struct Map {
    width: usize,
    height: usize,
    origin_x: i32,
    origin_y: i32,
    rows: Vec<Vec<Cell>>,
}

impl Map {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            origin_x: 0,
            origin_y: 0,
            rows: Vec::new(),
        }
    }

    /// Formato: `W;H;OX;OY;FILA-FILA-...`, cada fila `C_C_..._C`.
    /// Espacios y saltos de línea se eliminan antes de cortar. La primera fila
    /// del texto queda en y = origin_y y las siguientes suben.
    pub fn parse(text: &str, materials: &MaterialRegistry) -> Result<Map, MapError> {
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let mut fields = cleaned.split(';');

        let width_tok = fields.next().ok_or(MapError::MissingField("width"))?;
        let height_tok = fields.next().ok_or(MapError::MissingField("height"))?;
        let ox_tok = fields.next().ok_or(MapError::MissingField("origin_x"))?;
        let oy_tok = fields.next().ok_or(MapError::MissingField("origin_y"))?;
        let body = fields.next().ok_or(MapError::MissingField("body"))?;

        let parse_num = |field: &'static str, token: &str| -> Result<i64, MapError> {
            token.parse::<i64>().map_err(|_| MapError::BadNumber {
                field,
                token: token.to_string(),
            })
        };
        let width = parse_num("width", width_tok)?.max(0) as usize;
        let height = parse_num("height", height_tok)?.max(0) as usize;
        let origin_x = parse_num("origin_x", ox_tok)? as i32;
        let origin_y = parse_num("origin_y", oy_tok)? as i32;

        let mut rows = Vec::with_capacity(height);
        for (row_index, row_text) in body.split('-').enumerate() {
            let y = origin_y + row_index as i32;
            let mut row = Vec::with_capacity(width);
            for (col_index, token) in row_text.split('_').enumerate() {
                let x = origin_x + col_index as i32;
                let id: u32 = token.parse().map_err(|_| MapError::BadCell {
                    token: token.to_string(),
                })?;
                let material = if id == 0 {
                    None
                } else if materials.material(id).is_some() {
                    Some(id)
                } else {
                    log::warn!("map: el material \"{id}\" no existe, casilla ({x}, {y}) vacía");
                    None
                };
                row.push(Cell {
                    material,
                    x,
                    y,
                    height: 1.0,
                });
            }
            rows.push(row);
        }

        Ok(Map {
            width,
            height,
            origin_x,
            origin_y,
            rows,
        })
    }

    /// Casilla en coordenadas lógicas; fuera de rango devuelve None.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        let row = usize::try_from(y - self.origin_y).ok()?;
        let col = usize::try_from(x - self.origin_x).ok()?;
        self.rows.get(row)?.get(col)
    }

    /// ¿Cae un punto del mundo dentro de la rejilla?
    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.cell_at(x.floor() as i32, y.floor() as i32).is_some()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.iter())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin_x(&self) -> i32 {
        self.origin_x
    }

    pub fn origin_y(&self) -> i32 {
        self.origin_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[u32]) -> MaterialRegistry {
        let mut materials = MaterialRegistry::new();
        for &id in ids {
            materials.create(id);
        }
        materials
    }

    #[test]
    fn parse_round_trip() {
        let materials = registry_with(&[1, 2]);
        // 3x2: fila de abajo 1,0,2 / fila de arriba 0,1,0
        let map = Map::parse("3;2;0;0;1_0_2-0_1_0", &materials).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        let expected = [
            ((0, 0), Some(1)),
            ((1, 0), None),
            ((2, 0), Some(2)),
            ((0, 1), None),
            ((1, 1), Some(1)),
            ((2, 1), None),
        ];
        for ((x, y), id) in expected {
            assert_eq!(map.cell_at(x, y).unwrap().material, id, "casilla ({x}, {y})");
        }
        // fuera de rango
        assert!(map.cell_at(-1, 0).is_none());
        assert!(map.cell_at(3, 0).is_none());
        assert!(map.cell_at(0, 2).is_none());
    }

    #[test]
    fn parse_strips_whitespace_and_keeps_origin() {
        let materials = registry_with(&[1]);
        let map = Map::parse(" 2;2; 4; 10;\n1_0-\n0_1 ", &materials).unwrap();
        assert_eq!(map.origin_x(), 4);
        assert_eq!(map.origin_y(), 10);
        assert_eq!(map.cell_at(4, 10).unwrap().material, Some(1));
        assert_eq!(map.cell_at(5, 11).unwrap().material, Some(1));
        assert!(map.cell_at(0, 0).is_none());
    }

    #[test]
    fn parse_unknown_material_becomes_empty() {
        let materials = registry_with(&[1]);
        let map = Map::parse("2;1;0;0;1_9", &materials).unwrap();
        assert_eq!(map.cell_at(0, 0).unwrap().material, Some(1));
        assert_eq!(map.cell_at(1, 0).unwrap().material, None);
    }

    #[test]
    fn parse_bad_header_is_fatal() {
        let materials = MaterialRegistry::new();
        assert!(Map::parse("x;2;0;0;0_0", &materials).is_err());
        assert!(Map::parse("2;2;0;0", &materials).is_err());
        assert!(Map::parse("2;1;0;0;0_a", &materials).is_err());
    }

    #[test]
    fn duplicate_material_rejected() {
        let mut materials = MaterialRegistry::new();
        assert!(materials.create(1).is_some());
        assert!(materials.create(1).is_none());
        assert_eq!(materials.len(), 1);
        assert!(materials.material(1).is_some());
    }
}
