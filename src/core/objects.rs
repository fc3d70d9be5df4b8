use std::collections::HashMap;

use crate::core::transform::Transform;

/// Objeto dinámico: entidad con nombre único, etiquetas, y material/textura
/// opcionales por clave débil. No vive en la rejilla.
pub struct DynamicObject {
    pub transform: Transform,
    name: String,
    tags: Vec<String>,
    pub material: Option<u32>,
    pub texture: Option<String>,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl DynamicObject {
    pub fn new(name: &str) -> Self {
        Self {
            transform: Transform::default(),
            name: name.to_string(),
            tags: Vec::new(),
            material: None,
            texture: None,
            width: 1.0,
            height: 1.0,
            visible: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }
}

/// Constructor registrado para una variante ("kind") de objeto.
pub type ObjectConstructor = Box<dyn Fn(&str) -> DynamicObject + Send + Sync>;

/// Registro de objetos dinámicos. La creación pasa por constructores
/// registrados por tipo; la aplicación que embebe el motor puede añadir los
/// suyos. Las colecciones solo se tocan desde aquí.
#[derive(Default)]
pub struct ObjectRegistry {
    objects: Vec<DynamicObject>,
    kinds: HashMap<String, ObjectConstructor>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            kinds: HashMap::new(),
        }
    }

    /// Registra (o sustituye) el constructor de una variante.
    pub fn register_kind(&mut self, kind: &str, constructor: ObjectConstructor) {
        self.kinds.insert(kind.to_string(), constructor);
    }

    /// Crea un objeto de la variante pedida; un nombre repetido se rechaza con
    /// aviso. Una variante sin constructor produce el objeto genérico.
    pub fn create(&mut self, name: &str, kind: &str) -> Option<&mut DynamicObject> {
        if self.find_by_name(name).is_some() {
            log::warn!("el objeto \"{name}\" ya existe, creación ignorada");
            return None;
        }
        let object = match self.kinds.get(kind) {
            Some(constructor) => constructor(name),
            None => DynamicObject::new(name),
        };
        self.objects.push(object);
        self.objects.last_mut()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&DynamicObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut DynamicObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Todos los objetos con la etiqueta, en orden de inserción.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&DynamicObject> {
        self.objects.iter().filter(|o| o.has_tag(tag)).collect()
    }

    /// Saca el objeto del registro y lo devuelve. Índices secundarios de la
    /// aplicación son cosa suya; esto es el gancho genérico.
    pub fn remove(&mut self, name: &str) -> Option<DynamicObject> {
        let index = self.objects.iter().position(|o| o.name == name)?;
        Some(self.objects.remove(index))
    }

    /// Pasa el gancho de actualización por cada objeto, una vez por frame.
    pub fn update_all(&mut self, mut hook: impl FnMut(&mut DynamicObject)) {
        for object in &mut self.objects {
            hook(object);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicObject> {
        self.objects.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DynamicObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = ObjectRegistry::new();
        assert!(registry.create("a", "").is_some());
        assert!(registry.create("a", "").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn kind_constructor_applies() {
        let mut registry = ObjectRegistry::new();
        registry.register_kind(
            "bullet",
            Box::new(|name| {
                let mut o = DynamicObject::new(name);
                o.add_tag("bullet");
                o.width = 0.2;
                o
            }),
        );
        let b = registry.create("b1", "bullet").unwrap();
        assert!(b.has_tag("bullet"));
        assert_eq!(b.width, 0.2);
        // variante sin registrar: objeto genérico
        let g = registry.create("g1", "whatever").unwrap();
        assert!(!g.has_tag("bullet"));
    }

    #[test]
    fn tag_lookup_keeps_insertion_order() {
        let mut registry = ObjectRegistry::new();
        for name in ["x", "y", "z"] {
            let o = registry.create(name, "").unwrap();
            o.add_tag("team");
        }
        registry.create("w", "").unwrap();
        let found: Vec<&str> = registry.find_all_by_tag("team").iter().map(|o| o.name()).collect();
        assert_eq!(found, ["x", "y", "z"]);
    }

    #[test]
    fn remove_frees_the_name() {
        let mut registry = ObjectRegistry::new();
        registry.create("a", "").unwrap();
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.create("a", "").is_some());
    }
}
