//! Bolsa de datos de un salto.
//!
//! `ProcessData` reemplaza el payload dinámico del llamador: es un mapa
//! clave/valor JSON, ordenado (serialización estable), que el evaluador de
//! condiciones consulta por ruta con puntos (`"order.amount"`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessData {
    values: BTreeMap<String, Value>,
}

impl ProcessData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estilo builder: `ProcessData::new().with("amount", 10)`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Resuelve una ruta con puntos. Primero intenta la clave completa (las
    /// claves pueden contener puntos), luego desciende por objetos y arreglos
    /// (segmentos numéricos indexan arreglos).
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if let Some(v) = self.values.get(path) {
            return Some(v);
        }
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for seg in segments {
            current = match current {
                Value::Object(map) => map.get(seg)?,
                Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mezcla `other` sobre `self` (las claves de `other` ganan).
    pub fn merge(&mut self, other: ProcessData) {
        self.values.extend(other.values);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl From<BTreeMap<String, Value>> for ProcessData {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ProcessData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_paths_descend_objects_and_arrays() {
        let data = ProcessData::new().with("order", json!({"amount": 1200, "lines": [{"sku": "A"}]}));
        assert_eq!(data.get_path("order.amount"), Some(&json!(1200)));
        assert_eq!(data.get_path("order.lines.0.sku"), Some(&json!("A")));
        assert_eq!(data.get_path("order.missing"), None);
        assert_eq!(data.get_path("order.amount.deeper"), None);
    }

    #[test]
    fn literal_key_with_dot_wins() {
        let data = ProcessData::new().with("a.b", 1).with("a", json!({"b": 2}));
        assert_eq!(data.get_path("a.b"), Some(&json!(1)));
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = ProcessData::new().with("x", 1).with("y", 2);
        base.merge(ProcessData::new().with("y", 3));
        assert_eq!(base.get("y"), Some(&json!(3)));
        assert_eq!(base.len(), 2);
        assert_eq!(serde_json::to_value(&base).unwrap(), json!({"x": 1, "y": 3}));
    }
}
