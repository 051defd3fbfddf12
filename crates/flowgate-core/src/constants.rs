//! Constantes del motor core.

/// Tope por defecto de nodos de decisión encadenados en un solo `jump`.
pub const DEFAULT_MAX_DECISION_HOPS: usize = 32;

/// Actor "no definido".
pub const UNSET_ACTOR: i64 = 0;
