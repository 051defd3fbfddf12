//! Nodo del grafo de proceso.
//!
//! Un `Node` es inmutable una vez cargada la definición. Solo los nodos de
//! tipo `Decision` llevan reglas; son resueltos por el motor dentro del mismo
//! `jump` y nunca quedan como nodo actual de una instancia.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::transition::{Command, Rule, Transition};
use crate::constants::UNSET_ACTOR;

/// Identificador lógico de un nodo dentro de su definición.
pub type NodeId = i64;

/// Identidad numérica de quien ejecuta un salto. `0` = sin definir.
pub type ActorId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Activity,
    Decision,
    End,
}

impl NodeKind {
    /// Tag estable en minúsculas (se usa como valor de columna).
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Activity => "activity",
            NodeKind::Decision => "decision",
            NodeKind::End => "end",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(NodeKind::Start),
            "activity" => Ok(NodeKind::Activity),
            "decision" => Ok(NodeKind::Decision),
            "end" => Ok(NodeKind::End),
            other => Err(format!("unknown node kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Identificador del nodo acotado a la definición (se persiste como `rnid`).
    pub nid: String,
    #[serde(default)]
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Reglas en orden de declaración (sólo `Decision`).
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub command: Option<Command>,
    /// Actores habilitados para salir de este nodo. Vacío = abierto.
    #[serde(default)]
    pub actors: Vec<ActorId>,
}

impl Node {
    pub fn new(id: NodeId, nid: impl Into<String>, kind: NodeKind) -> Self {
        Self { id,
               nid: nid.into(),
               name: String::new(),
               kind,
               transitions: Vec::new(),
               rules: Vec::new(),
               command: None,
               actors: Vec::new() }
    }

    pub fn is_decision(&self) -> bool {
        self.kind == NodeKind::Decision
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::End
    }

    /// Transición saliente por su `tid`.
    pub fn transition(&self, tid: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.tid == tid)
    }

    /// Un nodo sin actores declarados acepta a cualquiera; si los declara, el
    /// actor debe estar en la lista (el actor sin definir nunca lo está).
    pub fn check_actor(&self, actor: ActorId) -> bool {
        if self.actors.is_empty() {
            return true;
        }
        actor != UNSET_ACTOR && self.actors.contains(&actor)
    }
}
