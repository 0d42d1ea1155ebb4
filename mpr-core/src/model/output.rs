//! Compiled output aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Contour, Operation};

/// The aggregate produced by one export invocation: ordered contours with
/// 1-based sequential identifiers, ordered operations, and the set of tool
/// numbers used.
///
/// Scoped per invocation and passed explicitly through the pipeline; there
/// is no shared state between exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompiledOutput {
    pub contours: Vec<Contour>,
    pub operations: Vec<Operation>,
    pub tools_used: BTreeSet<u32>,
    next_contour_id: u32,
}

impl CompiledOutput {
    pub fn new() -> Self {
        Self {
            contours: Vec::new(),
            operations: Vec::new(),
            tools_used: BTreeSet::new(),
            next_contour_id: 1,
        }
    }

    /// Allocate the next sequential contour identifier.
    pub fn allocate_contour_id(&mut self) -> u32 {
        let id = self.next_contour_id.max(1);
        self.next_contour_id = id + 1;
        id
    }

    /// Look up a contour by identifier.
    pub fn contour(&self, id: u32) -> Option<&Contour> {
        self.contours.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() && self.operations.is_empty()
    }
}
