use crate::core::{Block, Group};
use serde::Serialize;
use std::collections::BTreeSet;

/// Lifecycle status of an allotment block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum BlockStatus {
    Lead,
    Tentative,
    Definite,
    Cancelled,
}

impl BlockStatus {
    pub const ALL: [BlockStatus; 4] = [
        BlockStatus::Lead,
        BlockStatus::Tentative,
        BlockStatus::Definite,
        BlockStatus::Cancelled,
    ];

    pub fn parse(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "lead" => Some(BlockStatus::Lead),
            "tentative" => Some(BlockStatus::Tentative),
            "definite" => Some(BlockStatus::Definite),
            "cancelled" | "canceled" => Some(BlockStatus::Cancelled),
            _ => None,
        }
    }
}

/// View filters applied to the rendered report (never to exports)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub statuses: BTreeSet<BlockStatus>,
    pub group: Option<String>,
    pub block: Option<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            statuses: [
                BlockStatus::Lead,
                BlockStatus::Tentative,
                BlockStatus::Definite,
            ]
            .into_iter()
            .collect(),
            group: None,
            block: None,
        }
    }
}

impl Filters {
    pub fn select_all(&mut self, selected: bool) {
        self.statuses = if selected {
            BlockStatus::ALL.into_iter().collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn all_selected(&self) -> bool {
        self.statuses.len() == BlockStatus::ALL.len()
    }

    /// Selection differs from the default and does not cover every status
    pub fn is_narrowed(&self) -> bool {
        !self.all_selected() && self.statuses != Filters::default().statuses
    }

    pub fn status_label(&self) -> String {
        match self.statuses.len() {
            0 => "None Selected".to_string(),
            n if n == BlockStatus::ALL.len() => "All Selected".to_string(),
            n => format!("{} Selected", n),
        }
    }

    pub fn matches_group(&self, group: &Group) -> bool {
        let Some(needle) = normalized(self.group.as_deref()) else {
            return true;
        };
        [group.name.as_str(), group.code.as_str()]
            .into_iter()
            .chain(group.display_name.as_deref())
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Blocks with a missing or unrecognised status pass unless the selection was narrowed
    /// from the default
    pub fn matches_block(&self, block: &Block) -> bool {
        let status_ok = match block.status.as_deref().and_then(BlockStatus::parse) {
            Some(status) => self.statuses.contains(&status),
            None => self.all_selected() || !self.is_narrowed(),
        };
        if !status_ok {
            return false;
        }

        let Some(needle) = normalized(self.block.as_deref()) else {
            return true;
        };
        block.name.to_lowercase().contains(&needle)
            || block
                .code()
                .is_some_and(|code| code.to_lowercase().contains(&needle))
    }
}

fn normalized(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
