//! Plan file format.
//!
//! This module contains the data structures for the plan file.
//!
//! ```text
//! Plan
//!   ├── meta: Option<Meta>
//!   │   └── name: Option<String>
//!   ├── input: InputConfig
//!   │   └── filename: String
//!   ├── view: ViewMode (line | entity)
//!   ├── palette: Option<String>
//!   ├── palettes: Vec<Palette>
//!   │   ├── name: String
//!   │   └── colors: Vec<String>
//!   ├── classification: ClassificationConfig
//!   │   ├── numeric_ceiling: f64
//!   │   ├── date_serial_threshold: f64
//!   │   └── date_header_tokens: Vec<String>
//!   ├── transform: TransformConfig
//!   │   ├── cell_fallback: CellFallback (zero | drop_row)
//!   │   └── date_labels: DateLabels (iso | raw)
//!   ├── layout: LayoutConfig
//!   │   └── radius: f64
//!   └── export: ExportProfile
//!       └── profiles: Vec<ExportProfileItem>
//!           ├── filename: String
//!           └── exporter: ExportFileType
//!               ├── JSON
//!               ├── CSVNodes
//!               ├── CSVEdges
//!               ├── CSVChart
//!               ├── DOT
//!               ├── SVG
//!               └── Custom(CustomExportProfile)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{PlanError, PlanResult};
use crate::transform::{CellFallback, DateLabels, ViewMode};

pub const DEFAULT_NUMERIC_CEILING: f64 = 50000.0;
pub const DEFAULT_DATE_SERIAL_THRESHOLD: f64 = 40000.0;
pub const DEFAULT_LAYOUT_RADIUS: f64 = 200.0;
pub const DEFAULT_PALETTE: &str = "default";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Plan {
    pub meta: Option<Meta>,
    pub input: InputConfig,
    pub view: ViewMode,
    pub palette: Option<String>,
    pub palettes: Vec<Palette>,
    pub classification: ClassificationConfig,
    pub transform: TransformConfig,
    pub layout: LayoutConfig,
    pub export: ExportProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InputConfig {
    pub filename: String,
}

//
// Pipeline configuration
//

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

impl Palette {
    pub fn new(name: &str, colors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub fn default_palettes() -> Vec<Palette> {
    vec![
        Palette::new(DEFAULT_PALETTE, &["#3b82f6", "#22c55e", "#f97316", "#a855f7"]),
        Palette::new("pastel", &["#93c5fd", "#86efac", "#fdba74", "#d8b4fe"]),
        Palette::new("earth", &["#78716c", "#a16207", "#4d7c0f", "#b45309"]),
    ]
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Numbers at or above this magnitude are not treated as measurements
    pub numeric_ceiling: f64,
    /// Integral serials above this value may be spreadsheet dates
    pub date_serial_threshold: f64,
    /// Header fragments that mark a date column
    pub date_header_tokens: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            numeric_ceiling: DEFAULT_NUMERIC_CEILING,
            date_serial_threshold: DEFAULT_DATE_SERIAL_THRESHOLD,
            date_header_tokens: vec!["date".to_string(), "日期".to_string()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransformConfig {
    pub cell_fallback: CellFallback,
    pub date_labels: DateLabels,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_LAYOUT_RADIUS,
        }
    }
}

//
// Export configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExportProfile {
    pub profiles: Vec<ExportProfileItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CustomExportProfile {
    pub template: String,
    pub partials: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum ExportFileType {
    JSON,
    CSVNodes,
    CSVEdges,
    CSVChart,
    DOT,
    SVG,
    Custom(CustomExportProfile),
}

impl ExportFileType {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFileType::JSON => "JSON",
            ExportFileType::CSVNodes => "CSVNodes",
            ExportFileType::CSVEdges => "CSVEdges",
            ExportFileType::CSVChart => "CSVChart",
            ExportFileType::DOT => "DOT",
            ExportFileType::SVG => "SVG",
            ExportFileType::Custom(_) => "Custom",
        }
    }
}

impl Plan {
    /// Loads a plan from YAML (`.yaml`, `.yml`) or TOML (`.toml`) and
    /// validates it.
    pub fn load(path: &Path) -> PlanResult<Plan> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("")
            .to_lowercase();

        let mut plan: Plan = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => return Err(PlanError::UnsupportedFormat(path.display().to_string())),
        };
        plan.fill_defaults();
        plan.validate()?;
        Ok(plan)
    }

    /// The plan written by `init`.
    pub fn sample() -> Plan {
        Plan {
            meta: Some(Meta {
                name: Some("Sheet overview".to_string()),
            }),
            input: InputConfig {
                filename: "data.xlsx".to_string(),
            },
            view: ViewMode::Entity,
            palette: Some(DEFAULT_PALETTE.to_string()),
            palettes: default_palettes(),
            classification: ClassificationConfig::default(),
            transform: TransformConfig::default(),
            layout: LayoutConfig::default(),
            export: ExportProfile {
                profiles: vec![
                    ExportProfileItem {
                        filename: "out/graph.json".to_string(),
                        exporter: ExportFileType::JSON,
                    },
                    ExportProfileItem {
                        filename: "out/graph.svg".to_string(),
                        exporter: ExportFileType::SVG,
                    },
                ],
            },
        }
    }

    pub fn name(&self) -> String {
        match &self.meta {
            Some(Meta { name: Some(name) }) => name.clone(),
            _ => "Unnamed Sheet".to_string(),
        }
    }

    /// A plan without palettes gets the built-in ones.
    pub fn fill_defaults(&mut self) {
        if self.palettes.is_empty() {
            self.palettes = default_palettes();
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.palettes.is_empty() {
            return Err(PlanError::NoPalettes);
        }
        if let Some(palette) = self.palettes.iter().find(|p| p.colors.is_empty()) {
            return Err(PlanError::InvalidPalette(palette.name.clone()));
        }
        if let Some(selected) = &self.palette {
            if !self.palettes.iter().any(|p| &p.name == selected) {
                return Err(PlanError::PaletteNotFound(selected.clone()));
            }
        }
        if !(self.layout.radius.is_finite() && self.layout.radius > 0.0) {
            return Err(PlanError::InvalidValue {
                field: "layout.radius".to_string(),
                reason: format!("must be a positive number, got {}", self.layout.radius),
            });
        }
        if !(self.classification.numeric_ceiling > 0.0) {
            return Err(PlanError::InvalidValue {
                field: "classification.numeric_ceiling".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Index of the selected palette; the first palette when none is named.
    pub fn palette_index(&self) -> PlanResult<usize> {
        match &self.palette {
            None => Ok(0),
            Some(name) => self
                .palettes
                .iter()
                .position(|p| &p.name == name)
                .ok_or_else(|| PlanError::PaletteNotFound(name.clone())),
        }
    }
}
