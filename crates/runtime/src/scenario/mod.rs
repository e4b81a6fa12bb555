//! Scenario system for park layout and agent placement.
//!
//! Scenarios describe the walkway network, where agents stand, and which of
//! them start a following behavior at which tick:
//! - Walkways come from plaza rectangles plus individually placed tiles
//! - Agents are named so starts can refer to their targets
//! - Tuning parameters fall back to [`FollowConfig::default`]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use park_core::{
    AgentKind, Direction, EdgeSet, EntitiesState, EntityRef, ErrorSeverity, FollowConfig,
    OracleError, ParkError, PathTile, TileCoord, Tick, WorldPoint,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::GridMap;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario RON")]
    Parse(#[from] ron::error::SpannedError),

    #[error("agent name '{0}' is used twice")]
    DuplicateAgent(String),

    #[error("agent '{agent}' refers to unknown agent '{target}'")]
    UnknownTarget { agent: String, target: String },

    #[error("agent '{0}' cannot follow itself")]
    SelfTarget(String),

    #[error(transparent)]
    Map(#[from] OracleError),
}

impl ParkError for ScenarioError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ScenarioError::Read { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ScenarioError::Read { .. } => "SCENARIO_READ",
            ScenarioError::Parse(_) => "SCENARIO_PARSE",
            ScenarioError::DuplicateAgent(_) => "SCENARIO_DUPLICATE_AGENT",
            ScenarioError::UnknownTarget { .. } => "SCENARIO_UNKNOWN_TARGET",
            ScenarioError::SelfTarget(_) => "SCENARIO_SELF_TARGET",
            ScenarioError::Map(error) => error.error_code(),
        }
    }
}

/// Flat, fully connected rectangle of walkway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlazaPlacement {
    pub min: TileCoord,
    pub max: TileCoord,
    #[serde(default)]
    pub height: i32,
}

/// Single walkway segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub tile: TileCoord,
    #[serde(default)]
    pub height: i32,
    pub edges: EdgeSet,
    #[serde(default)]
    pub slope: Option<Direction>,
    #[serde(default)]
    pub banners: Option<EdgeSet>,
}

impl TilePlacement {
    pub fn path(&self) -> PathTile {
        PathTile {
            edges: self.edges,
            base_height: self.height,
            slope: self.slope,
            banners: self.banners,
        }
    }
}

/// Following behavior an agent enters during the run. Targets are agent
/// names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialBehavior {
    Witness { target: String },
    FollowEntertainer { target: String },
    Chase { suspect: String },
}

impl InitialBehavior {
    fn target(&self) -> &str {
        match self {
            InitialBehavior::Witness { target } | InitialBehavior::FollowEntertainer { target } => {
                target
            }
            InitialBehavior::Chase { suspect } => suspect,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPlacement {
    pub name: String,
    pub kind: AgentKind,
    pub position: WorldPoint,
    #[serde(default)]
    pub facing: Direction,
    #[serde(default)]
    pub interest: Option<u8>,
    #[serde(default)]
    pub start: Option<InitialBehavior>,
    /// Tick at which `start` takes effect.
    #[serde(default)]
    pub start_tick: u64,
}

/// A start resolved to entity references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledStart {
    pub agent: EntityRef,
    pub kind: StartKind,
    pub at: Tick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartKind {
    Witness(EntityRef),
    FollowEntertainer(EntityRef),
    Chase(EntityRef),
}

/// Scenario configuration for park initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "Scenario::default_ticks")]
    pub ticks: u64,
    #[serde(default)]
    pub config: Option<FollowConfig>,
    #[serde(default)]
    pub walk_speed: Option<i32>,
    #[serde(default)]
    pub plazas: Vec<PlazaPlacement>,
    #[serde(default)]
    pub tiles: Vec<TilePlacement>,
    #[serde(default)]
    pub exits: Vec<WorldPoint>,
    #[serde(default)]
    pub litter: Vec<WorldPoint>,
    pub agents: Vec<AgentPlacement>,
}

impl Scenario {
    pub const DEFAULT_TICKS: u64 = 1000;

    fn default_ticks() -> u64 {
        Self::DEFAULT_TICKS
    }

    /// Parse a scenario from RON text.
    pub fn from_ron(content: &str) -> Result<Self, ScenarioError> {
        Ok(ron::from_str(content)?)
    }

    /// Load scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_ron(&content)?;
        tracing::info!(
            path = %path.display(),
            agents = scenario.agents.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    pub fn follow_config(&self) -> FollowConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Builds the walkway map, then registers exits on it.
    pub fn build_map(&self) -> Result<GridMap, ScenarioError> {
        let mut map = GridMap::new();
        for plaza in &self.plazas {
            map.fill_plaza(plaza.min, plaza.max, plaza.height)?;
        }
        for tile in &self.tiles {
            map.insert(tile.tile, tile.path())?;
        }
        for exit in &self.exits {
            map.add_exit(*exit)?;
        }
        tracing::debug!(segments = map.segment_count(), exits = map.exits().len(), "Built map");
        Ok(map)
    }

    /// Spawns every agent and litter item in placement order and resolves
    /// the scheduled starts.
    pub fn populate(
        &self,
        entities: &mut EntitiesState,
    ) -> Result<Vec<ScheduledStart>, ScenarioError> {
        let mut names: HashMap<&str, EntityRef> = HashMap::new();
        let mut handles = Vec::with_capacity(self.agents.len());
        for placement in &self.agents {
            let handle = entities.spawn_agent(placement.kind, placement.position);
            handles.push(handle);
            if let Some(agent) = entities.agent_mut(handle.id) {
                agent.facing = placement.facing;
                if let Some(interest) = placement.interest {
                    agent.follow.entertainer_interest = interest;
                }
            }
            if names.insert(placement.name.as_str(), handle).is_some() {
                return Err(ScenarioError::DuplicateAgent(placement.name.clone()));
            }
        }
        for position in &self.litter {
            entities.spawn_litter(*position);
        }

        let mut starts = Vec::new();
        for (placement, &agent) in self.agents.iter().zip(&handles) {
            let Some(start) = &placement.start else {
                continue;
            };
            let target_name = start.target();
            if target_name == placement.name {
                return Err(ScenarioError::SelfTarget(placement.name.clone()));
            }
            let target = names.get(target_name).copied().ok_or_else(|| {
                ScenarioError::UnknownTarget {
                    agent: placement.name.clone(),
                    target: target_name.to_string(),
                }
            })?;
            let kind = match start {
                InitialBehavior::Witness { .. } => StartKind::Witness(target),
                InitialBehavior::FollowEntertainer { .. } => StartKind::FollowEntertainer(target),
                InitialBehavior::Chase { .. } => StartKind::Chase(target),
            };
            starts.push(ScheduledStart {
                agent,
                kind,
                at: Tick(placement.start_tick),
            });
        }

        tracing::info!(
            agents = self.agents.len(),
            litter = self.litter.len(),
            starts = starts.len(),
            "Populated park"
        );
        Ok(starts)
    }
}
