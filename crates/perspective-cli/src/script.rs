use anyhow::{Context, Result};
use perspective_core::geom::CanvasSize;
use perspective_scene::events::SceneEvent;
use perspective_scene::snapshot::SceneSnapshot;
use perspective_scene::Scene;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplayScript {
    Events(Vec<SceneEvent>),
    Session {
        #[serde(default)]
        canvas: Option<CanvasSize>,
        events: Vec<SceneEvent>,
    },
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("read script: {path:?}"))?;
        serde_json::from_str(&text).with_context(|| format!("parse script: {path:?}"))
    }

    pub fn canvas(&self) -> Option<CanvasSize> {
        match self {
            Self::Events(_) => None,
            Self::Session { canvas, .. } => *canvas,
        }
    }

    pub fn events(&self) -> &[SceneEvent] {
        match self {
            Self::Events(events) | Self::Session { events, .. } => events,
        }
    }
}

pub fn replay(scene: &mut Scene, events: &[SceneEvent], every_step: bool) -> Result<Vec<SceneSnapshot>> {
    let mut frames = Vec::new();
    for (index, event) in events.iter().enumerate() {
        debug!(index, ?event, "apply");
        scene
            .apply_event(event)
            .with_context(|| format!("event #{index}"))?;
        if every_step {
            frames.push(scene.snapshot());
        }
    }
    if !every_step {
        frames.push(scene.snapshot());
    }
    info!(events = events.len(), "replay finished");
    Ok(frames)
}
