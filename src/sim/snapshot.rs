//! Read-only views handed to render, HUD and submission collaborators

use serde::{Deserialize, Serialize};

use super::state::{
    Enemy, EnemyKind, FinalResult, GamePhase, GameState, Platform, PlatformKind, PowerUp,
};

/// Player pose and visual flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub facing: i8,
    pub jetpack_active: bool,
    pub shield_active: bool,
    /// Looking up at a target (auto-fire engaged)
    pub shooting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    pub id: u32,
    pub kind: PlatformKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub broken: bool,
    pub break_progress: f32,
    pub spring_active: bool,
    pub power_up: Option<PowerUp>,
}

impl From<&Platform> for PlatformView {
    fn from(p: &Platform) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            x: p.pos.x,
            y: p.pos.y,
            w: p.size.x,
            h: p.size.y,
            broken: p.broken,
            break_progress: p.break_progress,
            spring_active: p.spring_armed(),
            power_up: p.power_up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub flipped: bool,
}

impl From<&Enemy> for EnemyView {
    fn from(e: &Enemy) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            x: e.pos.x,
            y: e.pos.y,
            w: e.size.x,
            h: e.size.y,
            flipped: e.flipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// HUD numbers, refreshed every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub level: u32,
    pub elapsed_seconds: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub aerial_enemies: Vec<EnemyView>,
    pub ground_enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub hud: HudSnapshot,
    pub final_result: Option<FinalResult>,
}

impl WorldSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                w: player.size.x,
                h: player.size.y,
                facing: player.facing,
                jetpack_active: player.has_jetpack(),
                shield_active: player.has_shield(),
                shooting: state.engaging,
            },
            platforms: state.platforms.iter().map(PlatformView::from).collect(),
            aerial_enemies: state.aerial_enemies.iter().map(EnemyView::from).collect(),
            ground_enemies: state.ground_enemies.iter().map(EnemyView::from).collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    x: p.pos.x,
                    y: p.pos.y,
                    w: p.size.x,
                    h: p.size.y,
                })
                .collect(),
            hud: state.hud(),
            final_result: state.final_result,
        }
    }
}

impl GameState {
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.run.score,
            level: self.level(),
            elapsed_seconds: self.run.elapsed_seconds(),
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeviceClass;

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = GameState::new(3, DeviceClass::Tablet);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Ready);
        assert_eq!(snapshot.platforms.len(), state.platforms.len());
        assert_eq!(snapshot.platforms[0].kind, PlatformKind::Normal);
        assert_eq!(snapshot.player.y, state.player.pos.y);
        assert_eq!(snapshot.hud, HudSnapshot { score: 0, level: 1, elapsed_seconds: 0 });
        assert!(snapshot.final_result.is_none());

        for (view, platform) in snapshot.platforms.iter().zip(&state.platforms) {
            assert_eq!(view.spring_active, platform.kind == PlatformKind::Bouncy);
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3, DeviceClass::Desktop);
        let json = serde_json::to_string(&state.hud()).unwrap();
        assert_eq!(json, r#"{"score":0,"level":1,"elapsed_seconds":0}"#);
        assert!(serde_json::to_string(&state.snapshot()).is_ok());
    }
}
