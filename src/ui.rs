//! HUD model
//!
//! Labels and sprites the renderer should draw on top of the playfield, laid
//! out in field coordinates (y-up). Rebuilt from a snapshot each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, Snapshot};

/// Draw order of HUD labels (obstacles sit at 1)
pub const LABEL_Z: i32 = 5;
/// Draw order of buttons, above labels
pub const BUTTON_Z: i32 = 6;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TAP_TO_PLAY_COLOR: [f32; 4] = [63.0 / 255.0, 79.0 / 255.0, 145.0 / 255.0, 1.0];

/// Which HUD element a label or sprite is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Score,
    HighScore,
    TapToPlay,
    Logo,
    PauseButton,
    /// Pause button while paused (shows "play")
    ResumeButton,
    RestartButton,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub element: Element,
    pub text: String,
    pub pos: Vec2,
    pub font: &'static str,
    pub font_size: f32,
    pub color: [f32; 4],
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub element: Element,
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
    pub z: i32,
}

impl Sprite {
    /// Point inside the sprite's rectangle (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.pos).abs();
        d.x <= self.size.x / 2.0 && d.y <= self.size.y / 2.0
    }
}

/// What a tap at some point means in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Start,
    Flap,
    Pause,
    Resume,
    Restart,
    Ignore,
}

/// Everything the HUD shows this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub labels: Vec<Label>,
    pub sprites: Vec<Sprite>,
}

impl Hud {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let (w, h) = (snapshot.field.x, snapshot.field.y);
        let center = Vec2::new(w / 2.0, h / 2.0);
        let mut labels = Vec::new();
        let mut sprites = Vec::new();

        labels.push(Label {
            element: Element::HighScore,
            text: format!("Highest Score: {}", snapshot.high_score),
            pos: Vec2::new(w - 80.0, h - 22.0),
            font: "Helvetica-Bold",
            font_size: 15.0,
            color: WHITE,
            z: LABEL_Z,
        });

        match snapshot.phase {
            GamePhase::Idle => {
                sprites.push(Sprite {
                    element: Element::Logo,
                    pos: center + Vec2::new(0.0, 100.0),
                    size: Vec2::new(272.0, 65.0),
                    z: LABEL_Z,
                });
                labels.push(Label {
                    element: Element::TapToPlay,
                    text: "Tap anywhere to play".to_string(),
                    pos: center - Vec2::new(0.0, 100.0),
                    font: "HelveticaNeue",
                    font_size: 20.0,
                    color: TAP_TO_PLAY_COLOR,
                    z: LABEL_Z,
                });
            }
            GamePhase::Running | GamePhase::Paused => {
                labels.push(score_label(snapshot));
                let element = if snapshot.phase == GamePhase::Paused {
                    Element::ResumeButton
                } else {
                    Element::PauseButton
                };
                sprites.push(Sprite {
                    element,
                    pos: Vec2::new(w - 30.0, 30.0),
                    size: Vec2::new(40.0, 40.0),
                    z: BUTTON_Z,
                });
            }
            GamePhase::GameOver => {
                labels.push(score_label(snapshot));
                sprites.push(Sprite {
                    element: Element::RestartButton,
                    pos: center,
                    size: Vec2::new(100.0, 100.0),
                    z: BUTTON_Z,
                });
            }
        }

        Self {
            phase: snapshot.phase,
            labels,
            sprites,
        }
    }

    pub fn label(&self, element: Element) -> Option<&Label> {
        self.labels.iter().find(|l| l.element == element)
    }

    pub fn sprite(&self, element: Element) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.element == element)
    }

    /// Buttons take the tap first; elsewhere a tap starts or flaps
    pub fn tap_action(&self, point: Vec2) -> TapAction {
        let button = self
            .sprites
            .iter()
            .filter(|s| s.z == BUTTON_Z && s.contains(point))
            .map(|s| s.element)
            .next();

        match (self.phase, button) {
            (GamePhase::Idle, _) => TapAction::Start,
            (GamePhase::Running, Some(Element::PauseButton)) => TapAction::Pause,
            (GamePhase::Running, _) => TapAction::Flap,
            (GamePhase::Paused, Some(Element::ResumeButton)) => TapAction::Resume,
            (GamePhase::GameOver, Some(Element::RestartButton)) => TapAction::Restart,
            _ => TapAction::Ignore,
        }
    }
}

fn score_label(snapshot: &Snapshot) -> Label {
    let (w, h) = (snapshot.field.x, snapshot.field.y);
    Label {
        element: Element::Score,
        text: snapshot.score.to_string(),
        pos: Vec2::new(w / 2.0, h / 2.0 + h / 2.6),
        font: "HelveticaNeue-Bold",
        font_size: 50.0,
        color: WHITE,
        z: LABEL_Z,
    }
}
