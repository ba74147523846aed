//! Rectangle geometry for the playfield
//!
//! Everything is emitted in playfield coordinates; the pipeline maps them to
//! clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::flow::GamePhase;
use crate::sim::{Aabb, Obstacle};
use crate::ui::{self, ButtonStyle, Screen};

/// Border thickness for obstacle segments
const OBSTACLE_BORDER: f32 = 4.0;
/// Border thickness for the body
const BODY_BORDER: f32 = 2.0;
/// Highlight ring on a selected button
const SELECTED_BORDER: f32 = 3.0;

/// Two triangles covering `rect`
pub fn rect(rect: &Aabb, color: [f32; 4]) -> [Vertex; 6] {
    let (min, max) = (rect.min, rect.max);
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Filled rectangle with a border drawn inside its edges
pub fn bordered_rect(out: &mut Vec<Vertex>, r: &Aabb, fill: [f32; 4], border: [f32; 4], width: f32) {
    if r.width() <= 0.0 || r.height() <= 0.0 {
        return;
    }
    out.extend_from_slice(&rect(r, border));
    let inset = Vec2::splat(width.min(r.width() / 2.0).min(r.height() / 2.0));
    let inner = Aabb {
        min: r.min + inset,
        max: r.max - inset,
    };
    out.extend_from_slice(&rect(&inner, fill));
}

/// Top and bottom segments of an obstacle
pub fn obstacle(out: &mut Vec<Vertex>, ob: &Obstacle) {
    bordered_rect(out, &ob.top_aabb(), colors::OBSTACLE, colors::OBSTACLE_BORDER, OBSTACLE_BORDER);
    bordered_rect(out, &ob.bottom_aabb(), colors::OBSTACLE, colors::OBSTACLE_BORDER, OBSTACLE_BORDER);
}

pub fn button_color(style: ButtonStyle) -> [f32; 4] {
    match style {
        ButtonStyle::Go => colors::BUTTON_GO,
        ButtonStyle::Caution => colors::BUTTON_CAUTION,
        ButtonStyle::Danger => colors::BUTTON_DANGER,
        ButtonStyle::Neutral => colors::BUTTON_NEUTRAL,
    }
}

/// Full frame: sky, obstacles, body, then menu chrome
pub fn scene(screen: &Screen) -> Vec<Vertex> {
    let view = &screen.view;
    let mut out = Vec::with_capacity(64 + view.obstacles.len() * 24);

    let sky = Aabb::new(0.0, 0.0, crate::consts::PLAYFIELD_WIDTH, crate::consts::PLAYFIELD_HEIGHT);
    out.extend_from_slice(&rect(&sky, colors::SKY));

    for ob in view.obstacles {
        obstacle(&mut out, ob);
    }
    bordered_rect(&mut out, &view.body, colors::BODY, colors::BODY_BORDER, BODY_BORDER);

    if !view.phase.is_playing() {
        out.extend_from_slice(&rect(&sky, colors::SCRIM));
    }
    if let GamePhase::CreateProfile { .. } = view.phase {
        let field = Aabb::new(crate::consts::PLAYFIELD_WIDTH / 2.0 - 110.0, 192.0, 220.0, 36.0);
        out.extend_from_slice(&rect(&field, colors::INPUT_BOX));
    }
    for button in ui::buttons(screen) {
        let fill = button_color(button.style);
        if button.selected {
            bordered_rect(&mut out, &button.rect, fill, colors::BUTTON_SELECTED, SELECTED_BORDER);
        } else {
            out.extend_from_slice(&rect(&button.rect, fill));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Command, Game};
    use crate::persistence::MemoryStorage;
    use crate::profiles::ProfileStore;
    use crate::sim::Difficulty;

    #[test]
    fn test_rect_covers_corners() {
        let r = Aabb::new(1.0, 2.0, 3.0, 4.0);
        let v = rect(&r, [1.0; 4]);
        assert!(v.iter().any(|v| v.position == [1.0, 2.0]));
        assert!(v.iter().any(|v| v.position == [4.0, 6.0]));
    }

    #[test]
    fn test_degenerate_rect_skipped() {
        let mut out = Vec::new();
        bordered_rect(&mut out, &Aabb::new(0.0, 0.0, 10.0, 0.0), [1.0; 4], [0.0; 4], 2.0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_scene_while_playing() {
        let mut game = Game::new(1, ProfileStore::load(MemoryStorage::new()), false);
        game.handle_input(Command::ChooseDifficulty(Difficulty::Hard));
        game.tick(1600.0);
        assert_eq!(game.sim().obstacles.len(), 1);

        let vertices = scene(&Screen::of(&game));
        // sky + 2 obstacle segments (border + fill each) + body (border + fill)
        assert_eq!(vertices.len(), 6 * (1 + 4 + 2));
    }

    #[test]
    fn test_scene_menu_has_buttons() {
        let game = Game::new(1, ProfileStore::load(MemoryStorage::new()), false);
        let vertices = scene(&Screen::of(&game));
        // sky + body + scrim + three difficulty buttons, one of them ringed
        assert_eq!(vertices.len(), 6 * (1 + 2 + 1 + 4));
    }

    #[test]
    fn test_selected_difficulty_is_ringed() {
        let game = Game::new(1, ProfileStore::load(MemoryStorage::new()), false)
            .with_difficulty(Difficulty::Easy);
        let vertices = scene(&Screen::of(&game));
        let ring: Vec<&Vertex> = vertices
            .iter()
            .filter(|v| v.color == colors::BUTTON_SELECTED)
            .collect();
        assert_eq!(ring.len(), 6);
        // Easy is the leftmost button
        assert!(ring.iter().all(|v| v.position[0] <= 120.0));
    }
}
