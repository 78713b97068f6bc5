//! Wall and pillar placement for built rooms
//!
//! Every room owns its North and West edge. South and East edges are only
//! emitted on the outer boundary (no built room on the other side), so each
//! shared edge produces exactly one wall. An edge that is a doorway becomes two
//! jambs and a lintel; the lintel spans the gap overhead and never collides.

use glam::Vec2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::generator::{Cell, Direction};
use super::level::Room;
use crate::core::LevelConfig;
use crate::physics::Rect;

/// What a wall piece represents, for renderers and collision alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Solid full-length wall
    Slab,
    /// Wall segment beside a doorway
    Jamb,
    /// Beam above a doorway, visual only
    Lintel,
    /// Free-standing pillar inside a room
    Pillar,
}

/// A placed wall element with its floor footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPiece {
    pub kind: WallKind,
    pub footprint: Rect,
    /// Index of the room that owns the piece
    pub room: usize,
}

impl WallPiece {
    /// Whether the piece blocks movement
    #[must_use]
    pub fn collides(&self) -> bool {
        self.kind != WallKind::Lintel
    }
}

/// Geometry shared by every edge of a level
#[derive(Debug, Clone, Copy)]
struct EdgeStyle {
    half_room: f32,
    half_thickness: f32,
    half_door: f32,
}

/// Lay out walls and pillars for the given rooms.
#[must_use]
pub fn layout(rooms: &[Room], config: &LevelConfig) -> Vec<WallPiece> {
    let built: FxHashSet<Cell> = rooms.iter().map(Room::cell).collect();
    let style = EdgeStyle {
        half_room: config.room_size * 0.5,
        half_thickness: config.wall_thickness * 0.5,
        half_door: (config.door_width * 0.5).min(config.room_size * 0.5),
    };
    let pillar_offset = config.room_size * 0.5 - config.pillar_inset;
    let pillar_half = config.pillar_size * 0.5;

    let mut pieces = Vec::with_capacity(rooms.len() * 8);

    for (index, room) in rooms.iter().enumerate() {
        let center = room.center();
        let has_room = |dir: Direction| built.contains(&room.cell().step(dir));

        // Owned edges: a wall toward a non-built cell, a doorway toward a connected room.
        for dir in [Direction::North, Direction::West] {
            edge(&mut pieces, index, center, dir, room.openings.get(dir), style);
        }
        // Outer boundary only.
        for dir in [Direction::South, Direction::East] {
            if !has_room(dir) {
                edge(&mut pieces, index, center, dir, false, style);
            }
        }

        if pillar_half > 0.0 && pillar_offset > pillar_half {
            for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
                pieces.push(WallPiece {
                    kind: WallKind::Pillar,
                    footprint: Rect::square(
                        center.x + sx * pillar_offset,
                        center.y + sz * pillar_offset,
                        pillar_half,
                    ),
                    room: index,
                });
            }
        }
    }

    pieces
}

/// Emit the pieces of one room edge.
fn edge(
    pieces: &mut Vec<WallPiece>,
    room: usize,
    center: Vec2,
    dir: Direction,
    doorway: bool,
    style: EdgeStyle,
) {
    let EdgeStyle {
        half_room,
        half_thickness,
        half_door,
    } = style;

    // Position of the wall line and whether it runs along X.
    let (line, along_x, mid) = match dir {
        Direction::North => (center.y - half_room, true, center.x),
        Direction::South => (center.y + half_room, true, center.x),
        Direction::West => (center.x - half_room, false, center.y),
        Direction::East => (center.x + half_room, false, center.y),
    };
    // Extend by half a thickness so neighboring edges close the corners.
    let start = mid - half_room - half_thickness;
    let end = mid + half_room + half_thickness;

    let rect = |from: f32, to: f32| {
        if along_x {
            Rect::new(from, to, line - half_thickness, line + half_thickness)
        } else {
            Rect::new(line - half_thickness, line + half_thickness, from, to)
        }
    };

    if doorway {
        let segments = [
            (WallKind::Jamb, start, mid - half_door),
            (WallKind::Lintel, mid - half_door, mid + half_door),
            (WallKind::Jamb, mid + half_door, end),
        ];
        for (kind, from, to) in segments {
            if to > from {
                pieces.push(WallPiece {
                    kind,
                    footprint: rect(from, to),
                    room,
                });
            }
        }
    } else {
        pieces.push(WallPiece {
            kind: WallKind::Slab,
            footprint: rect(start, end),
            room,
        });
    }
}
