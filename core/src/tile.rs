use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::Direction;

bitflags! {
    /// Authored links from a block cell to its orthogonal neighbours.
    ///
    /// The raw bits follow the packed code: Up, Right, Down, Left from the most significant
    /// of the four bits down.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Connection: u8 {
        const UP = 0b1000;
        const RIGHT = 0b0100;
        const DOWN = 0b0010;
        const LEFT = 0b0001;
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::empty()
    }
}

impl Connection {
    pub const fn of(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Right => Self::RIGHT,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
        }
    }

    pub fn toward(self, direction: Direction) -> bool {
        self.contains(Self::of(direction))
    }

    pub fn from_code(code: u8) -> Self {
        Self::from_bits_truncate(code)
    }

    pub const fn code(self) -> u8 {
        self.bits()
    }
}

pub fn encode_connection(up: bool, right: bool, down: bool, left: bool) -> u8 {
    [up, right, down, left]
        .into_iter()
        .fold(0, |code, connected| (code << 1) | u8::from(connected))
}

/// Packs a `[up, right, down, left]` slice, degrading to `0` for any other length.
pub fn encode_connection_slice(connected: &[bool]) -> u8 {
    match *connected {
        [up, right, down, left] => encode_connection(up, right, down, left),
        _ => {
            log::warn!(
                "encode_connection_slice: expected 4 flags, got {}",
                connected.len()
            );
            0
        }
    }
}

pub fn decode_connection(mut code: u8) -> [bool; 4] {
    let mut connected = [false; 4];
    for slot in connected.iter_mut().rev() {
        *slot = code & 1 != 0;
        code >>= 1;
    }
    connected
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    None,
    Block,
    /// Destroyed by a teleport during the current turn, cleared on the next move.
    Crumb,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCell {
    kind: BlockKind,
    connection: Connection,
}

impl BlockCell {
    pub const EMPTY: Self = Self {
        kind: BlockKind::None,
        connection: Connection::empty(),
    };

    pub const CRUMB: Self = Self {
        kind: BlockKind::Crumb,
        connection: Connection::empty(),
    };

    pub const fn block(connection: Connection) -> Self {
        Self {
            kind: BlockKind::Block,
            connection,
        }
    }

    /// Builds a cell from stored parts, dropping the connection for non-block kinds.
    pub const fn from_parts(kind: BlockKind, connection: Connection) -> Self {
        match kind {
            BlockKind::Block => Self::block(connection),
            BlockKind::None => Self::EMPTY,
            BlockKind::Crumb => Self::CRUMB,
        }
    }

    pub const fn kind(self) -> BlockKind {
        self.kind
    }

    pub const fn connection(self) -> Connection {
        self.connection
    }

    pub const fn has_block(self) -> bool {
        matches!(self.kind, BlockKind::Block)
    }

    pub const fn is_crumb(self) -> bool {
        matches!(self.kind, BlockKind::Crumb)
    }

    pub fn is_connected(self, direction: Direction) -> bool {
        self.has_block() && self.connection.toward(direction)
    }
}
