//! Frame encoding and decoding.
//!
//! ## Frame Layout
//!
//! ```text
//! opcode: u8 | length: u16 (whole frame) | payload
//! ```
//!
//! All integers are little-endian. Payloads:
//!
//! | message  | payload                                                     |
//! |----------|-------------------------------------------------------------|
//! | `start`  | receiver-first `u8`, config block                           |
//! | `config` | config block                                                |
//! | `setup`  | packed tiles, 10 × `u16` piece counts, `u16` per piece tile |
//! | `move`   | piece `u16`, tile `u16`                                     |
//! | `kill`   | piece `u16`                                                 |
//! | `breach` | tile `u16`, flag `u8`                                       |
//! | `tile`   | tile `u16`, type `u8`                                       |
//! | `record` | status `u8`, actor `u16`, count `u16`, `u16` per protection |
//!
//! Packed tiles hold two 3-bit tile codes per byte, low nibble first.
//! A protection entry is the piece index in the low 15 bits and the
//! protection kind in the high bit (set = total).

use crate::core::{Actions, Config, PieceId, PieceTypeSet, Protection, RecordInfo, TileId, TileType, PIECE_KINDS};
use crate::error::{ProtocolError, ProtocolResult};

use super::message::{opcode, Message, RecordFrame, SetupFrame, WireBounds, CONFIG_DATA_SIZE, HEADER_SIZE, NONE_INDEX};

const TOTAL_BIT: u16 = 0x8000;
const INDEX_MASK: u16 = 0x7FFF;

const FLAG_DRAGON_DIAG: u8 = 0x01;
const FLAG_MULTISTAGE: u8 = 0x02;
const FLAG_FIRST_TURN_ENGAGE: u8 = 0x04;
const FLAG_SHIFT_LEFT: u8 = 0x08;
const FLAG_SHIFT_NEAR: u8 = 0x10;

/// Growable frame buffer. The length field is patched in by `finish`.
struct FrameWriter {
    buffer: Vec<u8>,
}

impl FrameWriter {
    fn new(opcode: u8) -> Self {
        let mut buffer = Vec::with_capacity(16);
        buffer.push(opcode);
        buffer.extend_from_slice(&[0, 0]);
        Self { buffer }
    }

    fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn finish(mut self) -> Vec<u8> {
        // Frames are bounded by the config limits, far below u16::MAX.
        let len = self.buffer.len() as u16;
        self.buffer[1..3].copy_from_slice(&len.to_le_bytes());
        self.buffer
    }
}

/// Cursor over a received frame.
struct FrameReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> FrameReader<'a> {
    fn new(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    fn take(&mut self, n: usize) -> ProtocolResult<&'a [u8]> {
        let end = self.position + n;
        let slice = self.data.get(self.position..end).ok_or(ProtocolError::Truncated {
            needed: end,
            available: self.data.len(),
        })?;
        self.position = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> ProtocolResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> ProtocolResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }
}

/// Encode a message into a complete frame.
#[must_use]
pub fn encode(message: &Message) -> Vec<u8> {
    let mut w = FrameWriter::new(message.opcode());
    match message {
        Message::Start { receiver_first, config } => {
            w.write_u8(u8::from(*receiver_first));
            w.write_bytes(&encode_config(config));
        }
        Message::Config(config) => w.write_bytes(&encode_config(config)),
        Message::Setup(frame) => encode_setup(&mut w, frame),
        Message::Move { piece, tile } => {
            w.write_u16(piece.raw());
            w.write_u16(tile.raw());
        }
        Message::Kill { piece } => w.write_u16(piece.raw()),
        Message::Breach { tile, breached } => {
            w.write_u16(tile.raw());
            w.write_u8(u8::from(*breached));
        }
        Message::Tile { tile, tile_type } => {
            w.write_u16(tile.raw());
            w.write_u8(tile_type.code());
        }
        Message::Record(frame) => {
            w.write_u8(frame.actions.bits() | frame.info.bit());
            w.write_u16(frame.actor.map_or(NONE_INDEX, PieceId::raw));
            w.write_u16(frame.protects.len() as u16);
            for &(piece, protection) in &frame.protects {
                let kind = if protection == Protection::Total { TOTAL_BIT } else { 0 };
                w.write_u16((piece.raw() & INDEX_MASK) | kind);
            }
        }
    }
    w.finish()
}

fn encode_setup(w: &mut FrameWriter, frame: &SetupFrame) {
    let codes: Vec<u8> = frame.tiles.iter().chain(frame.middle.iter()).map(|t| t.code()).collect();
    for pair in codes.chunks(2) {
        let high = pair.get(1).copied().unwrap_or(0);
        w.write_u8(pair[0] | (high << 4));
    }
    for &count in &frame.counts {
        w.write_u16(count);
    }
    for pos in &frame.positions {
        w.write_u16(pos.map_or(NONE_INDEX, TileId::raw));
    }
}

/// Encode a config into its fixed-size block.
#[must_use]
pub fn encode_config(config: &Config) -> [u8; CONFIG_DATA_SIZE] {
    let mut w = FrameWriter { buffer: Vec::with_capacity(CONFIG_DATA_SIZE) };
    w.write_u16(config.home_width);
    w.write_u16(config.home_height);
    w.write_u8(config.battle_pass);
    w.write_u8(config.survival_pass);
    w.write_u16(config.favor_limit);
    w.write_u16(config.favor_max);
    w.write_u8(config.dragon_dist);

    let mut flags = 0;
    for (on, bit) in [
        (config.dragon_diag, FLAG_DRAGON_DIAG),
        (config.multistage, FLAG_MULTISTAGE),
        (config.first_turn_engage, FLAG_FIRST_TURN_ENGAGE),
        (config.shift_left, FLAG_SHIFT_LEFT),
        (config.shift_near, FLAG_SHIFT_NEAR),
    ] {
        if on {
            flags |= bit;
        }
    }
    w.write_u8(flags);

    for &n in config.tile_amounts.iter().chain(&config.middle_amounts).chain(&config.piece_amounts) {
        w.write_u16(n);
    }
    w.write_u16(config.win_fortress);
    w.write_u16(config.win_throne);
    w.write_u16(config.capturers.bits());

    let mut block = [0u8; CONFIG_DATA_SIZE];
    block.copy_from_slice(&w.buffer);
    block
}

/// Decode a config block. The block must already be normalized.
pub fn decode_config(block: &[u8]) -> ProtocolResult<Config> {
    let mut r = FrameReader::new(block, 0);
    let mut config = Config {
        home_width: r.read_u16()?,
        home_height: r.read_u16()?,
        battle_pass: r.read_u8()?,
        survival_pass: r.read_u8()?,
        favor_limit: r.read_u16()?,
        favor_max: r.read_u16()?,
        dragon_dist: r.read_u8()?,
        ..Config::default()
    };
    let flags = r.read_u8()?;
    config.dragon_diag = flags & FLAG_DRAGON_DIAG != 0;
    config.multistage = flags & FLAG_MULTISTAGE != 0;
    config.first_turn_engage = flags & FLAG_FIRST_TURN_ENGAGE != 0;
    config.shift_left = flags & FLAG_SHIFT_LEFT != 0;
    config.shift_near = flags & FLAG_SHIFT_NEAR != 0;

    for slot in config.tile_amounts.iter_mut() {
        *slot = r.read_u16()?;
    }
    for slot in config.middle_amounts.iter_mut() {
        *slot = r.read_u16()?;
    }
    for slot in config.piece_amounts.iter_mut() {
        *slot = r.read_u16()?;
    }
    config.win_fortress = r.read_u16()?;
    config.win_throne = r.read_u16()?;
    config.capturers = PieceTypeSet::from_bits(r.read_u16()?);

    let mut checked = config.clone();
    checked.check_values();
    if checked != config {
        return Err(ProtocolError::InvalidConfig);
    }
    Ok(config)
}

/// Decode one complete frame, checking every index against `bounds`.
pub fn decode(frame: &[u8], bounds: &WireBounds) -> ProtocolResult<Message> {
    if frame.len() < HEADER_SIZE {
        return Err(ProtocolError::Truncated {
            needed: HEADER_SIZE,
            available: frame.len(),
        });
    }
    let op = frame[0];
    let declared = usize::from(u16::from_le_bytes([frame[1], frame[2]]));
    if declared != frame.len() {
        return Err(ProtocolError::LengthMismatch {
            opcode: op,
            declared,
            actual: frame.len(),
        });
    }

    let mut r = FrameReader::new(frame, HEADER_SIZE);
    let message = match op {
        opcode::START => {
            let receiver_first = r.read_u8()? != 0;
            let config = decode_config(r.take(CONFIG_DATA_SIZE)?)?;
            Message::Start { receiver_first, config }
        }
        opcode::CONFIG => Message::Config(decode_config(r.take(CONFIG_DATA_SIZE)?)?),
        opcode::SETUP => Message::Setup(decode_setup(&mut r, bounds)?),
        opcode::MOVE => Message::Move {
            piece: read_piece(&mut r, bounds)?,
            tile: read_tile(&mut r, bounds)?,
        },
        opcode::KILL => Message::Kill {
            piece: read_piece(&mut r, bounds)?,
        },
        opcode::BREACH => Message::Breach {
            tile: read_tile(&mut r, bounds)?,
            breached: r.read_u8()? != 0,
        },
        opcode::TILE => {
            let tile = read_tile(&mut r, bounds)?;
            let code = r.read_u8()?;
            let tile_type = TileType::from_code(code).ok_or(ProtocolError::InvalidTileType(code))?;
            Message::Tile { tile, tile_type }
        }
        opcode::RECORD => Message::Record(decode_record(&mut r, bounds)?),
        other => return Err(ProtocolError::UnknownOpcode(other)),
    };

    if r.remaining() != 0 {
        return Err(ProtocolError::LengthMismatch {
            opcode: op,
            declared,
            actual: r.position,
        });
    }
    Ok(message)
}

fn read_piece(r: &mut FrameReader<'_>, bounds: &WireBounds) -> ProtocolResult<PieceId> {
    let index = r.read_u16()?;
    check_piece(index, bounds)
}

fn check_piece(index: u16, bounds: &WireBounds) -> ProtocolResult<PieceId> {
    if index >= bounds.pieces {
        return Err(ProtocolError::PieceOutOfRange {
            index,
            count: bounds.pieces,
        });
    }
    Ok(PieceId::new(index))
}

fn read_tile(r: &mut FrameReader<'_>, bounds: &WireBounds) -> ProtocolResult<TileId> {
    let index = r.read_u16()?;
    if index >= bounds.tiles {
        return Err(ProtocolError::TileOutOfRange {
            index,
            count: bounds.tiles,
        });
    }
    Ok(TileId::new(index))
}

fn decode_record(r: &mut FrameReader<'_>, bounds: &WireBounds) -> ProtocolResult<RecordFrame> {
    let status = r.read_u8()?;
    let info = RecordInfo::from_status(status).ok_or(ProtocolError::InvalidStatus(status))?;
    let actor = match r.read_u16()? {
        NONE_INDEX => None,
        index => Some(check_piece(index, bounds)?),
    };
    let count = r.read_u16()?;
    let mut protects = Vec::with_capacity(usize::from(count).min(r.remaining() / 2));
    for _ in 0..count {
        let entry = r.read_u16()?;
        let protection = if entry & TOTAL_BIT != 0 { Protection::Total } else { Protection::ExceptThrone };
        protects.push((check_piece(entry & INDEX_MASK, bounds)?, protection));
    }
    Ok(RecordFrame {
        actions: Actions::from_bits(status),
        info,
        actor,
        protects,
    })
}

fn decode_setup(r: &mut FrameReader<'_>, bounds: &WireBounds) -> ProtocolResult<SetupFrame> {
    let packed = r.take(bounds.packed_tiles_size())?;
    let total = usize::from(bounds.home) + usize::from(bounds.width);
    let mut codes = Vec::with_capacity(total);
    for i in 0..total {
        let byte = packed[i / 2];
        let code = if i % 2 == 0 { byte & 0x0F } else { byte >> 4 };
        codes.push(TileType::from_code(code).ok_or(ProtocolError::InvalidTileType(code))?);
    }
    let middle = codes.split_off(usize::from(bounds.home));

    let mut counts = [0u16; PIECE_KINDS];
    for slot in &mut counts {
        *slot = r.read_u16()?;
    }
    let per_side = bounds.pieces / 2;
    let got: u32 = counts.iter().map(|&n| u32::from(n)).sum();
    if got != u32::from(per_side) {
        return Err(ProtocolError::PieceCountMismatch { expected: per_side, got });
    }

    let mut positions = Vec::with_capacity(usize::from(per_side));
    for _ in 0..per_side {
        positions.push(match r.read_u16()? {
            NONE_INDEX => None,
            index if index < bounds.home => Some(TileId::new(index)),
            index => {
                return Err(ProtocolError::TileOutOfRange {
                    index,
                    count: bounds.home,
                })
            }
        });
    }

    Ok(SetupFrame {
        tiles: codes,
        middle,
        counts,
        positions,
    })
}
