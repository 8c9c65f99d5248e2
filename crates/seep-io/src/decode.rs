use std::{fs::File, io::{self, BufReader, Read}, path::PathBuf};

use glam::DVec2;
use ndarray::{Array2, ShapeError};
use seep_cells::CellKind;
use thiserror::Error;

use crate::{as_bytes::AsBytes, encode::FrameEncoder, FLUID_TAG, SOLID_TAG};

/// Reads back a recording made by [`FrameEncoder`]. Frames are snapshots for playback and
/// inspection only.
pub struct FrameDecoder {
    /// The path to the directory in which the frames reside.
    path: PathBuf,
    rows: usize,
    columns: usize,
    num_frames: u64,
    current_frame: u64,
}

impl FrameDecoder {
    pub fn new(path: PathBuf) -> FrameDecoder {
        Self {
            path,
            rows: 0,
            columns: 0,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn read_section<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R, expected: usize) -> Result<Vec<T>, DecodingError> {
        let len = Self::read_value::<8, u64, _>(reader)? as usize;
        if len != expected {
            return Err(DecodingError::SectionLength { expected, found: len });
        }

        let size = N.checked_mul(len).ok_or(DecodingError::SectionTooLarge(len))?;

        // Grows only with the bytes present in the file.
        let mut bytes = Vec::new();
        reader.by_ref().take(size as u64).read_to_end(&mut bytes)?;
        if bytes.len() != size {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        Ok(bytes.chunks_exact(N).map(|chunk| {
            let mut b = [0; N];
            b.copy_from_slice(chunk);
            T::from_bytes(b)
        }).collect())
    }

    pub fn decode_metadata(&mut self) -> Result<RecordingMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let rows = Self::read_value::<4, u32, _>(&mut reader)?;
        let columns = Self::read_value::<4, u32, _>(&mut reader)?;
        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;

        self.rows = rows as usize;
        self.columns = columns as usize;
        self.num_frames = num_frames;

        Ok(RecordingMetadata {
            rows,
            columns,
            fps,
            num_frames,
        })
    }

    /// Decodes the next frame, or `None` once every recorded frame has been read. Call
    /// [`FrameDecoder::decode_metadata`] first.
    pub fn decode_frame(&mut self) -> Result<Option<FrameData>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None)
        }

        let path = self.path.join(FrameEncoder::frame_name(self.num_frames, self.current_frame));
        let mut reader = BufReader::new(File::open(path)?);
        let shape = (self.rows, self.columns);
        let n = self.rows.checked_mul(self.columns).ok_or(DecodingError::TooLarge {
            rows: self.rows,
            columns: self.columns,
        })?;

        let kinds = Self::read_section::<1, u8, _>(&mut reader, n)?
            .into_iter()
            .map(|tag| match tag {
                FLUID_TAG => Ok(CellKind::Fluid),
                SOLID_TAG => Ok(CellKind::Solid),
                other => Err(DecodingError::UnknownKind(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let fills = Self::read_section::<8, f64, _>(&mut reader, n)?;
        let velocities = Self::read_section::<16, DVec2, _>(&mut reader, n)?;

        self.current_frame += 1;

        Ok(Some(FrameData {
            kinds: Array2::from_shape_vec(shape, kinds)?,
            fills: Array2::from_shape_vec(shape, fills)?,
            velocities: Array2::from_shape_vec(shape, velocities)?,
        }))
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingMetadata {
    pub rows: u32,
    pub columns: u32,
    pub fps: u32,
    pub num_frames: u64,
}

/// One recorded frame, every array indexed by `(row, column)`.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub kinds: Array2<CellKind>,
    pub fills: Array2<f64>,
    pub velocities: Array2<DVec2>,
}

impl FrameData {
    pub fn total_fill(&self) -> f64 {
        self.kinds
            .iter()
            .zip(self.fills.iter())
            .filter(|(k, _)| **k == CellKind::Fluid)
            .map(|(_, &f)| f)
            .sum()
    }

    pub fn max_fill(&self) -> f64 {
        self.fills.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_speed(&self) -> f64 {
        self.kinds
            .iter()
            .zip(self.velocities.iter())
            .filter(|(k, _)| **k == CellKind::Fluid)
            .map(|(_, v)| v.length())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("section holds {found} cells, expected {expected}")]
    SectionLength { expected: usize, found: usize },
    #[error("recording of {rows}x{columns} cells is too large")]
    TooLarge { rows: usize, columns: usize },
    #[error("section of {0} cells is too large")]
    SectionTooLarge(usize),
    #[error("unknown cell kind tag {0}")]
    UnknownKind(u8),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn section(len: u64, body: &[u8]) -> Cursor<Vec<u8>> {
        let mut bytes = len.to_le_bytes().to_vec();
        bytes.extend_from_slice(body);
        Cursor::new(bytes)
    }

    #[test]
    fn reads_sections() {
        let mut reader = section(2, &[0, 1]);
        let tags = FrameDecoder::read_section::<1, u8, _>(&mut reader, 2).unwrap();

        assert_eq!(tags, vec![0, 1]);
    }

    #[test]
    fn section_lengths_must_match() {
        let mut reader = section(3, &[0, 1, 0]);

        assert!(matches!(
            FrameDecoder::read_section::<1, u8, _>(&mut reader, 2),
            Err(DecodingError::SectionLength { expected: 2, found: 3 }),
        ));
    }

    #[test]
    fn oversized_sections_are_rejected() {
        let mut reader = section(u64::MAX, &[]);

        assert!(matches!(
            FrameDecoder::read_section::<16, DVec2, _>(&mut reader, usize::MAX),
            Err(DecodingError::SectionTooLarge(usize::MAX)),
        ));
    }

    #[test]
    fn truncated_sections_are_io_errors() {
        let mut reader = section(1 << 20, &[0; 8]);

        match FrameDecoder::read_section::<8, f64, _>(&mut reader, 1 << 20) {
            Err(DecodingError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
