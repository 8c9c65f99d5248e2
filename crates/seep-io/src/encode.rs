use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use thiserror::Error;

use seep_cells::{scene::Scene, Fluid};

use crate::EncodeFluid;

use super::as_bytes::AsBytes;

pub struct FrameEncoder {
    /// The path to the directory into which the frames will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    current_frame: u64,
}

impl FrameEncoder {
    /// Creates the output directory. Fails if it already exists.
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<FrameEncoder, EncodingError> {
        std::fs::create_dir(&path)?;
        log::debug!("recording {num_frames} frames into {}", path.display());

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    pub(crate) fn frame_name(num_frames: u64, frame: u64) -> String {
        let max_digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) + 1;
        let digits = frame.checked_ilog10().unwrap_or(0) + 1;
        let zeros = max_digits.saturating_sub(digits);

        format!("{}{frame}.dat", "0".repeat(zeros as usize))
    }

    pub fn encode_metadata<F>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError>
    where
        F: Fluid + EncodeFluid,
    {
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);
        let shape = scene.fluid().shape();

        writer.write_all(&shape.y.to_bytes())?;
        writer.write_all(&shape.x.to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;
        writer.flush()?;

        Ok(())
    }

    pub fn encode_frame<F>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError>
    where
        F: Fluid + EncodeFluid,
    {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        let path = self.path.join(Self::frame_name(self.num_frames, self.current_frame));
        let mut encoder = FluidFrameEncoder { writer: BufWriter::new(File::create(path)?) };

        scene.fluid().encode_state(&mut encoder)?;
        encoder.writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }
}

pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    /// Writes `len` followed by the encoded values.
    pub fn encode_section<const N: usize, T, I>(&mut self, len: usize, values: I) -> Result<(), EncodingError>
    where
        I: Iterator<Item = T>,
        T: AsBytes<N>,
    {
        self.writer.write_all(&(len as u64).to_bytes())?;

        let bytes: Vec<_> = values.flat_map(|v| v.to_bytes()).collect();
        self.writer.write_all(&bytes)?;

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording was sized for {0} frames")]
    TooManyFrames(u64),
}
