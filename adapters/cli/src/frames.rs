use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use led_defence_rendering::{FrameSink, PixelGrid};
use tracing::debug;

/// Writes each presented frame to a numbered PPM file.
#[derive(Debug)]
pub(crate) struct PpmDirectory {
    directory: PathBuf,
    written: u32,
}

impl PpmDirectory {
    /// Creates the output directory if needed.
    pub(crate) fn create(directory: &Path) -> Result<Self> {
        fs::create_dir_all(directory)
            .with_context(|| format!("failed to create frame directory {}", directory.display()))?;
        Ok(Self {
            directory: directory.to_path_buf(),
            written: 0,
        })
    }

    pub(crate) fn written(&self) -> u32 {
        self.written
    }
}

impl FrameSink for PpmDirectory {
    fn present(&mut self, frame: &PixelGrid, elapsed: Duration) -> Result<()> {
        let path = self.directory.join(format!("frame_{:05}.ppm", self.written));
        let file = File::create(&path)
            .with_context(|| format!("failed to create frame {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        frame
            .write_ppm(&mut writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write frame {}", path.display()))?;

        debug!(
            frame = self.written,
            seconds = elapsed.as_secs_f32(),
            "frame written"
        );
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_numbered_in_order() {
        let directory = std::env::temp_dir().join("led-defence-frames-test");
        let _ = fs::remove_dir_all(&directory);
        let mut sink = PpmDirectory::create(&directory).expect("create directory");
        let grid = PixelGrid::new(4, 2).expect("valid grid");

        sink.present(&grid, Duration::ZERO).expect("first frame");
        sink.present(&grid, Duration::from_millis(50))
            .expect("second frame");

        assert_eq!(sink.written(), 2);
        let second = fs::read(directory.join("frame_00001.ppm")).expect("read frame");
        assert!(second.starts_with(b"P6\n4 2\n255\n"));
        assert_eq!(second.len(), b"P6\n4 2\n255\n".len() + 4 * 2 * 3);
    }
}
