// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished images go.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::ColorType;

use crate::error::{Error, Result};

/// Accepts a finished image: `width * height * 3` bytes of RGB,
/// row-major, top row first.
pub trait PixelSink {
    /// Takes the image.
    fn present(&mut self, width: usize, height: usize, rgb: &[u8]) -> Result<()>;
}

/// Keeps the most recent image in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// The last image presented, with its width and height.
    pub image: Option<(usize, usize, Vec<u8>)>,
}

impl PixelSink for MemorySink {
    fn present(&mut self, width: usize, height: usize, rgb: &[u8]) -> Result<()> {
        self.image = Some((width, height, rgb.to_vec()));
        Ok(())
    }
}

/// Writes each image to a binary PPM file.
#[derive(Debug)]
pub struct PnmSink {
    path: PathBuf,
}

impl PnmSink {
    /// A sink writing to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        PnmSink {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PixelSink for PnmSink {
    fn present(&mut self, width: usize, height: usize, rgb: &[u8]) -> Result<()> {
        if rgb.len() != width * height * 3 {
            return Err(Error::InvalidConfig(format!(
                "{} bytes do not make a {}x{} RGB image",
                rgb.len(),
                width,
                height
            )));
        }
        let output = BufWriter::new(File::create(&self.path)?);
        let mut encoder =
            PnmEncoder::new(output).with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(rgb, width as u32, height as u32, ColorType::Rgb8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn memory_sink_keeps_last_image() {
        let mut sink = MemorySink::default();
        sink.present(1, 1, &[1, 2, 3]).unwrap();
        sink.present(1, 1, &[4, 5, 6]).unwrap();
        assert_eq!(sink.image, Some((1, 1, vec![4, 5, 6])));
    }

    #[test]
    fn pnm_sink_writes_a_pixmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let mut sink = PnmSink::new(&path);
        sink.present(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[255, 0, 0, 0, 0, 255]));
    }

    #[test]
    fn pnm_sink_rejects_short_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PnmSink::new(dir.path().join("out.ppm"));
        assert!(sink.present(2, 2, &[0; 6]).is_err());
    }
}
