//! Diagnostic bitmap export.
//!
//! Writes a captured frame as a standard uncompressed 32-bpp BMP so a
//! human can inspect what the sampler actually saw. Peripheral utility;
//! the sampling contract does not depend on it.

use crate::capture::Frame;
use crate::error::ExportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

/// Row origin of the exported bitmap.
///
/// `TopDown` encodes a negative height in the info header; `BottomUp`
/// is the classic BMP layout with the last row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    TopDown,
    BottomUp,
}

/// Write `frame` to `path` as an uncompressed BGRA bitmap.
pub fn write_bitmap(frame: &Frame, path: &Path, order: RowOrder) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let width = frame.width();
    let height = frame.height();
    // 32 bpp rows are already 4-byte aligned; no padding needed
    let image_size = width * height * 4;

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    write_headers(&mut out, width, height, image_size, order).map_err(io_err)?;

    let image = frame.raw();
    let rows: Vec<u32> = match order {
        RowOrder::TopDown => (0..height).collect(),
        RowOrder::BottomUp => (0..height).rev().collect(),
    };
    for y in rows {
        for x in 0..width {
            let px = image.get_pixel(x, y);
            // BMP stores BGRA
            out.write_all(&[px[2], px[1], px[0], px[3]]).map_err(io_err)?;
        }
    }

    out.flush().map_err(io_err)?;
    tracing::info!("[EXPORT] wrote bitmap {path:?} ({width}x{height})");
    Ok(())
}

fn write_headers<W: Write>(
    out: &mut W,
    width: u32,
    height: u32,
    image_size: u32,
    order: RowOrder,
) -> std::io::Result<()> {
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

    // BITMAPFILEHEADER
    out.write_all(b"BM")?;
    out.write_all(&(data_offset + image_size).to_le_bytes())?;
    out.write_all(&0u16.to_le_bytes())?; // reserved1
    out.write_all(&0u16.to_le_bytes())?; // reserved2
    out.write_all(&data_offset.to_le_bytes())?;

    // BITMAPINFOHEADER
    let encoded_height: i32 = match order {
        RowOrder::TopDown => -(height as i32),
        RowOrder::BottomUp => height as i32,
    };
    out.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
    out.write_all(&(width as i32).to_le_bytes())?;
    out.write_all(&encoded_height.to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?; // planes
    out.write_all(&32u16.to_le_bytes())?; // bits per pixel
    out.write_all(&0u32.to_le_bytes())?; // BI_RGB, uncompressed
    out.write_all(&image_size.to_le_bytes())?;
    out.write_all(&0i32.to_le_bytes())?; // x pixels per meter
    out.write_all(&0i32.to_le_bytes())?; // y pixels per meter
    out.write_all(&0u32.to_le_bytes())?; // colors used
    out.write_all(&0u32.to_le_bytes())?; // important colors

    Ok(())
}
