//! Binary PPM (`P6`) codec restricted to 8-bit channels.
//!
//! Header: `P6`, width, height and max value as whitespace separated decimal
//! tokens. `#` starts a comment running to the end of the line. Exactly one
//! whitespace byte follows the max value, then `width * height` RGB triplets.

use std::io::{self, BufRead, Read, Write};
use std::mem::size_of;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::image::{Image, ImageDesc, Pixel};

pub const MAGIC: &str = "P6";
pub const MAX_VALUE: u32 = 255;

// Longer tokens can't be valid header fields.
const MAX_TOKEN_LEN: usize = 32;

/// Declared pixel data may exceed the stream length by at most this factor.
const MAX_SHORTFALL_FACTOR: u64 = 4;

pub(crate) fn decode<R: BufRead>(reader: R) -> Result<Image> {
    decode_bounded(reader, None)
}

/// Decodes an image whose stream is known to hold at most `stream_len` bytes.
///
/// Headers declaring far more pixel data than the stream can hold are
/// rejected before anything is allocated.
pub(crate) fn decode_bounded<R: BufRead>(mut reader: R, stream_len: Option<u64>) -> Result<Image> {
    let magic = read_token(&mut reader)?;
    if magic.as_deref() != Some(MAGIC) {
        return Err(Error::Format(format!("found {:?}", magic.unwrap_or_default())));
    }

    let width = read_dimension(&mut reader, "width")?;
    let height = read_dimension(&mut reader, "height")?;
    if width.checked_mul(height).and_then(|n| n.checked_mul(3)).is_none() {
        return Err(Error::Size(format!("{width}x{height} is too large")));
    }

    let max_value = read_token(&mut reader)?;
    match max_value.as_deref().map(str::parse::<u32>) {
        Some(Ok(MAX_VALUE)) => {}
        _ => {
            return Err(Error::Range(format!(
                "found {:?}",
                max_value.as_deref().unwrap_or_default()
            )))
        }
    }

    let desc = ImageDesc::new(width, height);
    let pixel_bytes = (desc.pixel_count() * size_of::<Pixel>()) as u64;
    if let Some(len) = stream_len {
        if pixel_bytes > len.saturating_mul(MAX_SHORTFALL_FACTOR) {
            return Err(Error::Size(format!(
                "{desc} needs {pixel_bytes} bytes of pixel data, stream has {len}"
            )));
        }
    }

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(desc.pixel_count())
        .map_err(|e| Error::Size(format!("{desc} cannot be allocated: {e}")))?;
    pixels.resize(desc.pixel_count(), Pixel::BLACK);
    let mut image = Image::new_with_pixels(desc, pixels)?;

    let bytes: &mut [u8] = bytemuck::cast_slice_mut(image.pixels_mut());
    let filled = read_up_to(&mut reader, bytes)?;
    let complete = filled / size_of::<Pixel>();
    if complete < desc.pixel_count() {
        // A partial trailing triplet is dropped, not kept half-written.
        bytes[complete * size_of::<Pixel>()..filled].fill(0);
        log::warn!(
            "Pixel data ended early: read {} of {} pixels of a {} image",
            complete,
            desc.pixel_count(),
            desc
        );
    }

    Ok(image)
}

pub(crate) fn encode<W: Write>(image: &Image, writer: &mut W) -> io::Result<()> {
    write!(
        writer,
        "{}\n{} {}\n{}\n",
        MAGIC,
        image.width(),
        image.height(),
        MAX_VALUE
    )?;
    writer.write_all(image.bytes())
}

fn read_dimension<R: BufRead>(reader: &mut R, name: &str) -> Result<usize> {
    let token = read_token(reader)?;
    match token.as_deref().map(str::parse::<usize>) {
        Some(Ok(value)) if value > 0 => Ok(value),
        _ => Err(Error::Size(format!(
            "{name} {:?} is not a positive integer",
            token.as_deref().unwrap_or_default()
        ))),
    }
}

/// Reads the next header token, skipping whitespace and comments.
/// Consumes the single whitespace byte terminating the token.
///
/// Overlong tokens come back cut to `MAX_TOKEN_LEN` bytes followed by `...`,
/// which never parses as a header field.
fn read_token<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut token = Vec::new();
    let mut overlong = false;

    loop {
        let Some(byte) = next_byte(reader)? else {
            break;
        };

        match byte {
            b'#' if token.is_empty() => skip_line(reader)?,
            b if b.is_ascii_whitespace() => {
                if !token.is_empty() {
                    break;
                }
            }
            b => {
                if token.len() < MAX_TOKEN_LEN {
                    token.push(b);
                } else {
                    overlong = true;
                }
            }
        }
    }

    if token.is_empty() {
        return Ok(None);
    }

    let mut token = String::from_utf8_lossy(&token).into_owned();
    if overlong {
        token.push_str("...");
    }
    Ok(Some(token))
}

fn skip_line<R: BufRead>(reader: &mut R) -> Result<()> {
    while let Some(byte) = next_byte(reader)? {
        if byte == b'\n' {
            break;
        }
    }
    Ok(())
}

fn next_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    let buf = loop {
        match reader.fill_buf() {
            Ok(buf) => break buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(stream_error(e)),
        }
    };

    let Some(&byte) = buf.first() else {
        return Ok(None);
    };
    reader.consume(1);
    Ok(Some(byte))
}

/// Fills `buf` until it is full or the stream ends; returns the byte count read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(stream_error(e)),
        }
    }
    Ok(filled)
}

// The caller that knows the path replaces the empty one.
fn stream_error(source: io::Error) -> Error {
    Error::Io {
        path: PathBuf::new(),
        source,
    }
}
