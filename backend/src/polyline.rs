//! Google encoded-polyline format.
//!
//! Each coordinate is stored as a delta from the previous one, scaled by
//! 1e5, zig-zag encoded and split into 5-bit chunks offset by 63. A chunk
//! with bit `0x20` set is followed by another chunk of the same value.

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CONTINUATION: u8 = 0x20;
const CHUNK_MASK: u8 = 0x1f;
const OFFSET: u8 = 63;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("malformed polyline at byte {position}: {reason}")]
    MalformedPolyline {
        position: usize,
        reason: &'static str,
    },
}

fn malformed(position: usize, reason: &'static str) -> PolylineError {
    PolylineError::MalformedPolyline { position, reason }
}

/// Decode an encoded polyline into `(lat, lon)` pairs in path order.
pub fn decode_path(encoded_path: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded_path.as_bytes();
    let mut coords = Vec::with_capacity(bytes.len() / 4);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        let (dlat, next) = decode_value(bytes, index)?;
        if next >= bytes.len() {
            return Err(malformed(next, "latitude without longitude"));
        }
        let (dlon, next) = decode_value(bytes, next)?;
        index = next;

        lat += dlat;
        lon += dlon;
        coords.push((lat as f64 / PRECISION, lon as f64 / PRECISION));
    }

    Ok(coords)
}

fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut index = start;

    loop {
        let byte = *bytes
            .get(index)
            .ok_or_else(|| malformed(index, "unterminated value"))?;
        if !(OFFSET..=OFFSET + 0x3f).contains(&byte) {
            return Err(malformed(index, "byte outside polyline alphabet"));
        }
        if shift >= 32 {
            return Err(malformed(index, "value exceeds 32 bits"));
        }

        let chunk = byte - OFFSET;
        result |= u64::from(chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        index += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok((value, index))
}

/// Encode `(lat, lon)` pairs. Coordinates are rounded to 5 decimal places.
pub fn encode_path(coords: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(coords.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for &(lat, lon) in coords {
        let lat = (lat * PRECISION).round() as i64;
        let lon = (lon * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 {
        !((delta as u64) << 1)
    } else {
        (delta as u64) << 1
    };

    while value >= u64::from(CONTINUATION) {
        let chunk = (value as u8 & CHUNK_MASK) | CONTINUATION;
        out.push(char::from(chunk + OFFSET));
        value >>= CHUNK_BITS;
    }
    out.push(char::from(value as u8 + OFFSET));
}
