//! Binary series batch codec.
//!
//! A batch is a run of series records with no outer header. Each record is
//!
//! ```text
//! u32 LE  timestamp count
//! u32 LE  value count
//! f64 LE  timestamps[timestamp count]
//! f64 LE  values[value count]      (NaN marks a gap)
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::WireError;
use crate::series::Series;

const SAMPLE_INTERVAL_MS: f64 = 100.0;
const GOLDEN_RATIO_FRACT: f64 = 0.618_033_988_749_895;

/// Decode every record in `buf`, naming series `{name_prefix}{index}`.
pub fn decode(mut buf: impl Buf, name_prefix: &str) -> Result<Vec<Series>, WireError> {
    let mut out = Vec::new();
    while buf.has_remaining() {
        let time_count = read_count(&mut buf)?;
        let value_count = read_count(&mut buf)?;
        let timestamps = read_f64s(&mut buf, time_count)?;
        let values = read_f64s(&mut buf, value_count)?;
        let name = format!("{name_prefix}{}", out.len());
        out.push(Series::from_raw(name, timestamps, values)?);
    }
    tracing::debug!(series = out.len(), "decoded series batch");
    Ok(out)
}

/// Encode series into a batch. Gaps are written as NaN.
pub fn encode(series: &[Series]) -> Bytes {
    let size: usize = series.iter().map(|s| 8 + s.len() * 16).sum();
    let mut out = BytesMut::with_capacity(size);
    for s in series {
        let count = s.len() as u32;
        out.put_u32_le(count);
        out.put_u32_le(count);
        for &time in s.timestamps() {
            out.put_f64_le(time);
        }
        for value in s.values() {
            out.put_f64_le(value.unwrap_or(f64::NAN));
        }
    }
    out.freeze()
}

/// Build a batch of sine series sampled every 100 ms up to `now_ms`.
///
/// Series `i` runs `sin(2π (2i + t) / num_points)`. Each series is blanked for
/// `percent_missing` out of every 100 samples. The blanked run is shifted per
/// series by a phase derived from `phase_seed`, so the same seed always yields
/// the same batch.
pub fn synthesize(
    num_series: usize,
    num_points: usize,
    percent_missing: f64,
    now_ms: f64,
    phase_seed: u64,
) -> Bytes {
    let timestamps: Vec<f64> = (0..num_points)
        .map(|t| now_ms - (num_points - t) as f64 * SAMPLE_INTERVAL_MS)
        .collect();
    let mut out = BytesMut::new();
    for i in 0..num_series {
        let gap_phase = gap_phase(phase_seed.wrapping_add(i as u64));
        out.put_u32_le(num_points as u32);
        out.put_u32_le(num_points as u32);
        for &time in &timestamps {
            out.put_f64_le(time);
        }
        for v in 0..num_points {
            let value = if (v as f64 + gap_phase) % 100.0 > percent_missing {
                (std::f64::consts::TAU * (i * 2 + v) as f64 / num_points as f64).sin()
            } else {
                f64::NAN
            };
            out.put_f64_le(value);
        }
    }
    out.freeze()
}

fn gap_phase(seed: u64) -> f64 {
    (seed as f64 * GOLDEN_RATIO_FRACT).fract() * 100.0
}

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), WireError> {
    if buf.remaining() < needed {
        return Err(WireError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn read_count(buf: &mut impl Buf) -> Result<usize, WireError> {
    ensure(buf, 4)?;
    Ok(buf.get_u32_le() as usize)
}

fn read_f64s(buf: &mut impl Buf, count: usize) -> Result<Vec<f64>, WireError> {
    let needed = count.saturating_mul(8);
    ensure(buf, needed)?;
    Ok((0..count).map(|_| buf.get_f64_le()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeriesError;
    use crate::range::Range;

    fn record(times: &[f64], values: &[f64]) -> BytesMut {
        let mut out = BytesMut::new();
        out.put_u32_le(times.len() as u32);
        out.put_u32_le(values.len() as u32);
        times.iter().for_each(|&t| out.put_f64_le(t));
        values.iter().for_each(|&v| out.put_f64_le(v));
        out
    }

    #[test]
    fn decodes_gaps_as_absent() {
        let buf = record(&[0.0, 1.0, 2.0], &[1.0, f64::NAN, 3.0]);
        let series = decode(buf.freeze(), "s").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name(), "s0");
        assert_eq!(series[0].values(), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(series[0].value_range(), Some(Range::new(1.0, 3.0)));
    }

    #[test]
    fn decodes_consecutive_records() {
        let mut buf = record(&[0.0], &[1.0]);
        buf.extend_from_slice(&record(&[5.0, 6.0], &[2.0, 3.0]));
        let series = decode(buf.freeze(), "cpu-").unwrap();
        let names: Vec<&str> = series.iter().map(Series::name).collect();
        assert_eq!(names, vec!["cpu-0", "cpu-1"]);
        assert_eq!(series[1].time_range(), Some(Range::new(5.0, 6.0)));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let mut buf = record(&[0.0, 1.0], &[1.0, 2.0]);
        buf.truncate(buf.len() - 3);
        let err = decode(buf.freeze(), "s").unwrap_err();
        assert_eq!(
            err,
            WireError::Truncated {
                needed: 16,
                remaining: 13
            }
        );
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let buf = record(&[0.0, 1.0], &[1.0]);
        let err = decode(buf.freeze(), "s").unwrap_err();
        assert_eq!(
            err,
            WireError::Series(SeriesError::LengthMismatch {
                timestamps: 2,
                values: 1
            })
        );
    }

    #[test]
    fn encode_preserves_gaps() {
        let original =
            Series::new("a", vec![0.0, 1.0], vec![None, Some(2.5)]).unwrap();
        let decoded = decode(encode(std::slice::from_ref(&original)), "a").unwrap();
        assert_eq!(decoded[0].values(), original.values());
        assert_eq!(decoded[0].timestamps(), original.timestamps());
    }

    #[test]
    fn synthesized_batch_has_requested_shape() {
        let batch = synthesize(3, 200, 20.0, 1_000_000.0, 7);
        assert_eq!(batch, synthesize(3, 200, 20.0, 1_000_000.0, 7));
        let series = decode(batch, "wave").unwrap();
        assert_eq!(series.len(), 3);
        for s in &series {
            assert_eq!(s.len(), 200);
            assert_eq!(s.timestamps()[199], 1_000_000.0 - SAMPLE_INTERVAL_MS);
            let gaps = s.values().iter().filter(|v| v.is_none()).count();
            assert!(gaps > 0 && gaps < 200);
        }
    }
}
