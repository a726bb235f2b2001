//! Audio duration from container metadata.

use std::fs::File;
use std::path::Path;
use storyteller_error::MetadataProbeWarning;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

/// Total duration of the audio file at `path`, in seconds.
///
/// Uses the frame count from the container header when present, and
/// otherwise sums the durations of every packet of the default track.
///
/// # Errors
///
/// Returns [`MetadataProbeWarning`] when the file cannot be opened, its
/// format is not recognized, or no positive duration can be derived.
pub fn probe_duration_seconds(path: &Path) -> Result<f64, MetadataProbeWarning> {
    let warning = |message: String| MetadataProbeWarning::new(path.display().to_string(), message);

    let file = File::open(path).map_err(|e| warning(e.to_string()))?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| warning(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| warning("no default audio track".to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let time_base = params
        .time_base
        .or_else(|| params.sample_rate.map(|rate| TimeBase::new(1, rate)))
        .ok_or_else(|| warning("track has no time base".to_string()))?;

    let total = match params.n_frames {
        Some(frames) => frames,
        None => {
            let mut total = 0u64;
            loop {
                match format.next_packet() {
                    Ok(packet) if packet.track_id() == track_id => total += packet.dur(),
                    Ok(_) => {}
                    Err(SymphoniaError::IoError(e))
                        if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break;
                    }
                    Err(e) => return Err(warning(e.to_string())),
                }
            }
            total
        }
    };

    let time = time_base.calc_time(total);
    let seconds = time.seconds as f64 + time.frac;
    if seconds <= 0.0 {
        return Err(warning("audio has zero duration".to_string()));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pcm_wav(sample_rate: u32, seconds: u32) -> Vec<u8> {
        let data_len = sample_rate * 2 * seconds;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    #[test]
    fn wav_duration_comes_from_header() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&pcm_wav(8000, 2)).unwrap();

        let seconds = probe_duration_seconds(file.path()).unwrap();

        assert!((seconds - 2.0).abs() < 1e-6, "got {}", seconds);
    }

    #[test]
    fn unrecognized_bytes_produce_a_warning() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"definitely not audio").unwrap();

        let warning = probe_duration_seconds(file.path()).unwrap_err();

        assert!(warning.path.ends_with(".mp3"));
    }

    #[test]
    fn missing_file_produces_a_warning() {
        assert!(probe_duration_seconds(Path::new("/nonexistent/audio.mp3")).is_err());
    }
}
