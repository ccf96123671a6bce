//! RTTM speaker-turn files.
//!
//! Only `SPEAKER` lines are read:
//! `SPEAKER <uri> <channel> <start> <duration> <NA> <NA> <speaker> <NA> <NA>`.

use std::fmt;
use std::path::Path;

use wavemark_types::{LabelKey, LabelSet, Region};

use crate::ids::RegionIdGenerator;
use crate::labels::{key_for_text, next_label_key};

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechTurn {
    pub uri: String,
    pub channel: String,
    pub start: f64,
    pub duration: f64,
    pub speaker: String,
}

#[derive(Debug)]
pub enum RttmError {
    Io(std::io::Error),
    Malformed { line: usize, message: String },
}

impl fmt::Display for RttmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RttmError::Io(e) => write!(f, "IO error: {}", e),
            RttmError::Malformed { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for RttmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RttmError::Io(e) => Some(e),
            RttmError::Malformed { .. } => None,
        }
    }
}

impl From<std::io::Error> for RttmError {
    fn from(e: std::io::Error) -> Self {
        RttmError::Io(e)
    }
}

fn malformed(line: usize, message: impl Into<String>) -> RttmError {
    RttmError::Malformed {
        line,
        message: message.into(),
    }
}

fn parse_seconds(field: &str, line: usize, what: &str) -> Result<f64, RttmError> {
    let value: f64 = field
        .parse()
        .map_err(|_| malformed(line, format!("invalid {} {:?}", what, field)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed(line, format!("{} out of range: {}", what, value)));
    }
    Ok(value)
}

fn parse_duration(field: &str, line: usize) -> Result<f64, RttmError> {
    let duration = parse_seconds(field, line, "duration")?;
    if duration <= 0.0 {
        return Err(malformed(line, format!("empty turn: duration {}", duration)));
    }
    Ok(duration)
}

/// Parse RTTM text. Lines are numbered from 1; blank and non-`SPEAKER`
/// lines are skipped.
pub fn parse(text: &str) -> Result<Vec<SpeechTurn>, RttmError> {
    let mut turns = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.first() != Some(&"SPEAKER") {
            continue;
        }
        if fields.len() < 8 {
            return Err(malformed(
                line,
                format!("expected at least 8 fields, found {}", fields.len()),
            ));
        }
        turns.push(SpeechTurn {
            uri: fields[1].to_string(),
            channel: fields[2].to_string(),
            start: parse_seconds(fields[3], line, "start")?,
            duration: parse_duration(fields[4], line)?,
            speaker: fields[7].to_string(),
        });
    }
    Ok(turns)
}

pub fn read(path: &Path) -> Result<Vec<SpeechTurn>, RttmError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Distinct uris in order of first appearance.
pub fn uris(turns: &[SpeechTurn]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for turn in turns {
        if !seen.contains(&turn.uri.as_str()) {
            seen.push(&turn.uri);
        }
    }
    seen
}

/// Turn speech turns into regions. Speakers already present as label texts
/// reuse their key; new speakers get the next free key. Returns the regions
/// and the extended label set.
pub fn import(
    turns: &[SpeechTurn],
    labels: &LabelSet,
    ids: &mut RegionIdGenerator,
) -> (Vec<Region>, LabelSet) {
    let mut labels = labels.clone();
    let mut regions = Vec::with_capacity(turns.len());
    for turn in turns {
        let key = match key_for_text(&labels, &turn.speaker) {
            Some(key) => key.clone(),
            None => {
                let key = next_label_key(&labels);
                labels.insert(key.clone(), turn.speaker.clone());
                key
            }
        };
        regions.push(Region {
            id: ids.next_id(),
            start: turn.start,
            end: turn.start + turn.duration,
            label: key,
        });
    }
    (regions, labels)
}

/// One `SPEAKER` line per region, ordered by start time. Speaker names are
/// label texts, falling back to the key.
pub fn export(uri: &str, regions: &[Region], labels: &LabelSet) -> String {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
    let mut out = String::new();
    for region in sorted {
        let speaker = speaker_name(&region.label, labels);
        out.push_str(&format!(
            "SPEAKER {} 1 {:.3} {:.3} <NA> <NA> {} <NA> <NA>\n",
            uri,
            region.start,
            region.duration(),
            speaker
        ));
    }
    out
}

fn speaker_name(key: &LabelKey, labels: &LabelSet) -> String {
    let name = labels.get(key).map(String::as_str).unwrap_or(key.as_str());
    // RTTM fields are whitespace separated
    let name: String = name.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        "<NA>".to_string()
    } else {
        name
    }
}
