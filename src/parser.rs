//! Heuristic parser for the free-form text report printed by `sensors`.
//!
//! The report is a sequence of chip sections, each introduced by an
//! unindented header line without a colon (`coretemp-isa-0000`,
//! `amdgpu-pci-0300`, ...) followed by labeled value lines. Field extraction
//! is an ordered list of (predicate, extractor) rules evaluated against every
//! line; each field keeps its first non-zero match and ignores the rest.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AgentError, Result};
use crate::reading::{ReadingBuilder, SensorReading};

/// Keyword substrings that mark a line as carrying the CPU temperature.
const CPU_KEYWORDS: &[&str] = &[
    "core 0:",
    "package id 0:",
    "tctl:",
    "cpu temperature:",
    "core temp:",
    "cpu temp:",
    "tdie:",
];

/// Section-name substrings that mark the current chip as a GPU.
const GPU_CHIPS: &[&str] = &["amdgpu", "radeon", "nouveau", "nvidia"];

/// Labels that carry the GPU temperature inside a GPU section.
const GPU_LABELS: &[&str] = &["edge:", "temp1:", "gpu temp:"];

/// Labels scanned by the CPU fallback when no keyword matched anywhere.
const CPU_FALLBACK_LABELS: &[&str] = &["temp1:", "temp2:"];

/// Celsius floor below which a fallback candidate is rejected as noise.
const FALLBACK_FLOOR_CELSIUS: f64 = 20.0;

// Temperature like "+45.0°C" or "-40.5°F"; a sign is tolerated but only the
// magnitude is captured.
static TEMPERATURE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-]?([\d.]+)°[CF]").unwrap());

// Fan speed like "1204 rpm" (matched against the lowercased line).
static RPM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*rpm").unwrap());

/// One report line together with the chip section it appeared under.
struct Line<'a> {
    raw: &'a str,
    lower: String,
    section: &'a str,
}

type Predicate = fn(&Line) -> bool;
type Extractor = fn(&Line, &mut ReadingBuilder) -> Result<()>;

/// Field rules in evaluation order; every rule sees every non-header line.
static RULES: [(Predicate, Extractor); 3] = [
    (is_cpu_line, extract_cpu_temp),
    (is_gpu_line, extract_gpu_temp),
    (is_fan_line, extract_fan_speed),
];

/// Parse one captured report into a reading.
///
/// Unmatched fields are left at their zero defaults. A matched line whose
/// number fails to parse is an error; callers treat it as voiding the whole
/// capture rather than trusting a partial reading.
pub fn parse_report(report: &str) -> Result<SensorReading> {
    let mut builder = ReadingBuilder::new();
    let mut section = String::new();

    for raw in report.lines() {
        if is_section_header(raw) {
            section = raw.to_lowercase();
            continue;
        }

        let line = Line {
            raw,
            lower: raw.to_lowercase(),
            section: &section,
        };

        for &(applies, extract) in RULES.iter() {
            if applies(&line) {
                extract(&line, &mut builder)?;
            }
        }
    }

    if builder.cpu_temp_unset() {
        apply_cpu_fallback(report, &mut builder)?;
    }

    Ok(builder.finish())
}

/// A section header is non-empty, unindented, and carries no colon.
fn is_section_header(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(' ') && !line.contains(':')
}

fn is_cpu_line(line: &Line) -> bool {
    CPU_KEYWORDS.iter().any(|k| line.lower.contains(k))
}

fn is_gpu_line(line: &Line) -> bool {
    GPU_CHIPS.iter().any(|chip| line.section.contains(chip))
        && GPU_LABELS.iter().any(|label| line.lower.contains(label))
}

fn is_fan_line(line: &Line) -> bool {
    line.lower.contains("fan") && line.lower.contains("rpm")
}

fn extract_cpu_temp(line: &Line, builder: &mut ReadingBuilder) -> Result<()> {
    if !builder.cpu_temp_unset() {
        return Ok(());
    }
    if let Some(celsius) = temperature_celsius(line.raw, &line.lower)? {
        builder.record_cpu_temp(celsius);
    }
    Ok(())
}

fn extract_gpu_temp(line: &Line, builder: &mut ReadingBuilder) -> Result<()> {
    if !builder.gpu_temp_unset() {
        return Ok(());
    }
    if let Some(celsius) = temperature_celsius(line.raw, &line.lower)? {
        builder.record_gpu_temp(celsius);
    }
    Ok(())
}

fn extract_fan_speed(line: &Line, builder: &mut ReadingBuilder) -> Result<()> {
    if !builder.fan_speed_unset() {
        return Ok(());
    }
    let Some(caps) = RPM_REGEX.captures(&line.lower) else {
        return Ok(());
    };
    let digits = &caps[1];
    let rpm: u32 = digits.parse().map_err(|_| {
        AgentError::parse(format!(
            "unparseable fan speed '{}' in line '{}'",
            digits,
            line.raw.trim()
        ))
    })?;
    builder.record_fan_speed(rpm);
    Ok(())
}

/// Extract a degree-marked number from a line, converting °F to °C.
///
/// Returns `Ok(None)` when the line carries no such number at all; a matched
/// number that fails to parse (for example `4.5.6`) is a parse anomaly.
fn temperature_celsius(raw: &str, lower: &str) -> Result<Option<f64>> {
    let Some(caps) = TEMPERATURE_REGEX.captures(raw) else {
        return Ok(None);
    };
    let magnitude = &caps[1];
    let value: f64 = magnitude.parse().map_err(|_| {
        AgentError::parse(format!(
            "unparseable temperature '{}' in line '{}'",
            magnitude,
            raw.trim()
        ))
    })?;

    if lower.contains("°f") {
        return Ok(Some(fahrenheit_to_celsius(value)));
    }
    Ok(Some(value))
}

fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Second pass run only when no CPU keyword matched: accept the first
/// `temp1:`/`temp2:` value above the plausibility floor, anywhere in the
/// report and regardless of section.
fn apply_cpu_fallback(report: &str, builder: &mut ReadingBuilder) -> Result<()> {
    for raw in report.lines() {
        let lower = raw.to_lowercase();
        if !CPU_FALLBACK_LABELS.iter().any(|label| lower.contains(label)) {
            continue;
        }
        if let Some(celsius) = temperature_celsius(raw, &lower)? {
            if celsius > FALLBACK_FLOOR_CELSIUS {
                builder.record_cpu_temp(celsius);
                break;
            }
        }
    }
    Ok(())
}
