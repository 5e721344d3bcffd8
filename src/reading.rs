use serde::{Deserialize, Serialize};

/// One extracted set of hardware measurements, produced fresh on every poll.
///
/// A field holding its zero default means "not found in the report"; the
/// format cannot distinguish that from a true zero-degree measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// CPU temperature in degrees Celsius (0.0 = not found).
    pub cpu_temp: f64,

    /// GPU temperature in degrees Celsius (0.0 = not found).
    pub gpu_temp: f64,

    /// Fan speed in RPM (0 = not found).
    pub fan_speed: u32,
}

impl SensorReading {
    /// True if at least one temperature field was extracted.
    pub fn has_temperatures(&self) -> bool {
        self.cpu_temp != 0.0 || self.gpu_temp != 0.0
    }
}

impl std::fmt::Display for SensorReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CPU={:.1}°C, GPU={:.1}°C, FAN={} RPM",
            self.cpu_temp, self.gpu_temp, self.fan_speed
        )
    }
}

/// Accumulator for a single parse pass over one report.
///
/// Each field keeps the first non-zero value recorded into it and ignores
/// everything after, so rule evaluation order alone decides which line wins.
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    cpu_temp: f64,
    gpu_temp: f64,
    fan_speed: u32,
}

impl ReadingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a CPU temperature; returns true if the field was still unset.
    pub fn record_cpu_temp(&mut self, celsius: f64) -> bool {
        if self.cpu_temp != 0.0 {
            return false;
        }
        self.cpu_temp = celsius;
        true
    }

    /// Record a GPU temperature; returns true if the field was still unset.
    pub fn record_gpu_temp(&mut self, celsius: f64) -> bool {
        if self.gpu_temp != 0.0 {
            return false;
        }
        self.gpu_temp = celsius;
        true
    }

    /// Record a fan speed; returns true if the field was still unset.
    pub fn record_fan_speed(&mut self, rpm: u32) -> bool {
        if self.fan_speed != 0 {
            return false;
        }
        self.fan_speed = rpm;
        true
    }

    /// True while no CPU temperature has been recorded, which is the
    /// condition for running the fallback scan.
    pub fn cpu_temp_unset(&self) -> bool {
        self.cpu_temp == 0.0
    }

    /// True while no GPU temperature has been recorded.
    pub fn gpu_temp_unset(&self) -> bool {
        self.gpu_temp == 0.0
    }

    /// True while no fan speed has been recorded.
    pub fn fan_speed_unset(&self) -> bool {
        self.fan_speed == 0
    }

    /// Finalize into an immutable reading.
    pub fn finish(self) -> SensorReading {
        SensorReading {
            cpu_temp: self.cpu_temp,
            gpu_temp: self.gpu_temp,
            fan_speed: self.fan_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let reading = SensorReading {
            cpu_temp: 45.0,
            gpu_temp: 60.0,
            fan_speed: 1200,
        };

        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cpu_temp": 45.0,
                "gpu_temp": 60.0,
                "fan_speed": 1200,
            })
        );

        // Exactly three keys, nothing extra on the wire.
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_default_is_all_zero() {
        let reading = SensorReading::default();
        assert_eq!(reading.cpu_temp, 0.0);
        assert_eq!(reading.gpu_temp, 0.0);
        assert_eq!(reading.fan_speed, 0);
        assert!(!reading.has_temperatures());
    }

    #[test]
    fn test_has_temperatures() {
        let mut reading = SensorReading::default();
        reading.cpu_temp = 41.5;
        assert!(reading.has_temperatures());

        let mut reading = SensorReading::default();
        reading.gpu_temp = 60.0;
        assert!(reading.has_temperatures());

        // A fan speed alone does not count.
        let mut reading = SensorReading::default();
        reading.fan_speed = 900;
        assert!(!reading.has_temperatures());
    }

    #[test]
    fn test_builder_first_value_wins() {
        let mut builder = ReadingBuilder::new();

        assert!(builder.record_cpu_temp(45.0));
        assert!(!builder.record_cpu_temp(99.0));

        assert!(builder.record_gpu_temp(60.0));
        assert!(!builder.record_gpu_temp(75.0));

        assert!(builder.record_fan_speed(1200));
        assert!(!builder.record_fan_speed(3000));

        let reading = builder.finish();
        assert_eq!(reading.cpu_temp, 45.0);
        assert_eq!(reading.gpu_temp, 60.0);
        assert_eq!(reading.fan_speed, 1200);
    }

    #[test]
    fn test_builder_zero_leaves_field_unset() {
        let mut builder = ReadingBuilder::new();

        // A literal 0.0 reading does not lock the field.
        builder.record_cpu_temp(0.0);
        assert!(builder.cpu_temp_unset());
        assert!(builder.record_cpu_temp(38.0));
        assert!(!builder.cpu_temp_unset());
    }

    #[test]
    fn test_display_format() {
        let reading = SensorReading {
            cpu_temp: 45.0,
            gpu_temp: 0.0,
            fan_speed: 1200,
        };
        assert_eq!(reading.to_string(), "CPU=45.0°C, GPU=0.0°C, FAN=1200 RPM");
    }
}
