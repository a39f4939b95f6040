use crate::error::{HooklogError, Result};
use crate::tools::{LlmTool, ToolDescriptor};
use serde_json::{json, Map, Value};

const CONDITIONS: [&str; 6] = ["Sunny", "Partly Cloudy", "Cloudy", "Rainy", "Stormy", "Snowy"];

/// Tool returning simulated weather for a location
///
/// No weather service is contacted. Readings are derived from the location name, so the
/// same location always reports the same weather, which keeps demos and tests stable.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

// FNV-1a, stable across platforms and releases
fn location_seed(location: &str) -> u64 {
    location.to_lowercase().bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl LlmTool for WeatherTool {
    fn run(&self, args: &Map<String, Value>) -> Result<Value> {
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HooklogError::ToolError("Missing 'location' parameter".to_string()))?;

        let seed = location_seed(location);
        let celsius = (seed % 351) as f64 / 10.0;
        let conditions = CONDITIONS[((seed >> 16) % CONDITIONS.len() as u64) as usize];
        let humidity = 30 + (seed >> 32) % 61;

        Ok(json!({
            "location": location,
            "temperature_celsius": celsius,
            "temperature_fahrenheit": round1(celsius * 9.0 / 5.0 + 32.0),
            "conditions": conditions,
            "humidity": humidity,
            "forecast": "This is simulated weather data for demonstration purposes"
        }))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_weather",
            "Get the current weather for a location, including temperature, conditions and humidity.",
            json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City or location name"
                    }
                },
                "required": ["location"]
            }),
        )
    }
}
