/// Offset between the Celsius and Kelvin scales
const KELVIN_OFFSET: f64 = 273.15;

/// Convert a Celsius reading to Fahrenheit
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert a Celsius reading to Kelvin
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}
