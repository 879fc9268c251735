use crate::features::error::SampleError;
use crate::structs::RawPositionSample;
use serde_json::Value;

impl RawPositionSample {
    /// Creates a sample after checking that the coordinates are finite and in range.
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
        accuracy: Option<f64>,
    ) -> Result<Self, SampleError> {
        let sample = Self {
            latitude,
            longitude,
            altitude,
            accuracy,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Parses a sample from a JSON object such as a line of a recorded track.
    ///
    /// `latitude` and `longitude` are required; `altitude` and `accuracy` are kept only
    /// when they are numbers.
    pub fn from_json(value: &Value) -> Result<Self, SampleError> {
        let (Some(latitude), Some(longitude)) = (
            value.get("latitude").and_then(Value::as_f64),
            value.get("longitude").and_then(Value::as_f64),
        ) else {
            let missing = if value.get("latitude").and_then(Value::as_f64).is_none() {
                "latitude"
            } else {
                "longitude"
            };
            return Err(SampleError::MissingField(missing));
        };
        let altitude = value.get("altitude").and_then(Value::as_f64);
        let accuracy = value.get("accuracy").and_then(Value::as_f64);

        Self::new(latitude, longitude, altitude, accuracy)
    }

    /// Checks the coordinate invariant. `NaN` never passes the range checks.
    pub fn validate(&self) -> Result<(), SampleError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SampleError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SampleError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_with_full_data() {
        let value = json!({
            "latitude": 52.379_189,
            "longitude": 4.899_431,
            "altitude": 10.5,
            "accuracy": 3.0
        });

        let sample = RawPositionSample::from_json(&value).unwrap();

        assert_eq!(sample.latitude, 52.379_189);
        assert_eq!(sample.longitude, 4.899_431);
        assert_eq!(sample.altitude, Some(10.5));
        assert_eq!(sample.accuracy, Some(3.0));
    }

    #[test]
    fn test_from_json_with_minimal_data() {
        let value = json!({ "latitude": 40.7128, "longitude": -74.0060 });

        let sample = RawPositionSample::from_json(&value).unwrap();

        assert!(sample.altitude.is_none());
        assert!(sample.accuracy.is_none());
    }

    #[test]
    fn test_null_altitude_is_treated_as_absent() {
        let value = json!({ "latitude": 1.0, "longitude": 2.0, "altitude": null });

        let sample = RawPositionSample::from_json(&value).unwrap();
        assert!(sample.altitude.is_none());
    }

    #[test]
    fn test_missing_latitude_is_rejected() {
        let value = json!({ "longitude": 4.899_431 });

        assert_eq!(
            RawPositionSample::from_json(&value),
            Err(SampleError::MissingField("latitude"))
        );
    }

    #[test]
    fn test_non_numeric_longitude_is_rejected() {
        let value = json!({ "latitude": 52.0, "longitude": "east" });

        assert_eq!(
            RawPositionSample::from_json(&value),
            Err(SampleError::MissingField("longitude"))
        );
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        assert_eq!(
            RawPositionSample::new(90.5, 0.0, None, None),
            Err(SampleError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            RawPositionSample::new(0.0, -180.1, None, None),
            Err(SampleError::LongitudeOutOfRange(-180.1))
        );
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(RawPositionSample::new(f64::NAN, 0.0, None, None).is_err());
        assert!(RawPositionSample::new(0.0, f64::NAN, None, None).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(RawPositionSample::new(-90.0, 180.0, None, None).is_ok());
        assert!(RawPositionSample::new(90.0, -180.0, None, None).is_ok());
    }
}
