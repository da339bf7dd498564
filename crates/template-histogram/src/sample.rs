//! Named raw samples with their normalization targets

use template_core::{Error, Result};

/// A named sequence of raw observations and the area its template should have
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: String,
    values: Vec<f64>,
    target_area: f64,
    discriminant: Option<Vec<f64>>,
}

impl Sample {
    pub fn new(name: impl Into<String>, values: Vec<f64>, target_area: f64) -> Self {
        Self {
            name: name.into(),
            values,
            target_area,
            discriminant: None,
        }
    }

    /// Attach a discriminant value per observation
    pub fn with_discriminant(mut self, discriminant: Vec<f64>) -> Result<Self> {
        if discriminant.len() != self.values.len() {
            return Err(Error::size_mismatch(
                self.values.len(),
                discriminant.len(),
                &format!("discriminant of sample '{}'", self.name),
            ));
        }
        self.discriminant = Some(discriminant);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn target_area(&self) -> f64 {
        self.target_area
    }

    pub fn discriminant(&self) -> Option<&[f64]> {
        self.discriminant.as_deref()
    }

    /// Discriminant values, or an invalid-argument error naming the sample
    pub fn require_discriminant(&self) -> Result<&[f64]> {
        self.discriminant().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "sample '{}' has no discriminant values",
                self.name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminant_length_checked() {
        let sample = Sample::new("bkg_qqzz", vec![6.5, 7.0], 10.0);
        assert!(sample.clone().with_discriminant(vec![0.1]).is_err());

        let sample = sample.with_discriminant(vec![0.1, 0.9]).unwrap();
        assert_eq!(sample.require_discriminant().unwrap(), &[0.1, 0.9]);
    }

    #[test]
    fn test_missing_discriminant() {
        let sample = Sample::new("ggH_0PM", vec![6.5], 1.0);
        let err = sample.require_discriminant().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("ggH_0PM"));
    }
}
