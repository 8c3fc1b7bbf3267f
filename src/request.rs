//! Inputs to the surface and ring synthesizers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{Result, TextureError};

/// The five surface synthesis strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Star,
    Rocky,
    Gas,
    Ice,
    Terrestrial,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Star,
        ObjectKind::Rocky,
        ObjectKind::Gas,
        ObjectKind::Ice,
        ObjectKind::Terrestrial,
    ];

    /// Map a type tag onto a strategy
    ///
    /// Matching is case-insensitive. Unknown tags select `Terrestrial`, the
    /// declared default, rather than failing.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "star" => ObjectKind::Star,
            "rocky" => ObjectKind::Rocky,
            "gas" => ObjectKind::Gas,
            "ice" => ObjectKind::Ice,
            _ => ObjectKind::Terrestrial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Star => "star",
            ObjectKind::Rocky => "rocky",
            ObjectKind::Gas => "gas",
            ObjectKind::Ice => "ice",
            ObjectKind::Terrestrial => "terrestrial",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for a planet or star surface texture
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRequest {
    pub kind: ObjectKind,
    pub base_color: Rgb,
    pub display_name: String,
    /// Carried for callers; does not influence the rendered pixels
    pub temperature_kelvin: Option<i32>,
}

impl SurfaceRequest {
    pub fn new(kind: ObjectKind, base_color: Rgb, display_name: impl Into<String>) -> Self {
        SurfaceRequest {
            kind,
            base_color,
            display_name: display_name.into(),
            temperature_kelvin: None,
        }
    }

    pub fn with_temperature(mut self, kelvin: i32) -> Self {
        self.temperature_kelvin = Some(kelvin);
        self
    }

    /// Build a request from raw caller input, validating the color first
    pub fn parse(
        kind_tag: &str,
        base_color: &str,
        display_name: &str,
        temperature_kelvin: Option<i32>,
    ) -> Result<Self> {
        let base_color = Rgb::from_hex(base_color)?;
        Ok(SurfaceRequest {
            kind: ObjectKind::from_tag(kind_tag),
            base_color,
            display_name: display_name.to_string(),
            temperature_kelvin,
        })
    }
}

/// A request for a planetary ring texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingRequest {
    pub base_color: Rgb,
    /// Overall opacity in [0, 1]
    pub opacity: f64,
}

impl RingRequest {
    pub fn new(base_color: Rgb, opacity: f64) -> Result<Self> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(TextureError::InvalidOpacity(opacity));
        }
        Ok(RingRequest { base_color, opacity })
    }

    pub fn parse(base_color: &str, opacity: f64) -> Result<Self> {
        Self::new(Rgb::from_hex(base_color)?, opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_known() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_tag(kind.as_str()), kind);
        }
        assert_eq!(ObjectKind::from_tag("STAR"), ObjectKind::Star);
        assert_eq!(ObjectKind::from_tag(" Gas "), ObjectKind::Gas);
    }

    #[test]
    fn test_from_tag_falls_back_to_terrestrial() {
        assert_eq!(ObjectKind::from_tag("nebula"), ObjectKind::Terrestrial);
        assert_eq!(ObjectKind::from_tag(""), ObjectKind::Terrestrial);
    }

    #[test]
    fn test_kind_serde_tags() {
        let json = serde_json::to_string(&ObjectKind::Rocky).unwrap();
        assert_eq!(json, "\"rocky\"");
        let back: ObjectKind = serde_json::from_str("\"ice\"").unwrap();
        assert_eq!(back, ObjectKind::Ice);
    }

    #[test]
    fn test_surface_parse() {
        let request = SurfaceRequest::parse("star", "#FDB813", "Sun", Some(5778)).unwrap();
        assert_eq!(request.kind, ObjectKind::Star);
        assert_eq!(request.base_color, Rgb::new(253, 184, 19));
        assert_eq!(request.display_name, "Sun");
        assert_eq!(request.temperature_kelvin, Some(5778));
    }

    #[test]
    fn test_surface_parse_rejects_bad_color() {
        let err = SurfaceRequest::parse("rocky", "#ABC", "Mars", None).unwrap_err();
        assert!(matches!(err, TextureError::InvalidColor(_)));
    }

    #[test]
    fn test_ring_opacity_bounds() {
        assert!(RingRequest::parse("#DEB887", 0.0).is_ok());
        assert!(RingRequest::parse("#DEB887", 1.0).is_ok());
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                RingRequest::parse("#DEB887", bad),
                Err(TextureError::InvalidOpacity(_))
            ));
        }
        assert!(matches!(
            RingRequest::parse("DEB88", 0.5),
            Err(TextureError::InvalidColor(_))
        ));
    }
}
