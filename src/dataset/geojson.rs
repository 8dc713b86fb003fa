//! GeoJSON feature parsing.
//!
//! Only the envelope (`type`, `features`) is deserialized strictly. Each
//! feature stays raw JSON until it is parsed on its own, so that one bad
//! feature can be skipped without failing the whole document.

use geo_types::MultiPolygon;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::pip::geometry::{build_polygon, valid_coord};

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: Option<String>,
    pub features: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geometry_type: String,
    #[serde(default)]
    coordinates: Value,
}

type Position = Vec<f64>;

/// Fields of one valid feature
#[derive(Debug)]
pub struct ParsedFeature {
    pub code: String,
    pub name: String,
    pub en_name: Option<String>,
    pub parent_code: Option<String>,
    pub level: Option<u8>,
    pub geometry: MultiPolygon<f64>,
}

/// Parse one entry of a collection's `features` array
pub fn parse_feature(value: Value) -> Result<ParsedFeature, String> {
    let feature: RawFeature = match value {
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| format!("invalid feature ({e})"))?
        }
        Value::Null => return Err("null feature".to_string()),
        _ => return Err("feature is not an object".to_string()),
    };
    feature.parse()
}

impl RawFeature {
    /// Validate and convert, returning the reason on failure
    pub fn parse(self) -> Result<ParsedFeature, String> {
        let properties = self.properties.unwrap_or_default();

        let code = match properties.get("code") {
            Some(value) => identifier(value).ok_or("code is not a string or integer")?,
            None => return Err("missing code".to_string()),
        };
        if code.is_empty() {
            return Err("empty code".to_string());
        }

        let name = match properties.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(Value::String(_)) => return Err(format!("empty name for {code}")),
            Some(_) => return Err(format!("name of {code} is not a string")),
            None => return Err(format!("missing name for {code}")),
        };

        let en_name = match properties.get("enName") {
            Some(Value::String(en)) if !en.is_empty() => Some(en.clone()),
            _ => None,
        };

        let parent_code = properties
            .get("parent")
            .or_else(|| properties.get("parentCode"))
            .and_then(identifier)
            .filter(|parent| !parent.is_empty());

        let level = match properties.get("level") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_u64()
                    .and_then(|l| u8::try_from(l).ok())
                    .ok_or_else(|| format!("invalid level for {code}"))?,
            ),
        };

        let geometry = match self.geometry {
            None | Some(Value::Null) => return Err(format!("missing geometry for {code}")),
            Some(value) => parse_geometry(value).map_err(|reason| format!("{reason} for {code}"))?,
        };

        Ok(ParsedFeature {
            code,
            name,
            en_name,
            parent_code,
            level,
            geometry,
        })
    }
}

/// Codes appear both as strings ("130010") and bare integers
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

fn parse_geometry(value: Value) -> Result<MultiPolygon<f64>, String> {
    let raw: RawGeometry =
        serde_json::from_value(value).map_err(|e| format!("invalid geometry ({e})"))?;

    let polygons: Vec<Vec<Vec<Position>>> = match raw.geometry_type.as_str() {
        "Polygon" => {
            let rings: Vec<Vec<Position>> = serde_json::from_value(raw.coordinates)
                .map_err(|e| format!("invalid Polygon coordinates ({e})"))?;
            vec![rings]
        }
        "MultiPolygon" => serde_json::from_value(raw.coordinates)
            .map_err(|e| format!("invalid MultiPolygon coordinates ({e})"))?,
        other => return Err(format!("unsupported geometry type {other}")),
    };

    let mut built = Vec::with_capacity(polygons.len());
    for rings in polygons {
        let rings: Vec<Vec<[f64; 2]>> = rings
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .map(|position| match position.as_slice() {
                        [x, y, ..] if valid_coord(*x, *y) => Ok([*x, *y]),
                        [x, y, ..] => Err(format!("coordinate ({x}, {y}) out of range")),
                        _ => Err("position with fewer than two values".to_string()),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;

        if let Some(polygon) = build_polygon(&rings) {
            built.push(polygon);
        }
    }

    if built.is_empty() {
        return Err("empty geometry".to_string());
    }

    Ok(MultiPolygon::new(built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> RawFeature {
        serde_json::from_value(value).unwrap()
    }

    fn square() -> Value {
        json!([[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_parse_polygon_feature() {
        let parsed = feature(json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": square()},
            "properties": {"code": "1310100", "name": "千代田区", "enName": "Chiyoda City"}
        }))
        .parse()
        .unwrap();

        assert_eq!(parsed.code, "1310100");
        assert_eq!(parsed.name, "千代田区");
        assert_eq!(parsed.en_name.as_deref(), Some("Chiyoda City"));
        assert_eq!(parsed.geometry.0.len(), 1);
        assert!(parsed.level.is_none());
        assert!(parsed.parent_code.is_none());
    }

    #[test]
    fn test_parse_multipolygon_with_metadata() {
        let parsed = feature(json!({
            "type": "Feature",
            "geometry": {"type": "MultiPolygon", "coordinates": [square(), square()]},
            "properties": {"code": 130010, "name": "東京都", "level": 1, "parentCode": "130000"}
        }))
        .parse()
        .unwrap();

        assert_eq!(parsed.code, "130010");
        assert_eq!(parsed.level, Some(1));
        assert_eq!(parsed.parent_code.as_deref(), Some("130000"));
        assert_eq!(parsed.geometry.0.len(), 2);
    }

    #[test]
    fn test_three_dimensional_positions_accepted() {
        let parsed = feature(json!({
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0, 5.0], [1.0, 0.0, 5.0], [1.0, 1.0, 5.0], [0.0, 0.0, 5.0]]]},
            "properties": {"code": "a", "name": "a"}
        }))
        .parse()
        .unwrap();
        assert_eq!(parsed.geometry.0.len(), 1);
    }

    #[test]
    fn test_rejections() {
        let cases = vec![
            (json!({"geometry": {"type": "Polygon", "coordinates": square()}, "properties": {"name": "x"}}), "missing code"),
            (json!({"geometry": {"type": "Polygon", "coordinates": square()}, "properties": {"code": "1"}}), "missing name"),
            (json!({"geometry": {"type": "Polygon", "coordinates": square()}, "properties": {"code": "1", "name": ""}}), "empty name"),
            (json!({"geometry": null, "properties": {"code": "1", "name": "x"}}), "missing geometry"),
            (json!({"properties": {"code": "1", "name": "x"}}), "missing geometry"),
            (json!({"geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {"code": "1", "name": "x"}}), "unsupported geometry type"),
            (json!({"geometry": {"type": "MultiPolygon", "coordinates": []}, "properties": {"code": "1", "name": "x"}}), "empty geometry"),
            (json!({"geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0]]]}, "properties": {"code": "1", "name": "x"}}), "empty geometry"),
            (json!({"geometry": {"type": "Polygon", "coordinates": "nope"}, "properties": {"code": "1", "name": "x"}}), "invalid Polygon coordinates"),
            (json!({"geometry": {"type": "Polygon", "coordinates": square()}, "properties": {"code": "1", "name": "x", "level": 999}}), "invalid level"),
            (json!({"geometry": {"type": "Polygon", "coordinates": square()}}), "missing code"),
        ];

        for (value, expected) in cases {
            let reason = feature(value).parse().unwrap_err();
            assert!(reason.contains(expected), "{reason:?} should mention {expected:?}");
        }
    }

    #[test]
    fn test_out_of_range_coordinates_reported() {
        for coords in [
            json!([[[0.0, 0.0], [1e20, 0.0], [1.0, 1.0], [0.0, 0.0]]]),
            json!([[[0.0, 0.0], [1.0, -91.0], [1.0, 1.0], [0.0, 0.0]]]),
        ] {
            let reason = feature(json!({
                "geometry": {"type": "Polygon", "coordinates": coords},
                "properties": {"code": "1", "name": "x"}
            }))
            .parse()
            .unwrap_err();
            assert!(reason.contains("out of range"), "{reason}");
        }
    }

    #[test]
    fn test_parse_feature_rejects_non_objects() {
        assert_eq!(parse_feature(Value::Null).unwrap_err(), "null feature");
        assert!(parse_feature(json!(42)).unwrap_err().contains("not an object"));
        let reason = parse_feature(json!({
            "geometry": {"type": "Polygon", "coordinates": square()},
            "properties": []
        }))
        .unwrap_err();
        assert!(reason.contains("invalid feature"), "{reason}");

        let parsed = parse_feature(json!({
            "geometry": {"type": "Polygon", "coordinates": square()},
            "properties": {"code": "1", "name": "x"}
        }))
        .unwrap();
        assert_eq!(parsed.code, "1");
    }

    #[test]
    fn test_degenerate_polygon_dropped_from_multipolygon() {
        let parsed = feature(json!({
            "geometry": {"type": "MultiPolygon", "coordinates": [square(), [[[5.0, 5.0], [5.0, 5.0]]]]},
            "properties": {"code": "1", "name": "x"}
        }))
        .parse()
        .unwrap();
        assert_eq!(parsed.geometry.0.len(), 1);
    }
}
