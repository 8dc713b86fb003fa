//! Small synthetic GeoJSON datasets shared by unit tests.
//!
//! Administrative layout (lon × lat):
//!
//! ```text
//!  10 +-------------------+-------------------+
//!     |  1000300 三番町   |                   |
//!     |        +----+     |                   |
//!     |        |enc.|     |   200000 ベータ県  |
//!     |        +----+     |                   |
//!   5 +---------+---------+                   |
//!     | 1000100 | 1000200 |                   |
//!     |  一番市  |  二番市  |                   |
//!   0 +---------+---------+-------------------+
//!     0         5        10                  20
//! ```
//!
//! `100000` アルファ県 covers `[0,10]×[0,10]`; the enclave `1000400` 四番村
//! covers `[6,8]×[6,8]` and is a hole in 三番町. `900000` 日付変更島 straddles
//! the antimeridian at `[179,-179]×[-1,1]`.

pub const ADMIN: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "100000", "name": "アルファ県", "enName": "Alpha", "level": 1},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
    {"type": "Feature",
     "properties": {"code": "1000100", "name": "一番市", "parent": "100000"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[5,0],[5,5],[0,5],[0,0]]]}},
    {"type": "Feature",
     "properties": {"code": "1000200", "name": "二番市", "parent": "100000", "level": 2},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[5,0],[10,0],[10,5],[5,5],[5,0]]]]}},
    {"type": "Feature",
     "properties": {"code": "1000300", "name": "三番町", "parent": "100000", "level": 2},
     "geometry": {"type": "Polygon", "coordinates": [
       [[0,5],[10,5],[10,10],[0,10],[0,5]],
       [[6,6],[6,8],[8,8],[8,6],[6,6]]
     ]}},
    {"type": "Feature",
     "properties": {"code": "1000400", "name": "四番村", "parent": "100000", "level": 2},
     "geometry": {"type": "Polygon", "coordinates": [[[6,6],[8,6],[8,8],[6,8],[6,6]]]}},
    {"type": "Feature",
     "properties": {"code": "200000", "name": "ベータ県", "level": 1},
     "geometry": {"type": "Polygon", "coordinates": [[[10,0],[20,0],[20,10],[10,10],[10,0]]]}},
    {"type": "Feature",
     "properties": {"code": "900000", "name": "日付変更島", "level": 1},
     "geometry": {"type": "Polygon", "coordinates": [[[179,-1],[-179,-1],[-179,1],[179,1],[179,-1]]]}}
  ]
}"#;

/// Overlapping hazard zones inside アルファ県
pub const HAZARD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "H200", "name": "土砂警戒区域B"},
     "geometry": {"type": "Polygon", "coordinates": [[[2,2],[6,2],[6,6],[2,6],[2,2]]]}},
    {"type": "Feature",
     "properties": {"code": "H100", "name": "土砂警戒区域A"},
     "geometry": {"type": "Polygon", "coordinates": [[[1,1],[4,1],[4,4],[1,4],[1,1]]]}},
    {"type": "Feature",
     "properties": {"code": "H000", "name": "広域警戒区域", "level": 5},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[8,0],[8,8],[0,8],[0,0]]]}}
  ]
}"#;

/// Two valid features around three malformed ones
pub const WITH_BAD_FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "a", "name": "有効A"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    {"type": "Feature",
     "properties": {"name": "コードなし"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    {"type": "Feature",
     "properties": {"code": "p", "name": "点"},
     "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}},
    {"type": "Feature",
     "properties": {"code": "n", "name": "形状なし"},
     "geometry": null},
    {"type": "Feature",
     "properties": {"code": "b", "name": "有効B"},
     "geometry": {"type": "Polygon", "coordinates": [[[5,5],[6,5],[6,6],[5,6],[5,5]]]}}
  ]
}"#;

/// One region split across two source files
pub const SPLIT_PART_0: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "2000100", "name": "港区"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
  ]
}"#;

pub const SPLIT_PART_1: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "2000100", "name": "港区"},
     "geometry": {"type": "Polygon", "coordinates": [[[5,5],[6,5],[6,6],[5,6],[5,5]]]}}
  ]
}"#;

/// One valid feature among entries that are not feature objects at all
pub const WITH_ODD_ENTRIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"code": "ok", "name": "有効"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    null,
    7,
    {"type": "Feature", "properties": [],
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    {"type": "Feature", "properties": {"code": "far", "name": "遠方"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1e20,0],[1,1],[0,0]]]}}
  ]
}"#;
