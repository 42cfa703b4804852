#![cfg(feature = "serde")]

use glcore::geometry::Mode;
use glcore::linear::Matrix44;
use glcore::projection::ProjectionVolume;

#[test]
fn projection_volume_from_config() {
  let volume: ProjectionVolume = serde_json::from_str(
    r#"{ "left": -1.0, "right": 1.0, "bottom": -1.0, "top": 1.0, "near": 1.0, "far": 100.0 }"#,
  )
  .unwrap();

  assert_eq!(volume, ProjectionVolume::new(-1., 1., -1., 1., 1., 100.));
}

#[test]
fn matrix_is_stored_column_major() {
  let m = Matrix44::translate(1., 2., 3.);
  let json = serde_json::to_string(&m).unwrap();

  assert_eq!(
    json,
    "[1.0,0.0,0.0,0.0,0.0,1.0,0.0,0.0,0.0,0.0,1.0,0.0,1.0,2.0,3.0,1.0]"
  );
  assert_eq!(serde_json::from_str::<Matrix44>(&json).unwrap(), m);
}

#[test]
fn mode_by_name() {
  assert_eq!(
    serde_json::from_str::<Mode>(r#""TriangleFan""#).unwrap(),
    Mode::TriangleFan
  );
  assert!(serde_json::from_str::<Mode>(r#""Quad""#).is_err());
}
