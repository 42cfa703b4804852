use cgmath::{Deg, InnerSpace, Matrix4, Vector3};
use glcore::linear::Matrix44;

fn assert_close(m: Matrix44, reference: Matrix4<f32>) {
  let reference: &[f32; 16] = reference.as_ref();

  for (i, (a, b)) in m.raw().iter().zip(reference.iter()).enumerate() {
    assert!(
      (a - b).abs() <= 1e-5 * b.abs().max(1.),
      "coefficient {} differs: {} vs {}\n{}",
      i,
      a,
      b,
      m
    );
  }
}

#[test]
fn ortho_matches_cgmath() {
  assert_close(
    Matrix44::ortho(-4., 4., -3., 3., 0.1, 100.),
    cgmath::ortho(-4., 4., -3., 3., 0.1, 100.),
  );
  assert_close(
    Matrix44::ortho(0., 800., 600., 0., -1., 1.),
    cgmath::ortho(0., 800., 600., 0., -1., 1.),
  );
}

#[test]
fn frustum_matches_cgmath() {
  assert_close(
    Matrix44::frustum(-1., 1., -0.75, 0.75, 1., 100.),
    cgmath::frustum(-1., 1., -0.75, 0.75, 1., 100.),
  );
  assert_close(
    Matrix44::frustum(-0.5, 1.5, -1., 0.25, 0.5, 20.),
    cgmath::frustum(-0.5, 1.5, -1., 0.25, 0.5, 20.),
  );
}

#[test]
fn translate_matches_cgmath() {
  assert_close(
    Matrix44::translate(1.5, -2., 30.),
    Matrix4::from_translation(Vector3::new(1.5, -2., 30.)),
  );
}

#[test]
fn rotate_matches_cgmath() {
  let axes = [
    Vector3::new(1., 0., 0.),
    Vector3::new(0., 1., 0.),
    Vector3::new(0., 0., 1.),
    Vector3::new(1., 2., -3.),
  ];

  for &axis in &axes {
    for &angle in &[0., 30., 90., 135., -60., 270.] {
      let normalized: Vector3<f32> = axis.normalize();

      assert_close(
        Matrix44::rotate(angle, normalized.x, normalized.y, normalized.z),
        Matrix4::from_axis_angle(normalized, Deg(angle)),
      );
    }
  }
}

#[test]
fn composition_matches_cgmath() {
  let m = Matrix44::frustum(-1., 1., -1., 1., 1., 50.)
    * Matrix44::translate(0., 0., -4.)
    * Matrix44::rotate(45., 0., 1., 0.);
  let reference = cgmath::frustum(-1., 1., -1., 1., 1., 50.)
    * Matrix4::from_translation(Vector3::new(0., 0., -4.))
    * Matrix4::from_axis_angle(Vector3::new(0., 1., 0.), Deg(45.));

  assert_close(m, reference);
}
