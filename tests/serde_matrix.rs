#![cfg(feature = "serde")]

use jupiter_linalg::Matrix;

#[test]
fn json_roundtrip() {
    let a = Matrix::from_rows(2, 3, &[1.0_f64, -2.5, 3.0, 0.0, 4.25, -6.0]);
    let json = serde_json::to_string(&a).unwrap();
    let back: Matrix<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, a);
    assert_eq!(back.shape(), (2, 3));
}

#[test]
fn json_layout_is_row_major() {
    let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    let value = serde_json::to_value(&a).unwrap();
    assert_eq!(value["nrows"], 2);
    assert_eq!(value["ncols"], 2);
    assert_eq!(value["data"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn decomposition_of_deserialized_matrix() {
    let json = r#"{"data":[4.0,12.0,-16.0,12.0,37.0,-43.0,-16.0,-43.0,98.0],"nrows":3,"ncols":3}"#;
    let a: Matrix<f64> = serde_json::from_str(json).unwrap();
    let chol = a.cholesky().unwrap();
    assert!(chol.is_spd());
    assert!((chol.det().unwrap() - 36.0).abs() < 1e-9);
}
