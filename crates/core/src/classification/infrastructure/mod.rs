pub mod heuristic_gender_classifier;
pub mod onnx_gender_classifier;
