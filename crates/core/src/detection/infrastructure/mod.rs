pub mod onnx_face_detector;
pub mod skin_window_detector;
