pub const FACE_MODEL_NAME: &str = "blazeface_short_range.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/facetag/facetag/releases/download/v0.1.0/blazeface_short_range.onnx";

pub const GENDER_MODEL_NAME: &str = "gender_googlenet.onnx";
pub const GENDER_MODEL_URL: &str =
    "https://github.com/facetag/facetag/releases/download/v0.1.0/gender_googlenet.onnx";

/// Gender network input resolution (square).
pub const GENDER_INPUT_SIZE: u32 = 227;

/// Per-channel means of the gender network's training set, BGR order.
pub const GENDER_MEAN_BGR: [f32; 3] = [78.4263, 87.7689, 114.8958];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const SNAPSHOT_PREFIX: &str = "captured_";
pub const SNAPSHOT_EXTENSION: &str = "jpg";

/// Box colors drawn into annotated frames, RGB.
pub const MALE_BOX_COLOR: [u8; 3] = [64, 156, 255];
pub const FEMALE_BOX_COLOR: [u8; 3] = [255, 64, 192];
