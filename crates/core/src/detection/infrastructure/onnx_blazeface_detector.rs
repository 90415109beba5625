/// BlazeFace face detector using ONNX Runtime via `ort`.
///
/// Produces a bounding box, a confidence score and six facial keypoints
/// per face. Both the short-range and the full-range model are supported;
/// the variant fixes input resolution and anchor layout.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::model_variant::ModelVariant;
use crate::shared::detection::Detection;
use crate::shared::frame::{ChannelOrder, Frame};
use crate::shared::region::Region;

use super::execution_provider::preferred_execution_providers;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Values per anchor in the regressor output: box (4) + 6 keypoints (12).
const REGRESSOR_STRIDE: usize = 16;

const NUM_KEYPOINTS: usize = 6;

/// BlazeFace face detector backed by an ONNX Runtime session.
pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    variant: ModelVariant,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Load a BlazeFace ONNX model of the given variant.
    pub fn new(
        model_path: &Path,
        variant: ModelVariant,
        confidence: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        log::info!(
            "Loaded {variant} BlazeFace model from {}",
            model_path.display()
        );
        Ok(Self {
            session,
            variant,
            confidence,
            anchors: generate_anchors(variant),
        })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        check_channels(frame)?;
        let input_size = self.variant.input_size();

        // 1. Preprocess: resize to input size, normalize to [0,1], NCHW
        let input_tensor = preprocess(frame, input_size);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // BlazeFace outputs two tensors:
        // - regressors: [1, anchors, 16] (box deltas + keypoints)
        // - classificators: [1, anchors, 1] (confidence logits)
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        // 3. Decode anchor boxes, filter by confidence, NMS
        let mut raw_dets = decode(
            reg_data,
            score_data,
            &self.anchors,
            input_size,
            self.confidence,
        );
        let kept = nms(&mut raw_dets, NMS_IOU_THRESH);

        // 4. Scale to frame coordinates
        Ok(kept
            .iter()
            .map(|d| to_detection(d, frame.width(), frame.height()))
            .filter(|d| !d.region.is_empty())
            .collect())
    }

    fn required_channel_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// BlazeFace reads three colour channels per pixel.
fn check_channels(frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    if frame.channels() < 3 {
        return Err(format!("BlazeFace needs 3-channel input, got {}", frame.channels()).into());
    }
    Ok(())
}

/// Resize frame to `size × size` and normalize to [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    if src_h == 0 || src_w == 0 {
        return tensor;
    }

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Anchor generation
// ---------------------------------------------------------------------------

/// Generate anchor centres in normalized [0,1] coordinates.
///
/// One grid per `(stride, anchors_per_cell)` entry of the variant's layout,
/// all anchors of a cell sharing its centre.
fn generate_anchors(variant: ModelVariant) -> Vec<[f32; 2]> {
    let input_size = variant.input_size() as usize;
    let mut anchors = Vec::with_capacity(variant.num_anchors());

    for &(stride, num) in variant.anchor_layout() {
        let grid_size = input_size / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded detection in normalized [0,1] coordinates.
#[derive(Clone, Debug)]
struct RawDet {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    score: f64,
    keypoints: [(f64, f64); NUM_KEYPOINTS],
}

fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    input_size: u32,
    confidence: f64,
) -> Vec<RawDet> {
    let scale = input_size as f32;
    let mut dets = Vec::new();

    for (i, &raw_score) in score_data.iter().enumerate().take(anchors.len()) {
        let score = sigmoid(raw_score);
        if (score as f64) < confidence {
            continue;
        }

        let offset = i * REGRESSOR_STRIDE;
        if offset + REGRESSOR_STRIDE > reg_data.len() {
            break;
        }
        let reg = &reg_data[offset..offset + REGRESSOR_STRIDE];
        let anchor = anchors[i];

        // Box centre + size relative to anchor
        let cx = anchor[0] + reg[0] / scale;
        let cy = anchor[1] + reg[1] / scale;
        let w = reg[2] / scale;
        let h = reg[3] / scale;

        let mut keypoints = [(0.0, 0.0); NUM_KEYPOINTS];
        for (k, kp) in keypoints.iter_mut().enumerate() {
            let kx = anchor[0] + reg[4 + k * 2] / scale;
            let ky = anchor[1] + reg[4 + k * 2 + 1] / scale;
            *kp = (kx as f64, ky as f64);
        }

        dets.push(RawDet {
            x1: (cx - w / 2.0) as f64,
            y1: (cy - h / 2.0) as f64,
            x2: (cx + w / 2.0) as f64,
            y2: (cy + h / 2.0) as f64,
            score: score as f64,
            keypoints,
        });
    }

    dets
}

fn to_detection(det: &RawDet, frame_width: u32, frame_height: u32) -> Detection {
    let fw = frame_width as f64;
    let fh = frame_height as f64;
    let x1 = (det.x1 * fw).round() as i32;
    let y1 = (det.y1 * fh).round() as i32;
    let x2 = (det.x2 * fw).round() as i32;
    let y2 = (det.y2 * fh).round() as i32;
    let region = Region::new(x1, y1, x2 - x1, y2 - y1).clamp_to(frame_width, frame_height);

    let keypoints = det
        .keypoints
        .iter()
        .map(|&(kx, ky)| ((kx * fw).round() as i32, (ky * fh).round() as i32))
        .collect();

    Detection::new(region, det.score).with_keypoints(keypoints)
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

fn nms(dets: &mut [RawDet], iou_thresh: f64) -> Vec<RawDet> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].clone());
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && bbox_iou(&dets[i], &dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn bbox_iou(a: &RawDet, b: &RawDet) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
