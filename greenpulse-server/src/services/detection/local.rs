use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::equalize_histogram;
use imageproc::definitions::Image;
use imageproc::integral_image::integral_image;
use imageproc::rect::Rect;

use crate::configs::LocalDetector as LocalDetectorSettings;
use crate::models::detection::{Detection, DetectionOutcome};

/// Confidence when at least one face region was found.
pub const HIT_CONFIDENCE: f64 = 0.75;
/// Confidence for an empty read. A missed face is less likely than a
/// spurious one, so a clean frame scores higher.
pub const EMPTY_CONFIDENCE: f64 = 0.90;

const MAX_SCAN_WIDTH: u32 = 640;

/// Finds face regions in a grayscale frame.
pub trait FaceRegionDetector: Send + Sync {
    fn detect(&self, gray: &GrayImage) -> Vec<Rect>;
}

/// On-device fallback used when remote inference is unavailable.
pub struct LocalDetector {
    detector: Arc<dyn FaceRegionDetector>,
}

impl LocalDetector {
    pub fn new(detector: Arc<dyn FaceRegionDetector>) -> Self {
        Self { detector }
    }

    pub async fn detect(&self, frame: &DynamicImage) -> DetectionOutcome {
        let gray = frame.to_luma8();
        let detector = self.detector.clone();

        match tokio::task::spawn_blocking(move || detector.detect(&gray).len()).await {
            Ok(faces) => DetectionOutcome::Detected(local_detection(faces as u32)),
            Err(e) => {
                tracing::error!("local face detection aborted: {}", e);
                DetectionOutcome::Unavailable
            }
        }
    }
}

fn local_detection(faces: u32) -> Detection {
    let confidence = if faces > 0 { HIT_CONFIDENCE } else { EMPTY_CONFIDENCE };

    Detection::new(faces, confidence)
}

/// Multi-scale sliding-window detector over Haar-like contrast features.
///
/// A window is a face candidate when the eye band is darker than both the
/// forehead and the cheeks, and the nose bridge is brighter than the eyes on
/// either side. Overlapping candidates are grouped and a group only counts
/// once it has `min_neighbors` members.
pub struct HaarFaceDetector {
    scale_factor: f32,
    min_neighbors: usize,
    min_window: u32,
}

impl HaarFaceDetector {
    pub fn new(settings: &LocalDetectorSettings) -> Self {
        Self {
            scale_factor: settings.scale_factor.max(1.01),
            min_neighbors: settings.min_neighbors,
            min_window: settings.min_window.max(12),
        }
    }

    fn candidates(&self, integral: &Image<Luma<u32>>, width: u32, height: u32) -> Vec<Rect> {
        let mut candidates = Vec::new();
        let mut size = self.min_window as f32;

        while (size as u32) <= width.min(height) {
            let window = size as u32;
            let step = (window / 8).max(2);

            let mut y = 0;
            while y + window <= height {
                let mut x = 0;
                while x + window <= width {
                    if is_face_window(integral, x, y, window) {
                        candidates.push(Rect::at(x as i32, y as i32).of_size(window, window));
                    }
                    x += step;
                }
                y += step;
            }

            size *= self.scale_factor;
        }

        candidates
    }
}

impl FaceRegionDetector for HaarFaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Rect> {
        let gray = if gray.width() > MAX_SCAN_WIDTH {
            let height = gray.height() * MAX_SCAN_WIDTH / gray.width();
            imageops::resize(gray, MAX_SCAN_WIDTH, height.max(1), FilterType::Triangle)
        } else {
            gray.clone()
        };

        let equalized = equalize_histogram(&gray);
        let integral = integral_image::<_, u32>(&equalized);
        let candidates = self.candidates(&integral, gray.width(), gray.height());

        group_rectangles(&candidates, self.min_neighbors)
    }
}

const EYE_CONTRAST: f32 = 18.0;
const BRIDGE_CONTRAST: f32 = 10.0;

fn is_face_window(integral: &Image<Luma<u32>>, x: u32, y: u32, size: u32) -> bool {
    let mean = |fx: f32, fy: f32, fw: f32, fh: f32| {
        let left = x + (fx * size as f32) as u32;
        let top = y + (fy * size as f32) as u32;
        let width = ((fw * size as f32) as u32).max(1);
        let height = ((fh * size as f32) as u32).max(1);

        region_sum(integral, left, top, width, height) as f32 / (width * height) as f32
    };

    let window = mean(0.0, 0.0, 1.0, 1.0);
    if !(40.0..=215.0).contains(&window) {
        return false;
    }

    let forehead = mean(0.2, 0.05, 0.6, 0.15);
    let eyes = mean(0.1, 0.25, 0.8, 0.2);
    let cheeks = mean(0.15, 0.5, 0.7, 0.2);

    if forehead - eyes < EYE_CONTRAST || cheeks - eyes < EYE_CONTRAST {
        return false;
    }

    let left_eye = mean(0.15, 0.25, 0.25, 0.15);
    let bridge = mean(0.42, 0.25, 0.16, 0.15);
    let right_eye = mean(0.6, 0.25, 0.25, 0.15);

    bridge - left_eye >= BRIDGE_CONTRAST && bridge - right_eye >= BRIDGE_CONTRAST
}

/// Sum over `[left, left + width) x [top, top + height)`. The integral image
/// is one pixel larger than its source in each dimension.
fn region_sum(integral: &Image<Luma<u32>>, left: u32, top: u32, width: u32, height: u32) -> u32 {
    let right = (left + width).min(integral.width() - 1);
    let bottom = (top + height).min(integral.height() - 1);
    let at = |x: u32, y: u32| integral.get_pixel(x, y).0[0];

    (at(right, bottom) + at(left, top)).wrapping_sub(at(left, bottom) + at(right, top))
}

/// Clusters similar rectangles and keeps the average of every cluster with at
/// least `min_neighbors` members, dropping clusters nested inside a stronger one.
fn group_rectangles(rects: &[Rect], min_neighbors: usize) -> Vec<Rect> {
    let mut labels: Vec<usize> = (0..rects.len()).collect();

    fn root(labels: &mut [usize], mut i: usize) -> usize {
        while labels[i] != i {
            labels[i] = labels[labels[i]];
            i = labels[i];
        }
        i
    }

    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if similar(&rects[i], &rects[j]) {
                let (a, b) = (root(&mut labels, i), root(&mut labels, j));
                labels[a] = b;
            }
        }
    }

    let mut clusters: Vec<(usize, [i64; 4], usize)> = Vec::new();
    for (i, rect) in rects.iter().enumerate() {
        let label = root(&mut labels, i);
        let bounds = [
            rect.left() as i64,
            rect.top() as i64,
            rect.width() as i64,
            rect.height() as i64,
        ];

        match clusters.iter_mut().find(|(l, _, _)| *l == label) {
            Some((_, sum, count)) => {
                sum.iter_mut().zip(bounds).for_each(|(s, b)| *s += b);
                *count += 1;
            }
            None => clusters.push((label, bounds, 1)),
        }
    }

    let grouped: Vec<(Rect, usize)> = clusters
        .into_iter()
        .filter(|(_, _, count)| *count >= min_neighbors.max(1))
        .map(|(_, sum, count)| {
            let n = count as i64;
            let rect = Rect::at((sum[0] / n) as i32, (sum[1] / n) as i32)
                .of_size((sum[2] / n).max(1) as u32, (sum[3] / n).max(1) as u32);
            (rect, count)
        })
        .collect();

    grouped
        .iter()
        .filter(|(rect, count)| {
            !grouped
                .iter()
                .any(|(other, other_count)| other != rect && other_count >= count && contains(other, rect))
        })
        .map(|(rect, _)| *rect)
        .collect()
}

fn similar(a: &Rect, b: &Rect) -> bool {
    let delta = 0.2 * (a.width().min(b.width()) + a.height().min(b.height())) as f32 * 0.5;

    (a.left() - b.left()).abs() as f32 <= delta
        && (a.top() - b.top()).abs() as f32 <= delta
        && (a.right() - b.right()).abs() as f32 <= delta
        && (a.bottom() - b.bottom()).abs() as f32 <= delta
}

fn contains(outer: &Rect, inner: &Rect) -> bool {
    outer.left() <= inner.left()
        && outer.top() <= inner.top()
        && outer.right() >= inner.right()
        && outer.bottom() >= inner.bottom()
}
