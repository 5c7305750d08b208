use serde::Deserialize;

use crate::models::detection::Detection;

/// Confidence assigned to a face count when no person object carries a score.
pub const FACE_BASELINE_CONFIDENCE: f64 = 0.85;

const PERSON_OBJECT: &str = "Person";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub localized_object_annotations: Vec<LocalizedObjectAnnotation>,
    #[serde(default)]
    pub face_annotations: Vec<FaceAnnotation>,
    #[serde(default)]
    pub label_annotations: Vec<LabelAnnotation>,
    pub error: Option<AnnotateStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedObjectAnnotation {
    pub name: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAnnotation {
    pub detection_confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelAnnotation {
    pub description: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateImageResponse {
    pub fn persons(&self) -> impl Iterator<Item = &LocalizedObjectAnnotation> {
        self.localized_object_annotations
            .iter()
            .filter(|object| object.name.eq_ignore_ascii_case(PERSON_OBJECT))
    }
}

/// Combines the face and person-object signals of one response.
///
/// Faces win the count whenever any are present. Their confidence is the best
/// person-object score, or the baseline when no person scored.
pub fn fuse(response: &AnnotateImageResponse) -> Detection {
    let faces = response.face_annotations.len() as u32;
    let best_person = response
        .persons()
        .map(|person| person.score)
        .fold(0.0, f64::max);

    if faces > 0 {
        let confidence = if best_person > 0.0 {
            best_person
        } else {
            FACE_BASELINE_CONFIDENCE
        };

        return Detection::new(faces, confidence);
    }

    let persons = response.persons().count() as u32;

    if persons > 0 {
        return Detection::new(persons, best_person);
    }

    Detection::empty()
}
