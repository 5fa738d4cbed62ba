//! JSON request and response bodies exchanged with HTTP clients.

use serde::{Deserialize, Serialize};

/// Body of `POST /predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// A ranked diagnosis with the classifier's probability for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub probability: f32,
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f32,
    /// Present only when ranked candidates were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
}

/// Body of `POST /ask_bot`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Response of `POST /ask_bot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_request_missing_symptoms_defaults_empty() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert!(req.symptoms.is_empty());
    }

    #[test]
    fn predict_request_reads_symptom_list() {
        let req: PredictRequest =
            serde_json::from_str(r#"{"symptoms": ["itching", "skin_rash"]}"#).unwrap();
        assert_eq!(req.symptoms, vec!["itching", "skin_rash"]);
    }

    #[test]
    fn predict_response_omits_candidates_when_absent() {
        let resp = PredictResponse {
            prediction: "Fungal infection".into(),
            confidence: 0.9,
            candidates: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["prediction"], "Fungal infection");
        assert!(json.get("candidates").is_none());
    }

    #[test]
    fn predict_response_includes_candidates() {
        let resp = PredictResponse {
            prediction: "Influenza".into(),
            confidence: 0.75,
            candidates: Some(vec![
                Candidate {
                    label: "Influenza".into(),
                    probability: 0.75,
                },
                Candidate {
                    label: "Common Cold".into(),
                    probability: 0.25,
                },
            ]),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["candidates"][1]["label"], "Common Cold");
    }

    #[test]
    fn ask_request_missing_question_defaults_empty() {
        let req: AskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.question.is_empty());
    }
}
