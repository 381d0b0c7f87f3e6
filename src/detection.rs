use serde::Deserialize;

/// One predicted object as returned by the model server.
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    /// Pixel coordinates `[x1, y1, x2, y2]`.
    pub bbox: [i32; 4],
    pub confidence: f32,
    #[serde(rename = "class")]
    pub class_label: String,
}

/// Response envelope of the `/detect` endpoint.
///
/// `count` is whatever the model server reports; it is not cross-checked
/// against `detections.len()`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionReply {
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detection_reply() {
        let body = r#"{
            "success": true,
            "count": 2,
            "detections": [
                {"bbox": [10, 10, 50, 50], "confidence": 0.87, "class": "cat"},
                {"bbox": [60, 20, 90, 80], "confidence": 0.42, "class": "dog"}
            ]
        }"#;

        let reply: DetectionReply = serde_json::from_str(body).unwrap();
        assert!(reply.success);
        assert_eq!(reply.count, 2);
        assert_eq!(reply.detections.len(), 2);
        assert_eq!(reply.detections[0].class_label, "cat");
        assert_eq!(reply.detections[0].bbox, [10, 10, 50, 50]);
        assert!(reply.error.is_none());
    }

    #[test]
    fn parses_failure_reply_without_detections() {
        let body = r#"{"success": false, "error": "model not loaded"}"#;

        let reply: DetectionReply = serde_json::from_str(body).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.count, 0);
        assert!(reply.detections.is_empty());
        assert_eq!(reply.error.as_deref(), Some("model not loaded"));
    }
}
