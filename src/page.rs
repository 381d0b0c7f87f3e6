/// Values injected into the rendered upload page.
#[derive(Debug, Default)]
pub struct PageContext {
    pub error: Option<String>,
    pub uploaded_image: Option<String>,
    pub result_image: Option<String>,
    pub detection_count: Option<u32>,
}

impl PageContext {
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn success(uploaded_image: String, result_image: String, detection_count: u32) -> Self {
        Self {
            error: None,
            uploaded_image: Some(uploaded_image),
            result_image: Some(result_image),
            detection_count: Some(detection_count),
        }
    }
}

/// Renders the upload form, optionally followed by an error paragraph or the
/// uploaded/annotated image links.
pub fn render_index(context: &PageContext) -> String {
    let mut body = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
<title>Object Detection</title>
</head>
<body>
<h1>Object Detection</h1>
<form action="/predict" method="post" enctype="multipart/form-data">
<input type="file" name="image" accept="image/*">
<button type="submit">Detect</button>
</form>
"#,
    );

    if let Some(error) = &context.error {
        body.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(error)
        ));
    }

    if let (Some(uploaded), Some(result)) = (&context.uploaded_image, &context.result_image) {
        let count = context.detection_count.unwrap_or_default();
        body.push_str(&format!(
            r#"<p>Detections: <span id="detection-count">{count}</span></p>
<div class="images">
<figure><img src="{uploaded}" alt="Uploaded image"><figcaption><a href="{uploaded}">Uploaded image</a></figcaption></figure>
<figure><img src="{result}" alt="Annotated image"><figcaption><a href="{result}">Annotated image</a></figcaption></figure>
</div>
"#,
            count = count,
            uploaded = escape_html(uploaded),
            result = escape_html(result),
        ));
    }

    body.push_str("</body>\n</html>\n");
    body
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
